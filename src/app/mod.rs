// Application layer - Use case interactors

pub mod batch;
pub mod clean_interactor;
pub mod container;
pub mod convert_interactor;
pub mod inspect_interactor;
pub mod toolbox;

// Re-export interactors
pub use batch::{BatchOrchestrator, BatchReport, FileProcessor, WalkDepth};
pub use clean_interactor::CleanInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::ConvertInteractor;
pub use inspect_interactor::{InspectInteractor, InspectResponse};
pub use toolbox::{Applied, Toolbox};
