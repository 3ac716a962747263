use std::sync::Arc;

use crate::adapters::{LocalFsAdapter, ProcessAdapter};
use crate::app::batch::BatchOrchestrator;
use crate::app::{
    clean_interactor::CleanInteractor, convert_interactor::ConvertInteractor,
    inspect_interactor::InspectInteractor, toolbox::Toolbox,
};
use crate::domain::model::NormalizeConfig;
use crate::ports::{ExecutePort, FsPort};

pub trait AppContainer: Send + Sync {
    fn clean_interactor(&self) -> Arc<CleanInteractor>;
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn orchestrator(&self) -> Arc<BatchOrchestrator>;
}

pub struct DefaultAppContainer {
    clean_interactor: Arc<CleanInteractor>,
    convert_interactor: Arc<ConvertInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    orchestrator: Arc<BatchOrchestrator>,
}

impl DefaultAppContainer {
    /// Wire the real process and filesystem adapters
    pub fn new(config: NormalizeConfig) -> Self {
        Self::with_ports(
            config,
            Arc::new(ProcessAdapter::new()),
            Arc::new(LocalFsAdapter::new()),
        )
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        config: NormalizeConfig,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        let config = Arc::new(config);
        let toolbox = Arc::new(Toolbox::new(execute_port, fs_port, config.dry_run));

        Self {
            clean_interactor: Arc::new(CleanInteractor::new(
                Arc::clone(&config),
                Arc::clone(&toolbox),
            )),
            convert_interactor: Arc::new(ConvertInteractor::new(
                Arc::clone(&config),
                Arc::clone(&toolbox),
            )),
            inspect_interactor: Arc::new(InspectInteractor::new(
                Arc::clone(&config),
                Arc::clone(&toolbox),
            )),
            orchestrator: Arc::new(BatchOrchestrator::new(&config)),
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn clean_interactor(&self) -> Arc<CleanInteractor> {
        Arc::clone(&self.clean_interactor)
    }

    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn orchestrator(&self) -> Arc<BatchOrchestrator> {
        Arc::clone(&self.orchestrator)
    }
}
