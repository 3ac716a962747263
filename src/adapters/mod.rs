// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod exec_process;
pub mod fs_local;
pub mod mkvtoolnix;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FFmpegTool;
pub use exec_process::ProcessAdapter;
pub use fs_local::LocalFsAdapter;
pub use mkvtoolnix::MkvToolnix;
pub use toml_config::{ConfigFile, TomlConfigAdapter};
