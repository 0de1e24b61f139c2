//! 命令定义和实现

pub mod boards;
pub mod config;
pub mod marker;
pub mod metadata;
pub mod start;

pub use boards::BoardsCommand;
pub use config::ConfigCommand;
pub use marker::MarkerCommand;
pub use metadata::MetadataCommand;
pub use start::StartCommand;
