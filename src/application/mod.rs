mod application;
pub mod data;
mod logging;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use logging::{LoggingSetupError, init_logging};
#[cfg(test)]
pub use logging::{file_layer, open_log_file};
pub use runtime_config::{ConfigValidationError, SyncConfig};
