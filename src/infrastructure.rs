// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod redcap_client;

// Re-exports
pub use config::{RedcapConfig, RedcapConfigError, DEFAULT_REDCAP_API_URL};
pub use logging::init_logging;
pub use redcap_client::{RedcapApi, RedcapApiError, RedcapClient};
