mod error;
mod loader;
mod url_config;

pub use error::ConfigError;
pub use loader::load_config;
pub use url_config::UrlConfig;
