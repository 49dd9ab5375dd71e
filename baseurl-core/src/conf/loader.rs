use crate::conf::{ConfigError, UrlConfig};
use std::fs;
use std::path::Path;

pub fn load_config(path: &Path) -> Result<UrlConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    let cfg: UrlConfig = toml::from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;

    //--------------------------------------------------------------------------
    // Semantic validation
    //--------------------------------------------------------------------------
    cfg.validate()?;

    tracing::info!(
        path = %path.display(),
        allowed_domains = cfg.allowed_domains.len(),
        trust_forwarded_headers = cfg.trust_forwarded_headers,
        "url config loaded"
    );

    Ok(cfg)
}
