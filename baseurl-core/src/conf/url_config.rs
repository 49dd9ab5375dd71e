use crate::conf::{ConfigError, load_config};
use crate::detect::CurrentUrlDetector;
use crate::diagnostics::DiagnosticSink;
use crate::host::DomainAllowList;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
    /// Hosts accepted as the request host. Empty accepts every host.
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Honour `X-Forwarded-Host` / `X-Forwarded-Proto`.
    #[serde(default = "default_trust_forwarded_headers")]
    pub trust_forwarded_headers: bool,
}

fn default_trust_forwarded_headers() -> bool {
    true
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            allowed_domains: Vec::new(),
            trust_forwarded_headers: default_trust_forwarded_headers(),
        }
    }
}

impl UrlConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_config(path.as_ref())
    }

    /// Allowed domains are bare hostnames: no scheme, path or whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for domain in &self.allowed_domains {
            let reason = if domain.trim().is_empty() {
                "domain is empty"
            } else if domain.contains("://") {
                "domain must not include a scheme"
            } else if domain.contains('/') {
                "domain must not include a path"
            } else if domain.chars().any(char::is_whitespace) {
                "domain must not contain whitespace"
            } else {
                continue;
            };

            return Err(ConfigError::invalid_domain(domain, reason));
        }
        Ok(())
    }

    pub fn allow_list(&self, sink: Arc<dyn DiagnosticSink>) -> DomainAllowList {
        DomainAllowList::from_domains_with_sink(&self.allowed_domains, sink)
    }

    pub fn detector(&self, sink: Arc<dyn DiagnosticSink>) -> CurrentUrlDetector {
        let allow_list = Arc::new(self.allow_list(sink.clone()));
        CurrentUrlDetector::new(allow_list, sink)
            .with_trust_forwarded_headers(self.trust_forwarded_headers)
    }
}

impl FromStr for UrlConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError::parse("<string>", e))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
