use crate::ctx::RequestEnvironment;
use crate::detect::CurrentUrlDetector;
use crate::error::UrlError;
use crate::facade::ParsedUrl;
use crate::script_path::resolve_script_path;
use std::fmt;

/// Absolute, base and relative URL of the current request.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    current_url: String,
    base_url: String,
    script_path: String,
    relative_url: String,
    parsed: ParsedUrl,
}

/// Construction API
impl RequestUrl {
    /// Uses `explicit` when given, otherwise detects the URL from `env`.
    /// Fails with [`UrlError::DetectionUnavailable`] when neither is available.
    pub fn new(
        explicit: Option<&str>,
        env: Option<&RequestEnvironment>,
        detector: &CurrentUrlDetector,
    ) -> Result<Self, UrlError> {
        match (explicit, env) {
            (Some(url), env) => Self::build(url, env.and_then(RequestEnvironment::script_name)),
            (None, Some(env)) => Self::from_environment(env, detector),
            (None, None) => Err(UrlError::unavailable("request environment")),
        }
    }

    /// From an explicit absolute URL. The application is treated as mounted
    /// at the domain root.
    pub fn from_url(url: &str) -> Result<Self, UrlError> {
        Self::build(url, None)
    }

    pub fn from_url_with_script(url: &str, script_name: &str) -> Result<Self, UrlError> {
        Self::build(url, Some(script_name))
    }

    /// A detected host the URL parser rejects degrades to `localhost` with a
    /// warning; it never fails the request.
    pub fn from_environment(
        env: &RequestEnvironment,
        detector: &CurrentUrlDetector,
    ) -> Result<Self, UrlError> {
        let parsed = detector.detect_parsed(env)?;
        Ok(Self::from_parsed(parsed, env.script_name()))
    }

    /// Detects the URL from the CGI variables of the running process.
    pub fn from_process_env(detector: &CurrentUrlDetector) -> Result<Self, UrlError> {
        Self::from_environment(&RequestEnvironment::from_process_env(), detector)
    }

    fn build(url: &str, script_name: Option<&str>) -> Result<Self, UrlError> {
        Ok(Self::from_parsed(ParsedUrl::parse(url)?, script_name))
    }

    fn from_parsed(parsed: ParsedUrl, script_name: Option<&str>) -> Self {
        let script_path = resolve_script_path(parsed.path(), script_name.unwrap_or(""));
        let base_url = parsed.base_url_for(&script_path);
        let relative_url = parsed.path_after(&script_path).to_string();

        Self {
            current_url: parsed.as_str().to_string(),
            base_url,
            script_path,
            relative_url,
            parsed,
        }
    }
}

/// Accessors
impl RequestUrl {
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Scheme, host and mount directory; never ends with `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn script_path(&self) -> &str {
        &self.script_path
    }

    /// Path and query relative to the base URL; never starts with `/`.
    pub fn relative_url(&self) -> &str {
        &self.relative_url
    }

    /// With `with_query == false` everything from the first `?` on is cut,
    /// fragment included.
    pub fn relative_url_with(&self, with_query: bool) -> &str {
        if with_query {
            return &self.relative_url;
        }

        match self.relative_url.find('?') {
            Some(idx) => &self.relative_url[..idx],
            None => &self.relative_url,
        }
    }

    pub fn parsed(&self) -> &ParsedUrl {
        &self.parsed
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.current_url)
    }
}
