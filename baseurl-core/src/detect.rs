use crate::ctx::RequestEnvironment;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::UrlError;
use crate::facade::ParsedUrl;
use crate::host::{DomainAllowList, normalize_host, split_port};
use std::fmt;
use std::sync::Arc;

/// Host used in place of one rejected by the allow-list.
pub const FALLBACK_HOST: &str = "localhost";

/// Rebuilds the absolute URL of the current request from its environment.
pub struct CurrentUrlDetector {
    allow_list: Arc<DomainAllowList>,
    sink: Arc<dyn DiagnosticSink>,
    trust_forwarded_headers: bool,
}

impl Default for CurrentUrlDetector {
    fn default() -> Self {
        Self::new(Arc::new(DomainAllowList::new()), Arc::new(TracingSink))
    }
}

impl fmt::Debug for CurrentUrlDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentUrlDetector")
            .field("allow_list", &self.allow_list)
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .finish()
    }
}

impl CurrentUrlDetector {
    pub fn new(allow_list: Arc<DomainAllowList>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            allow_list,
            sink,
            trust_forwarded_headers: true,
        }
    }

    /// When disabled, `X-Forwarded-Host` and `X-Forwarded-Proto` are ignored.
    pub fn with_trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    pub fn allow_list(&self) -> &Arc<DomainAllowList> {
        &self.allow_list
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Returns `scheme://host` followed by the request URI exactly as received.
    pub fn detect(&self, env: &RequestEnvironment) -> Result<String, UrlError> {
        let request_uri = env
            .request_uri()
            .ok_or(UrlError::unavailable("request URI"))?;
        let host = self.detect_host(env)?;
        let scheme = self.detect_scheme(env);

        let url = format!("{scheme}://{host}{request_uri}");
        tracing::debug!(url = %url, "current url detected");

        Ok(url)
    }

    /// Detects and parses the current URL.
    ///
    /// A detected URL the parser rejects (a malformed or spoofed host) is
    /// reported and rebuilt on [`FALLBACK_HOST`]. Only missing environment
    /// fields are fatal.
    pub fn detect_parsed(&self, env: &RequestEnvironment) -> Result<ParsedUrl, UrlError> {
        let url = self.detect(env)?;
        let reason = match ParsedUrl::parse(&url) {
            Ok(parsed) => return Ok(parsed),
            Err(UrlError::InvalidUrl { source, .. }) => source.to_string(),
            Err(err) => err.to_string(),
        };

        self.sink.warn(Diagnostic::UnparsableHost { url, reason });

        let request_uri = env.request_uri().unwrap_or("/");
        let separator = if request_uri.starts_with('/') { "" } else { "/" };
        let fallback = format!(
            "{}://{FALLBACK_HOST}{separator}{request_uri}",
            self.detect_scheme(env)
        );

        ParsedUrl::parse(&fallback)
    }

    fn detect_host(&self, env: &RequestEnvironment) -> Result<String, UrlError> {
        let forwarded = env
            .forwarded_host()
            .filter(|_| self.trust_forwarded_headers)
            .and_then(first_entry);

        let raw = forwarded
            .or_else(|| env.host())
            .ok_or(UrlError::unavailable("host"))?;

        let host = normalize_host(&raw.to_lowercase(), self.sink.as_ref());

        if self.is_allowed(&host) {
            return Ok(host);
        }

        self.sink.warn(Diagnostic::HostNotAllowed {
            host,
            allowed: self.allow_list.sorted(),
        });

        Ok(FALLBACK_HOST.to_string())
    }

    fn is_allowed(&self, host: &str) -> bool {
        if self.allow_list.is_empty() {
            return true;
        }

        let (name, _) = split_port(host);
        self.allow_list.contains(name) || self.allow_list.contains(host)
    }

    fn detect_scheme(&self, env: &RequestEnvironment) -> &'static str {
        let https_flag = env.https() == Some("on");
        let forwarded_https = self.trust_forwarded_headers
            && env
                .forwarded_proto()
                .and_then(first_entry)
                .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

        if https_flag || forwarded_https {
            "https"
        } else {
            "http"
        }
    }
}

/// Proxies append to forwarding headers; the client-facing value comes first.
fn first_entry(value: &str) -> Option<&str> {
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, DiagnosticKind};
    use pretty_assertions::assert_eq;

    fn detector_with(domains: &[&str]) -> (CurrentUrlDetector, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let allow_list = Arc::new(DomainAllowList::from_domains(domains));
        let detector = CurrentUrlDetector::new(allow_list, sink.clone());
        (detector, sink)
    }

    fn env(host: &str, uri: &str) -> RequestEnvironment {
        RequestEnvironment::builder()
            .host(host)
            .request_uri(uri)
            .build()
    }

    #[test]
    fn plain_http_request() {
        let (detector, sink) = detector_with(&[]);

        let url = detector.detect(&env("example.com", "/a/b?x=1")).unwrap();

        assert_eq!(url, "http://example.com/a/b?x=1");
        assert!(sink.is_empty());
    }

    #[test]
    fn https_flag_selects_https() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder()
            .host("example.com")
            .https("on")
            .request_uri("/")
            .build();

        assert_eq!(detector.detect(&env).unwrap(), "https://example.com/");
    }

    #[test]
    fn https_flag_other_than_on_is_http() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder()
            .host("example.com")
            .https("off")
            .request_uri("/")
            .build();

        assert_eq!(detector.detect(&env).unwrap(), "http://example.com/");
    }

    #[test]
    fn forwarded_proto_is_case_insensitive() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder()
            .host("example.com")
            .forwarded_proto("HTTPS")
            .request_uri("/")
            .build();

        assert_eq!(detector.detect(&env).unwrap(), "https://example.com/");
    }

    #[test]
    fn forwarded_host_wins_over_host() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder()
            .host("10.0.0.5:8080")
            .forwarded_host("Public.Example.com, proxy.internal")
            .request_uri("/x")
            .build();

        assert_eq!(detector.detect(&env).unwrap(), "http://public.example.com/x");
    }

    #[test]
    fn untrusted_forwarded_headers_are_ignored() {
        let (detector, _) = detector_with(&[]);
        let detector = detector.with_trust_forwarded_headers(false);
        let env = RequestEnvironment::builder()
            .host("internal.test")
            .forwarded_host("public.test")
            .forwarded_proto("https")
            .request_uri("/")
            .build();

        assert_eq!(detector.detect(&env).unwrap(), "http://internal.test/");
    }

    #[test]
    fn host_is_lowercased_and_decoded() {
        let (detector, _) = detector_with(&[]);

        let url = detector.detect(&env("XN--MNCHEN-3YA.DE", "/")).unwrap();

        assert_eq!(url, "http://münchen.de/");
    }

    #[test]
    fn request_uri_is_used_verbatim() {
        let (detector, _) = detector_with(&[]);

        let url = detector.detect(&env("example.com", "/A%20B/c?q=1&r=%2F")).unwrap();

        assert_eq!(url, "http://example.com/A%20B/c?q=1&r=%2F");
    }

    #[test]
    fn unknown_host_falls_back_to_localhost_with_one_warning() {
        // Arrange
        let (detector, sink) = detector_with(&["trusted.test"]);

        // Act
        let url = detector.detect(&env("evil.test", "/")).unwrap();

        // Assert
        assert_eq!(url, "http://localhost/");
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind(), DiagnosticKind::HostNotAllowed);
        let message = diagnostics[0].to_string();
        assert!(message.contains("evil.test"));
        assert!(message.contains("trusted.test"));
    }

    #[test]
    fn allowed_host_with_port_is_accepted() {
        let (detector, sink) = detector_with(&["trusted.test"]);

        let url = detector.detect(&env("trusted.test:8443", "/")).unwrap();

        assert_eq!(url, "http://trusted.test:8443/");
        assert!(sink.is_empty());
    }

    #[test]
    fn allow_list_matches_decoded_hosts() {
        let (detector, sink) = detector_with(&["münchen.de"]);

        let url = detector.detect(&env("xn--mnchen-3ya.de", "/")).unwrap();

        assert_eq!(url, "http://münchen.de/");
        assert!(sink.is_empty());
    }

    #[test]
    fn missing_host_is_unavailable() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder().request_uri("/").build();

        let err = detector.detect(&env).unwrap_err();

        assert!(matches!(
            err,
            UrlError::DetectionUnavailable { missing: "host" }
        ));
    }

    #[test]
    fn missing_request_uri_is_unavailable() {
        let (detector, _) = detector_with(&[]);
        let env = RequestEnvironment::builder().host("example.com").build();

        let err = detector.detect(&env).unwrap_err();

        assert!(matches!(
            err,
            UrlError::DetectionUnavailable {
                missing: "request URI"
            }
        ));
    }

    #[test]
    fn detect_parsed_keeps_valid_hosts() {
        let (detector, sink) = detector_with(&[]);

        let parsed = detector.detect_parsed(&env("example.com", "/a?x=1")).unwrap();

        assert_eq!(parsed.as_str(), "http://example.com/a?x=1");
        assert!(sink.is_empty());
    }

    #[test]
    fn unparsable_host_falls_back_to_localhost() {
        for host in ["bad host.test", "a<b.test"] {
            // Arrange
            let (detector, sink) = detector_with(&[]);

            // Act
            let parsed = detector.detect_parsed(&env(host, "/a")).unwrap();

            // Assert
            assert_eq!(parsed.as_str(), "http://localhost/a", "host: {host}");
            let diagnostics = sink.diagnostics();
            assert_eq!(diagnostics.len(), 1, "host: {host}");
            assert_eq!(diagnostics[0].kind(), DiagnosticKind::UnparsableHost);
            assert!(diagnostics[0].to_string().contains(host));
        }
    }

    #[test]
    fn undecodable_idn_host_falls_back_to_localhost() {
        let (detector, sink) = detector_with(&[]);
        let env = RequestEnvironment::builder()
            .host("xn--ab_c.test")
            .https("on")
            .request_uri("/a")
            .build();

        let parsed = detector.detect_parsed(&env).unwrap();

        assert_eq!(parsed.as_str(), "https://localhost/a");
        let kinds: Vec<_> = sink.diagnostics().iter().map(Diagnostic::kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::IdnaUnavailable, DiagnosticKind::UnparsableHost]
        );
    }

    #[test]
    fn detect_parsed_still_requires_environment() {
        let (detector, sink) = detector_with(&[]);
        let env = RequestEnvironment::builder().request_uri("/").build();

        let err = detector.detect_parsed(&env).unwrap_err();

        assert!(err.is_detection_unavailable());
        assert!(sink.is_empty());
    }

    #[test]
    fn first_entry_trims_and_skips_empty() {
        assert_eq!(first_entry(" a.test , b.test"), Some("a.test"));
        assert_eq!(first_entry(""), None);
        assert_eq!(first_entry(" ,b"), None);
    }
}
