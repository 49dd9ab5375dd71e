use http::{HeaderMap, Uri, header};
use std::ffi::OsString;

pub const CGI_HTTP_HOST: &str = "HTTP_HOST";
pub const CGI_X_FORWARDED_HOST: &str = "HTTP_X_FORWARDED_HOST";
pub const CGI_X_FORWARDED_PROTO: &str = "HTTP_X_FORWARDED_PROTO";
pub const CGI_HTTPS: &str = "HTTPS";
pub const CGI_REQUEST_URI: &str = "REQUEST_URI";
pub const CGI_SCRIPT_NAME: &str = "SCRIPT_NAME";

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Read-only snapshot of the request fields URL detection depends on.
///
/// Every field is optional; which ones are required is decided by the
/// detector, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEnvironment {
    host: Option<String>,
    forwarded_host: Option<String>,
    forwarded_proto: Option<String>,
    https: Option<String>,
    request_uri: Option<String>,
    script_name: Option<String>,
}

/// Constructors
impl RequestEnvironment {
    pub fn builder() -> RequestEnvironmentBuilder {
        RequestEnvironmentBuilder::default()
    }

    /// Build from CGI-style variables (`HTTP_HOST`, `REQUEST_URI`, ...).
    /// Unknown keys and empty values are ignored.
    pub fn from_cgi_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Self::default();

        for (key, value) in vars {
            let value = value.into();
            if value.is_empty() {
                continue;
            }

            let slot = match key.as_ref() {
                CGI_HTTP_HOST => &mut env.host,
                CGI_X_FORWARDED_HOST => &mut env.forwarded_host,
                CGI_X_FORWARDED_PROTO => &mut env.forwarded_proto,
                CGI_HTTPS => &mut env.https,
                CGI_REQUEST_URI => &mut env.request_uri,
                CGI_SCRIPT_NAME => &mut env.script_name,
                _ => continue,
            };
            *slot = Some(value);
        }

        env
    }

    /// Build from the CGI variables of the current process. Non-UTF-8
    /// variables are skipped.
    pub fn from_process_env() -> Self {
        Self::from_cgi_vars(std::env::vars_os().filter_map(
            |(key, value): (OsString, OsString)| Some((key.into_string().ok()?, value.into_string().ok()?)),
        ))
    }

    /// Build from parsed request parts.
    ///
    /// The `Host` header wins over the URI authority; HTTP/2 requests carry
    /// the host in `:authority` only, which ends up in the URI.
    pub fn from_request_parts(
        headers: &HeaderMap,
        uri: &Uri,
        is_tls: bool,
        script_name: Option<&str>,
    ) -> Self {
        let host = header_str(headers, header::HOST.as_str())
            .or_else(|| uri.authority().map(|a| a.as_str()));

        Self {
            host: host.map(str::to_owned),
            forwarded_host: header_str(headers, X_FORWARDED_HOST).map(str::to_owned),
            forwarded_proto: header_str(headers, X_FORWARDED_PROTO).map(str::to_owned),
            https: is_tls.then(|| "on".to_string()),
            request_uri: uri.path_and_query().map(|pq| pq.as_str().to_owned()),
            script_name: script_name
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        }
    }
}

/// Accessors
impl RequestEnvironment {
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn forwarded_host(&self) -> Option<&str> {
        self.forwarded_host.as_deref()
    }

    pub fn forwarded_proto(&self) -> Option<&str> {
        self.forwarded_proto.as_deref()
    }

    pub fn https(&self) -> Option<&str> {
        self.https.as_deref()
    }

    pub fn request_uri(&self) -> Option<&str> {
        self.request_uri.as_deref()
    }

    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_deref()
    }

    /// True when the snapshot looks like it came from a real request.
    pub fn has_request_context(&self) -> bool {
        (self.host.is_some() || self.forwarded_host.is_some()) && self.request_uri.is_some()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default)]
pub struct RequestEnvironmentBuilder {
    env: RequestEnvironment,
}

impl RequestEnvironmentBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.env.host = Some(host.into());
        self
    }

    pub fn forwarded_host(mut self, host: impl Into<String>) -> Self {
        self.env.forwarded_host = Some(host.into());
        self
    }

    pub fn forwarded_proto(mut self, proto: impl Into<String>) -> Self {
        self.env.forwarded_proto = Some(proto.into());
        self
    }

    pub fn https(mut self, flag: impl Into<String>) -> Self {
        self.env.https = Some(flag.into());
        self
    }

    pub fn request_uri(mut self, uri: impl Into<String>) -> Self {
        self.env.request_uri = Some(uri.into());
        self
    }

    pub fn script_name(mut self, name: impl Into<String>) -> Self {
        self.env.script_name = Some(name.into());
        self
    }

    pub fn build(self) -> RequestEnvironment {
        self.env
    }
}
