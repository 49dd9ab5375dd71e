use baseurl_core::RequestEnvironment;
use std::path::PathBuf;

/// CGI-style environment of a plain request, as a web server would expose it.
pub fn cgi_request(host: &str, request_uri: &str, script_name: &str) -> RequestEnvironment {
    RequestEnvironment::from_cgi_vars([
        ("HTTP_HOST", host),
        ("REQUEST_URI", request_uri),
        ("SCRIPT_NAME", script_name),
    ])
}

pub fn fixture_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(file)
}
