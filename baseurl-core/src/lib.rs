//! Current-request URL detection.
//!
//! Rebuilds the absolute URL of the request being served, the base URL the
//! application is mounted under, and the path relative to that base, from
//! the raw (untrusted) request environment.
//!
//! ```
//! use baseurl_core::{CurrentUrlDetector, RequestEnvironment, RequestUrl};
//!
//! let env = RequestEnvironment::builder()
//!     .host("example.com")
//!     .https("on")
//!     .request_uri("/a/b?x=1")
//!     .script_name("/a/index.php")
//!     .build();
//!
//! let url = RequestUrl::from_environment(&env, &CurrentUrlDetector::default())?;
//! assert_eq!(url.base_url(), "https://example.com/a");
//! assert_eq!(url.relative_url_with(false), "b");
//! # Ok::<(), baseurl_core::UrlError>(())
//! ```

pub mod conf;
pub mod ctx;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod facade;
pub mod holder;
pub mod host;
pub mod logging;
pub mod script_path;

pub use conf::UrlConfig;
pub use ctx::RequestEnvironment;
pub use detect::CurrentUrlDetector;
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::UrlError;
pub use facade::{ParsedUrl, RequestUrl};
pub use holder::UrlHolder;
pub use host::{DomainAllowList, normalize_host};
pub use script_path::resolve_script_path;
