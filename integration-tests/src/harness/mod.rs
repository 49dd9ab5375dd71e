pub mod environment;
pub mod tracing;

pub use environment::{cgi_request, fixture_path};
pub use tracing::{CapturedEvent, capture_events};
