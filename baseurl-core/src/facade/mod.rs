mod parsed;
mod request_url;

pub use parsed::*;
pub use request_url::*;
