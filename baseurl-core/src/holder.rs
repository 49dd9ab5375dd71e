use crate::error::UrlError;
use crate::facade::RequestUrl;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Lazily built, process-lifetime [`RequestUrl`].
///
/// Owned by the hosting application and handed to whoever needs it. The
/// provider runs at most once successfully, even under concurrent first
/// access; a failed attempt leaves the holder empty so a later call can
/// try again.
#[derive(Debug, Default)]
pub struct UrlHolder {
    cell: OnceCell<Arc<RequestUrl>>,
}

impl UrlHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_init<F>(&self, provider: F) -> Result<Arc<RequestUrl>, UrlError>
    where
        F: FnOnce() -> Result<RequestUrl, UrlError>,
    {
        self.cell
            .get_or_try_init(|| {
                tracing::debug!("building cached request url");
                provider().map(Arc::new)
            })
            .cloned()
    }

    /// An explicit URL always yields a fresh instance and leaves the cache
    /// alone; without one the cached instance is returned (built on demand).
    pub fn resolve<F>(&self, explicit: Option<&str>, provider: F) -> Result<Arc<RequestUrl>, UrlError>
    where
        F: FnOnce() -> Result<RequestUrl, UrlError>,
    {
        match explicit {
            Some(url) => RequestUrl::from_url(url).map(Arc::new),
            None => self.get_or_try_init(provider),
        }
    }

    pub fn get(&self) -> Option<Arc<RequestUrl>> {
        self.cell.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
