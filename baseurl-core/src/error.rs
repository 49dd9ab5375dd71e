use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlError {
    /// Raised outside of a request context, when the environment lacks the
    /// fields needed to rebuild the current URL and no explicit URL was given.
    #[error(
        "URL detection is not available without a request context (missing {missing}); \
         pass an absolute URL explicitly instead"
    )]
    DetectionUnavailable { missing: &'static str },

    #[error("invalid absolute URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl UrlError {
    pub fn unavailable(missing: &'static str) -> Self {
        Self::DetectionUnavailable { missing }
    }

    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub fn is_detection_unavailable(&self) -> bool {
        matches!(self, Self::DetectionUnavailable { .. })
    }
}
