use crate::error::UrlError;
use url::{ParseError, Position, Url};

/// An absolute URL split into its components.
///
/// Structured components (scheme, host, port, query, fragment) come from the
/// `url` crate. The authority prefix and path are sliced out of the original
/// string instead, so anything derived from them stays a literal prefix of
/// the URL that was handed in (no re-encoding, no host punycoding).
///
/// When the original spelling has no literal `scheme://authority` prefix the
/// parser accepted anyway (`http:/host`, backslashes), the parser's own
/// serialization is used as the original string instead. URLs without a
/// host (`file:///`, `mailto:`) are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    raw: String,
    url: Url,
    authority_end: usize,
    path_end: usize,
}

impl ParsedUrl {
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| UrlError::invalid_url(raw, e))?;

        if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
            return Err(UrlError::invalid_url(raw, ParseError::EmptyHost));
        }

        let (raw, authority_end) = match literal_authority_end(raw, url.scheme()) {
            Some(end) => (raw.to_string(), end),
            None => (url.as_str().to_string(), url[..Position::BeforePath].len()),
        };

        let path_end = raw[authority_end..]
            .find(['?', '#'])
            .map_or(raw.len(), |idx| authority_end + idx);

        Ok(Self {
            raw,
            url,
            authority_end,
            path_end,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host as serialized by the URL parser (IDN hosts in ASCII form).
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Explicit port, `None` when absent or the scheme default.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn port_or_known_default(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    /// Path exactly as it appears in the original string; may be empty.
    pub fn path(&self) -> &str {
        &self.raw[self.authority_end..self.path_end]
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// `scheme://[userinfo@]host[:port]`, as written in the original string.
    pub fn authority_url(&self) -> &str {
        &self.raw[..self.authority_end]
    }

    /// Everything after the authority: path, query and fragment.
    pub fn path_and_query(&self) -> &str {
        &self.raw[self.authority_end..]
    }

    /// Base URL for an application mounted at `prefix`, without trailing slash.
    pub fn base_url_for(&self, prefix: &str) -> String {
        format!("{}{}", self.authority_url(), prefix.trim_end_matches('/'))
    }

    /// Path, query and fragment remaining after `prefix`, without leading slash.
    pub fn path_after(&self, prefix: &str) -> &str {
        let rest = self.path_and_query();
        rest.strip_prefix(prefix)
            .unwrap_or(rest)
            .trim_start_matches('/')
    }
}

/// End of `scheme://authority` in `raw`, when `raw` spells it out literally.
fn literal_authority_end(raw: &str, scheme: &str) -> Option<usize> {
    let start = scheme.len() + 3;
    let prefix = raw.get(..start)?;
    if !prefix.get(..scheme.len())?.eq_ignore_ascii_case(scheme)
        || prefix.get(scheme.len()..) != Some("://")
    {
        return None;
    }

    let end = raw[start..]
        .find(['/', '?', '#', '\\'])
        .map_or(raw.len(), |idx| start + idx);

    // The parser treats `\` as a path separator; the raw text would disagree.
    if end == start || raw[end..].starts_with('\\') {
        return None;
    }

    Some(end)
}
