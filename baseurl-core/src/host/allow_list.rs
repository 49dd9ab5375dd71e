use crate::diagnostics::{AllowedDomains, DiagnosticSink, TracingSink};
use crate::host::normalize_host;
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Hostnames accepted as the current request's host.
///
/// An empty list permits every host. Entries are lowercased and IDN-decoded
/// before they are stored, and can only ever be added.
pub struct DomainAllowList {
    domains: ArcSwap<HashSet<String>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for DomainAllowList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomainAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainAllowList")
            .field("domains", &self.sorted())
            .finish()
    }
}

impl DomainAllowList {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            domains: ArcSwap::from_pointee(HashSet::new()),
            sink,
        }
    }

    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_domains_with_sink(domains, Arc::new(TracingSink))
    }

    /// Like [`from_domains`](Self::from_domains), reporting entries that fail
    /// IDN conversion to `sink`.
    pub fn from_domains_with_sink<I, S>(domains: I, sink: Arc<dyn DiagnosticSink>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = Self::with_sink(sink);
        for domain in domains {
            list.register(domain.as_ref());
        }
        list
    }

    /// Adds `domain` to the list. Returns `false` when it was already present.
    pub fn register(&self, domain: &str) -> bool {
        let domain = normalize_host(&domain.to_lowercase(), self.sink.as_ref());

        if self.domains.load().contains(&domain) {
            return false;
        }

        let mut inserted = false;
        self.domains.rcu(|current| {
            let mut next = HashSet::clone(current);
            inserted = next.insert(domain.clone());
            next
        });

        if inserted {
            tracing::debug!(domain = %domain, "allowed domain registered");
        }
        inserted
    }

    /// Lock-free snapshot of the registered domains.
    pub fn list(&self) -> Arc<HashSet<String>> {
        self.domains.load_full()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.domains.load().contains(host)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.load().is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.load().len()
    }

    pub fn sorted(&self) -> AllowedDomains {
        let mut domains: Vec<String> = self.domains.load().iter().cloned().collect();
        domains.sort();
        AllowedDomains(domains)
    }
}
