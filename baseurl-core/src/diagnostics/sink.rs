use crate::diagnostics::Diagnostic;
use std::sync::Mutex;

/// Receives the non-fatal diagnostics produced during URL detection.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, diagnostic: Diagnostic);
}

/// Default sink: every diagnostic becomes a `WARN` level tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, diagnostic: Diagnostic) {
        tracing::warn!(kind = diagnostic.kind().as_str(), "{diagnostic}");
    }
}

/// Keeps diagnostics in memory so callers can inspect them after the fact.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, diagnostic: Diagnostic) {
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
