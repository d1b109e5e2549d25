//! Diagnostics reported back to whoever invoked an operation.
//!
//! An error diagnostic fails the single operation it belongs to; it never
//! takes the process down.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        if self.detail.is_empty() {
            write!(f, "{}: {}", label, self.summary)
        } else {
            write!(f, "{}: {}\n\n{}", label, self.summary, self.detail)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        let diag = Diagnostic::error(summary, detail);
        tracing::error!("{}: {}", diag.summary, diag.detail);
        self.0.push(diag);
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        let diag = Diagnostic::warning(summary, detail);
        tracing::warn!("{}: {}", diag.summary, diag.detail);
        self.0.push(diag);
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Record the error of a fallible host call and hand back its value
    pub fn capture<T>(&mut self, result: Result<T, Diagnostic>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(diag) => {
                self.0.push(diag);
                None
            }
        }
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut diags = Diagnostics::new();
        diags.add_warning("heads up", "");
        assert!(!diags.has_error());

        diags.add_error("boom", "it broke");
        assert!(diags.has_error());
        assert_eq!(diags.errors().count(), 1);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_capture_records_error() {
        let mut diags = Diagnostics::new();
        let value: Option<u8> = diags.capture(Err(Diagnostic::error("bad", "")));
        assert!(value.is_none());
        assert!(diags.has_error());

        assert_eq!(diags.capture(Ok::<_, Diagnostic>(7)), Some(7));
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::error("Error creating challenge widget", "status 500");
        assert_eq!(
            diag.to_string(),
            "Error: Error creating challenge widget\n\nstatus 500"
        );
    }
}
