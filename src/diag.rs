//! Diagnostic model used to render parse failures as rich reports.
//!
//! The parser itself never produces diagnostics while matching (grammar
//! mismatch is ordinary control flow); only the entry points build a
//! [`Diag`] when an input is rejected, and callers render it through
//! [`to_report`] for terminal output with source context.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagSeverity {
    /// A fatal error that prevents further processing.
    Error,
    /// A warning about a suspicious but accepted input.
    Warning,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    /// The span this label refers to.
    pub span: Span,
    /// The label text explaining this span's relevance.
    pub message: String,
}

/// A structured diagnostic message.
///
/// Captures everything needed to render an error with source context:
/// labeled spans, optional help text, and an optional code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The severity level of this diagnostic.
    pub severity: DiagSeverity,
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans showing relevant source locations.
    pub labels: Vec<DiagLabel>,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Optional diagnostic code (e.g. `odata::trailing_input`).
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: DiagSeverity::Error,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    /// Adds a labeled span to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel {
            span,
            message: message.into(),
        });
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// A wrapper around the query text for diagnostic rendering.
///
/// Owns the source and clamps spans to its bounds, so out-of-range label
/// positions can never panic the renderer.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
}

impl SourceFile {
    /// Creates a new source file from the given query text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Returns the source content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Clamps a span to valid bounds within this source.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

/// Converts a diagnostic to a miette [`Report`] with source context.
pub fn to_report(diag: &Diag, source: &SourceFile) -> Report {
    let labels = diag
        .labels
        .iter()
        .map(|label| {
            let clamped = source.clamp_span(&label.span);
            LabeledSpan::new_primary_with_span(
                Some(label.message.clone()),
                (clamped.start, clamped.end - clamped.start),
            )
        })
        .collect();

    let diagnostic = BuiltDiagnostic {
        message: diag.message.clone(),
        severity: match diag.severity {
            DiagSeverity::Error => Severity::Error,
            DiagSeverity::Warning => Severity::Warning,
        },
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels,
    };

    Report::new(diagnostic).with_source_code(source.content().to_string())
}

/// The final diagnostic type that implements miette's `Diagnostic` trait.
#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    severity: Severity,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}
