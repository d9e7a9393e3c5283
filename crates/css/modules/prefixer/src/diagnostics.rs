//! Authoring warnings collected while processing a stylesheet.

use core::fmt;
use css_syntax::{NodeId, SourcePosition, Stylesheet};
use serde::Serialize;

/// A warning attached to the node that caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub node: NodeId,
    /// The offending word inside the node, when there is one.
    pub word: Option<String>,
    pub position: Option<SourcePosition>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(formatter, "{position}: {}", self.message),
            None => formatter.write_str(&self.message),
        }
    }
}

/// Serializable form of a [`Diagnostic`], without the arena id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub message: String,
    pub word: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            message: diagnostic.message.clone(),
            word: diagnostic.word.clone(),
            line: diagnostic.position.map(|position| position.line),
            column: diagnostic.position.map(|position| position.column),
        }
    }
}

/// Diagnostics of one processing run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Record a warning about `node` and log it.
    pub fn warn(&mut self, sheet: &Stylesheet, node: NodeId, message: impl Into<String>) {
        self.push(sheet, node, message.into(), None);
    }

    /// Record a warning pointing at `word` inside `node`.
    pub fn warn_word(
        &mut self,
        sheet: &Stylesheet,
        node: NodeId,
        message: impl Into<String>,
        word: impl Into<String>,
    ) {
        self.push(sheet, node, message.into(), Some(word.into()));
    }

    fn push(&mut self, sheet: &Stylesheet, node: NodeId, message: String, word: Option<String>) {
        let position = sheet.get(node).and_then(|found| found.source);
        let diagnostic = Diagnostic {
            message,
            node,
            word,
            position,
        };
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
