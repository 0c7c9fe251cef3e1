//! Non-fatal findings. Generation continues with a best-effort type and the
//! finding is handed back to the caller instead of being printed.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the schema was found, e.g. `GET /pets` or `#/components/schemas/Pet`.
    pub location: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `anyOf` over several object schemas; emitted as a plain union.
    AnyOfObjects { members: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::AnyOfObjects { members } => write!(
                f,
                "{}: anyOf over {members} object schemas is not converted to the equivalent TypeScript type",
                self.location
            ),
        }
    }
}

/// Collector handed down the lowering passes for one location.
#[derive(Debug, Default)]
pub struct Diagnostics {
    location: String,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn at(location: impl Into<String>) -> Self {
        Self { location: location.into(), items: Vec::new() }
    }

    pub fn push(&mut self, kind: DiagnosticKind) {
        self.items.push(Diagnostic { location: self.location.clone(), kind });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
