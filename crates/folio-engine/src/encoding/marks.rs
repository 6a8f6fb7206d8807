//! Mark resolution during the surface walk.

use crate::model::{Mark, MarkDef, Span};

/// Decorations inherited from enclosing elements.
///
/// Immutable: entering a decorating element produces a new set for that
/// subtree, and leaves pick up the set in force where they sit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMarks(Vec<Mark>);

impl ActiveMarks {
    /// A copy of this set with `mark` added (outermost first).
    pub fn with(&self, mark: Mark) -> Self {
        let mut marks = self.0.clone();
        if !marks.contains(&mark) {
            marks.push(mark);
        }
        Self(marks)
    }

    pub fn apply(&self, span: Span) -> Span {
        span.with_marks(self.0.iter().cloned())
    }
}

/// Link definitions created during one encode, keyed by the mark key their
/// spans carry.
#[derive(Debug, Default)]
pub struct MarkDefTable {
    defs: Vec<MarkDef>,
}

impl MarkDefTable {
    /// Registers a new link definition and returns its key.
    pub fn register_link(&mut self, href: &str) -> String {
        let def = MarkDef::link(href);
        let key = def.key().to_string();
        self.defs.push(def);
        key
    }

    /// The definitions referenced by at least one of `spans`, in registration
    /// order.
    pub fn referenced_by(&self, spans: &[Span]) -> Vec<MarkDef> {
        self.defs
            .iter()
            .filter(|def| spans.iter().any(|s| s.references(def.key())))
            .cloned()
            .collect()
    }
}
