use std::collections::HashSet;

use super::{Block, Document};

/// Validates the structural invariants of an encoded document.
///
/// Asserts that:
/// - The document has at least one block
/// - Every text block has at least one span
/// - Every def-backed mark resolves to a definition in the same block
/// - Every definition is referenced by at least one span
/// - Definition keys are unique within a block
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &Document) {
    assert!(!doc.blocks.is_empty(), "document has no blocks");

    for block in &doc.blocks {
        let Block::Text(tb) = block else {
            continue;
        };
        assert!(
            !tb.children.is_empty(),
            "text block {} has no spans",
            tb.key
        );

        let mut seen = HashSet::new();
        for def in &tb.mark_defs {
            assert!(
                seen.insert(def.key()),
                "duplicate mark def {} in block {}",
                def.key(),
                tb.key
            );
            assert!(
                tb.children.iter().any(|s| s.references(def.key())),
                "dead mark def {} in block {}",
                def.key(),
                tb.key
            );
        }

        for span in &tb.children {
            for key in span.marks.iter().filter_map(|m| m.def_key()) {
                assert!(
                    seen.contains(key),
                    "span {} references undefined mark {key} in block {}",
                    span.key,
                    tb.key
                );
            }
        }
    }
}
