//! Deep structural equality between two trees.
//!
//! Equality is shape plus value: kinds must match exactly (the two boolean
//! kinds are distinct), numbers compare by exact float equality, text by
//! exact bytes, arrays pairwise in order, and objects member-by-member
//! independent of order. The key policy (exact vs ASCII-folded) applies to
//! object member lookup only, never to string values.

use crate::arena::Document;
use crate::types::{KeyMatch, Kind, NodeId};

impl Document {
    /// Deep structural equality. Aliases compare through their targets, a
    /// node always equals itself, and a stale handle equals nothing.
    ///
    /// Object members match by first-match lookup in both directions under
    /// the chosen key policy, with a size check up front, so objects that
    /// differ only in member order compare equal while extra or missing
    /// members do not.
    pub fn compare(&self, a: NodeId, b: NodeId, case_sensitive: bool) -> bool {
        let case = if case_sensitive {
            KeyMatch::Exact
        } else {
            KeyMatch::AsciiFold
        };
        self.compare_resolved(a, b, case)
    }

    fn compare_resolved(&self, a: NodeId, b: NodeId, case: KeyMatch) -> bool {
        let (Some(a), Some(b)) = (self.resolve(a), self.resolve(b)) else {
            return false;
        };
        if a == b {
            return true;
        }
        let (Some(node_a), Some(node_b)) = (self.node(a), self.node(b)) else {
            return false;
        };
        if node_a.kind != node_b.kind {
            return false;
        }
        match node_a.kind {
            Kind::Null | Kind::False | Kind::True => true,
            // Exact equality: NaN never equals, and -0.0 equals 0.0, as
            // float comparison defines it.
            Kind::Number => node_a.number == node_b.number,
            Kind::String | Kind::Raw => node_a.text == node_b.text,
            Kind::Array => {
                node_a.children.len() == node_b.children.len()
                    && node_a
                        .children
                        .iter()
                        .zip(&node_b.children)
                        .all(|(&x, &y)| self.compare_resolved(x, y, case))
            }
            Kind::Object => {
                if node_a.children.len() != node_b.children.len() {
                    return false;
                }
                // Both directions, so a duplicate key on one side cannot
                // hide a mismatch on the other.
                self.members_covered(a, b, case) && self.members_covered(b, a, case)
            }
        }
    }

    /// Every member of `from` has a recursively equal first-match partner
    /// in `into`.
    fn members_covered(&self, from: NodeId, into: NodeId, case: KeyMatch) -> bool {
        for &member in self.children(from) {
            let Some(key) = self.node(member).and_then(|node| node.key.as_deref()) else {
                return false;
            };
            let Some(counterpart) = self.get(into, key, case) else {
                return false;
            };
            if !self.compare_resolved(member, counterpart, case) {
                return false;
            }
        }
        true
    }
}
