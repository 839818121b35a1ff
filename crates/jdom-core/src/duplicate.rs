//! Deep and shallow cloning.
//!
//! A duplicate is always a brand-new owned tree: duplicating an alias (or
//! a tree containing aliases) resolves each alias and copies what it stands
//! for, so the copy never shares text or children with the source and can
//! be destroyed independently.

use crate::arena::Document;
use crate::types::{Node, NodeId};

impl Document {
    /// Clone a subtree into a fresh, parentless, fully owned tree.
    ///
    /// With `recursive` false only the node's own value is copied; for a
    /// container that yields an empty container of the same kind. The
    /// duplicate's root carries no member name even when the source was an
    /// object member; descendant member names are preserved.
    ///
    /// `None` if the handle is stale or a dangling alias is encountered,
    /// in which case nothing new is left behind in the document.
    pub fn duplicate(&mut self, id: NodeId, recursive: bool) -> Option<NodeId> {
        let copy = self.duplicate_inner(id, recursive)?;
        if let Some(node) = self.node_mut(copy) {
            node.key = None;
        }
        Some(copy)
    }

    fn duplicate_inner(&mut self, id: NodeId, recursive: bool) -> Option<NodeId> {
        // The member name lives on the node itself (an alias keeps its own
        // name); the payload is read through the alias.
        let key = self.node(id)?.key.clone();
        let source = self.resolve(id)?;
        let (kind, number, number_text, text, children) = {
            let node = self.node(source)?;
            (
                node.kind,
                node.number,
                node.number_text.clone(),
                node.text.clone(),
                if recursive {
                    node.children.clone()
                } else {
                    Vec::new()
                },
            )
        };
        let mut copy_node = Node::new(kind);
        copy_node.key = key;
        copy_node.number = number;
        copy_node.number_text = number_text;
        copy_node.text = text;
        let copy = self.alloc(copy_node);
        for child in children {
            let Some(child_copy) = self.duplicate_inner(child, true) else {
                self.destroy(copy);
                return None;
            };
            if let Some(node) = self.node_mut(child_copy) {
                node.parent = Some(copy);
            }
            if let Some(node) = self.node_mut(copy) {
                node.children.push(child_copy);
            }
        }
        Some(copy)
    }
}
