//! Document storage: a generational slot arena that owns every node.
//!
//! The C-family ancestors of this data structure link siblings with raw
//! pointers; here the nodes live in a vector of slots and children are held
//! as [`NodeId`] indices, which keeps detach/insert cheap while making a
//! dangling handle detectable instead of undefined.
//!
//! # Key design decisions
//!
//! - **Generations over reference counting**: each slot carries a generation
//!   that is bumped on free. A handle whose generation no longer matches
//!   resolves to nothing, so every operation on a destroyed node degrades to
//!   its neutral failure value (`None`, `false`, empty slice).
//! - **Ownership flag honored during teardown**: [`Document::destroy`] walks
//!   the subtree iteratively and only recurses into `Owned` children. A
//!   `Reference` alias frees its single slot and never touches its target.
//! - **Destroy requires a detached node**: freeing a node that is still
//!   inside a parent would leave the parent holding a dead handle, so the
//!   call fails instead. `delete_from_array`/`delete_from_object` are the
//!   one-call path for attached children.

use crate::types::{Kind, Node, NodeId, Ownership};

/// A slot either holds a live node or sits on the free list. The generation
/// survives reuse so stale handles keep failing.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An arena of JSON nodes. All creation, mutation, and traversal goes
/// through a `Document`; handles from one document are meaningless in
/// another (and will be rejected by the generation check in practice).
#[derive(Debug, Default, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Document::default()
    }

    /// An empty document with room for `nodes` nodes before reallocating.
    pub fn with_capacity(nodes: usize) -> Self {
        Document {
            slots: Vec::with_capacity(nodes),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes across all trees in this document.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// True if `id` currently resolves to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Follow a `Reference` alias to the node it stands for. `Owned` nodes
    /// resolve to themselves; an alias whose owner is gone resolves to
    /// nothing.
    pub(crate) fn resolve(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        match node.ownership {
            Ownership::Owned => Some(id),
            Ownership::Reference => {
                let target = node.target?;
                self.node(target).map(|_| target)
            }
        }
    }

    /// Link `child` under `parent` with the given member key. Callers have
    /// already validated kinds, ownership, and the single-parent invariant.
    pub(crate) fn attach(&mut self, parent: NodeId, key: Option<String>, child: NodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
            node.key = key;
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Free one slot, returning its node and invalidating outstanding
    /// handles to it.
    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    /// Destroy a detached node and, for `Owned` nodes, its whole subtree.
    ///
    /// Returns `false` if the handle is stale or the node still has a
    /// parent. The walk is iterative, so teardown depth is bounded by heap,
    /// not stack. `Reference` nodes encountered anywhere in the subtree
    /// free only themselves.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) if node.parent.is_none() => {}
            _ => return false,
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.release(next) {
                if node.ownership == Ownership::Owned {
                    stack.extend(node.children);
                }
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Read accessors
    //
    // All of these accept any handle and answer neutrally when the kind
    // does not fit, so callers may probe without checking first.
    // ------------------------------------------------------------------

    /// The node's kind, or `None` for a stale handle.
    pub fn kind(&self, id: NodeId) -> Option<Kind> {
        self.node(id).map(|node| node.kind)
    }

    /// The node's ownership discipline, or `None` for a stale handle.
    pub fn ownership(&self, id: NodeId) -> Option<Ownership> {
        self.node(id).map(|node| node.ownership)
    }

    pub fn is_null(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::Null)
    }

    pub fn is_false(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::False)
    }

    pub fn is_true(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::True)
    }

    /// True for both boolean kinds.
    pub fn is_bool(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(Kind::False) | Some(Kind::True))
    }

    pub fn is_number(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::Number)
    }

    pub fn is_string(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::String)
    }

    pub fn is_raw(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::Raw)
    }

    pub fn is_array(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::Array)
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        self.kind(id) == Some(Kind::Object)
    }

    /// The numeric value of a `Number` node.
    pub fn number_value(&self, id: NodeId) -> Option<f64> {
        let node = self.node(id)?;
        if node.kind == Kind::Number {
            Some(node.number)
        } else {
            None
        }
    }

    /// The value of a boolean node.
    pub fn bool_value(&self, id: NodeId) -> Option<bool> {
        match self.kind(id)? {
            Kind::True => Some(true),
            Kind::False => Some(false),
            _ => None,
        }
    }

    /// The text of a `String` node. A string alias reads through to its
    /// owner's buffer.
    pub fn string_value(&self, id: NodeId) -> Option<&str> {
        let resolved = self.resolve(id)?;
        let node = self.node(resolved)?;
        if node.kind == Kind::String {
            node.text.as_deref()
        } else {
            None
        }
    }

    /// The verbatim fragment of a `Raw` node.
    pub fn raw_value(&self, id: NodeId) -> Option<&str> {
        let resolved = self.resolve(id)?;
        let node = self.node(resolved)?;
        if node.kind == Kind::Raw {
            node.text.as_deref()
        } else {
            None
        }
    }

    /// The member name this node carries inside its parent object. The key
    /// belongs to the member node itself, so an alias keeps its own key.
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.key.as_deref()
    }

    /// The containing array or object, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// The children of a container in insertion order. References read
    /// through to their target's children; anything else yields an empty
    /// slice.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        let Some(resolved) = self.resolve(id) else {
            return &[];
        };
        match self.node(resolved) {
            Some(node) if node.kind.is_container() => &node.children,
            _ => &[],
        }
    }

    /// Number of children of an array or object (member count for objects).
    /// `None` for stale handles and non-containers, never a crash.
    pub fn array_size(&self, id: NodeId) -> Option<usize> {
        let resolved = self.resolve(id)?;
        let node = self.node(resolved)?;
        if node.kind.is_container() {
            Some(node.children.len())
        } else {
            None
        }
    }

    /// The `index`-th child of an array (or object), if in range.
    pub fn item(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }
}
