//! Tree construction and mutation.
//!
//! Constructors hand back a fresh detached node; mutators rearrange nodes
//! that already exist. Every mutator validates before it moves anything:
//!
//! - **Single parent**: an item that is still inside a container is never
//!   attached elsewhere, and attaching a node to itself or to one of its
//!   own descendants is rejected rather than building a cycle.
//! - **Owned containers only**: a `Reference` container is a read-only view
//!   of someone else's children; mutating through it would alias state the
//!   owner tears down later.
//! - **Neutral failure**: a bad handle, a wrong kind, or a contract
//!   violation answers `false`/`None` and leaves the tree untouched.

use crate::arena::Document;
use crate::printer::render_number;
use crate::types::{KeyMatch, Kind, Node, NodeId, Ownership};

impl Document {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    /// A fresh detached `null` node.
    pub fn create_null(&mut self) -> NodeId {
        self.alloc(Node::new(Kind::Null))
    }

    /// A fresh detached boolean node.
    pub fn create_bool(&mut self, value: bool) -> NodeId {
        self.alloc(Node::new(if value { Kind::True } else { Kind::False }))
    }

    /// A fresh detached number node. Finite values also get their textual
    /// rendering cached so later prints are exact and cheap.
    pub fn create_number(&mut self, value: f64) -> NodeId {
        let mut node = Node::new(Kind::Number);
        node.number = value;
        node.number_text = render_number(value);
        self.alloc(node)
    }

    /// A fresh detached string node owning a copy of `text`.
    pub fn create_string(&mut self, text: &str) -> NodeId {
        let mut node = Node::new(Kind::String);
        node.text = Some(text.to_owned());
        self.alloc(node)
    }

    /// A fresh detached raw node. The fragment is printed verbatim later,
    /// with no escaping and no validation; the caller vouches that it is
    /// well-formed JSON.
    pub fn create_raw(&mut self, json: &str) -> NodeId {
        let mut node = Node::new(Kind::Raw);
        node.text = Some(json.to_owned());
        self.alloc(node)
    }

    /// A fresh detached empty array.
    pub fn create_array(&mut self) -> NodeId {
        self.alloc(Node::new(Kind::Array))
    }

    /// A fresh detached empty object.
    pub fn create_object(&mut self) -> NodeId {
        self.alloc(Node::new(Kind::Object))
    }

    /// An array populated with one number node per value.
    pub fn create_number_array(&mut self, values: &[f64]) -> NodeId {
        let array = self.create_array();
        for &value in values {
            let item = self.create_number(value);
            self.attach(array, None, item);
        }
        array
    }

    /// An array populated with one string node per value.
    pub fn create_string_array(&mut self, values: &[&str]) -> NodeId {
        let array = self.create_array();
        for &value in values {
            let item = self.create_string(value);
            self.attach(array, None, item);
        }
        array
    }

    // ------------------------------------------------------------------
    // Reference constructors
    //
    // These place an existing subtree at a second location without copying
    // it and without creating a second owner. The alias is flattened at
    // creation: referencing a reference aliases the ultimate owner, so
    // alias validity never depends on an intermediate wrapper.
    // ------------------------------------------------------------------

    fn create_reference(&mut self, target: NodeId, expected: Kind) -> Option<NodeId> {
        let resolved = self.resolve(target)?;
        if self.kind(resolved)? != expected {
            return None;
        }
        Some(self.alloc(Node::reference(expected, resolved)))
    }

    /// A non-owning alias of a string node. `None` if `target` is stale or
    /// not a string.
    pub fn create_string_reference(&mut self, target: NodeId) -> Option<NodeId> {
        self.create_reference(target, Kind::String)
    }

    /// A non-owning alias of an array. `None` if `target` is stale or not
    /// an array.
    pub fn create_array_reference(&mut self, target: NodeId) -> Option<NodeId> {
        self.create_reference(target, Kind::Array)
    }

    /// A non-owning alias of an object. `None` if `target` is stale or not
    /// an object.
    pub fn create_object_reference(&mut self, target: NodeId) -> Option<NodeId> {
        self.create_reference(target, Kind::Object)
    }

    // ------------------------------------------------------------------
    // Attachment guards
    // ------------------------------------------------------------------

    /// True if `id` is a live, `Owned` container of the given kind.
    fn owned_container(&self, id: NodeId, kind: Kind) -> bool {
        matches!(
            self.node(id),
            Some(node) if node.kind == kind && node.ownership == Ownership::Owned
        )
    }

    /// True if `item` may be attached under `container`: live, parentless,
    /// and not the container itself or one of the container's ancestors.
    /// An alias whose target sits on that ancestor chain is rejected too,
    /// since printing through it would never terminate. (An alias buried
    /// deeper inside `item` can still close a cycle; that remains a caller
    /// contract, as with the rest of the aliasing discipline.)
    fn attachable(&self, container: NodeId, item: NodeId) -> bool {
        match self.node(item) {
            Some(node) if node.parent.is_none() => {}
            _ => return false,
        }
        if self.is_ancestor_or_self(item, container) {
            return false;
        }
        if let Some(target) = self.node(item).and_then(|node| node.target) {
            if self.is_ancestor_or_self(target, container) {
                return false;
            }
        }
        true
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.node(id).and_then(|node| node.parent);
        }
        false
    }

    // ------------------------------------------------------------------
    // Array mutators
    // ------------------------------------------------------------------

    /// Append `item` at the end of `array`. Fails if `array` is not an
    /// owned array or `item` is attached somewhere already.
    pub fn append(&mut self, array: NodeId, item: NodeId) -> bool {
        if !self.owned_container(array, Kind::Array) || !self.attachable(array, item) {
            return false;
        }
        self.attach(array, None, item);
        true
    }

    /// Insert `item` before position `index`; `index` is clamped to the
    /// current length, so inserting at or past the end appends.
    pub fn insert(&mut self, array: NodeId, index: usize, item: NodeId) -> bool {
        if !self.owned_container(array, Kind::Array) || !self.attachable(array, item) {
            return false;
        }
        if let Some(node) = self.node_mut(item) {
            node.parent = Some(array);
            node.key = None;
        }
        if let Some(node) = self.node_mut(array) {
            let at = index.min(node.children.len());
            node.children.insert(at, item);
        }
        true
    }

    /// Replace the occupant of position `index` with `item`, destroying the
    /// old occupant according to its ownership flag. `false` if `index` is
    /// out of range.
    pub fn replace_in_array(&mut self, array: NodeId, index: usize, item: NodeId) -> bool {
        if !self.owned_container(array, Kind::Array) {
            return false;
        }
        let old = match self.node(array).and_then(|node| node.children.get(index)) {
            Some(&old) => old,
            None => return false,
        };
        self.replace(old, item)
    }

    /// Remove and return the node at `index`, parent link and key cleared.
    /// The caller now controls it: re-insert it somewhere or `destroy` it.
    pub fn detach_from_array(&mut self, array: NodeId, index: usize) -> Option<NodeId> {
        if !self.owned_container(array, Kind::Array) {
            return None;
        }
        let child = *self.node(array)?.children.get(index)?;
        if self.detach(child) {
            Some(child)
        } else {
            None
        }
    }

    /// Detach and destroy the node at `index`.
    pub fn delete_from_array(&mut self, array: NodeId, index: usize) -> bool {
        match self.detach_from_array(array, index) {
            Some(child) => self.destroy(child),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // By-handle mutators
    // ------------------------------------------------------------------

    /// Remove `id` from whatever container holds it. The parent link and
    /// member key are cleared; the node itself stays alive, owned by the
    /// caller. `false` if the node is already detached or stale.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let parent = match self.node(id).and_then(|node| node.parent) {
            Some(parent) => parent,
            None => return false,
        };
        if let Some(node) = self.node_mut(parent) {
            if let Some(position) = node.children.iter().position(|&child| child == id) {
                node.children.remove(position);
            }
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
            node.key = None;
        }
        true
    }

    /// Splice `new` into `old`'s position under `old`'s parent, then
    /// destroy `old`. Under an object parent the member name carries over
    /// to `new`. Fails if `old` is detached or `new` is not attachable.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let parent = match self.node(old).and_then(|node| node.parent) {
            Some(parent) => parent,
            None => return false,
        };
        if !self.attachable(parent, new) {
            return false;
        }
        let key = self.node(old).and_then(|node| node.key.clone());
        let position = match self
            .node(parent)
            .and_then(|node| node.children.iter().position(|&child| child == old))
        {
            Some(position) => position,
            None => return false,
        };
        if let Some(node) = self.node_mut(parent) {
            node.children[position] = new;
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
            node.key = key;
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
            node.key = None;
        }
        self.destroy(old);
        true
    }

    // ------------------------------------------------------------------
    // Object mutators
    // ------------------------------------------------------------------

    /// True if `object` has a member named `key` under the given policy.
    pub fn has(&self, object: NodeId, key: &str, case: KeyMatch) -> bool {
        self.get(object, key, case).is_some()
    }

    /// First member named `key` under the given policy. Duplicate keys are
    /// legal; later duplicates are only reachable through [`children`].
    ///
    /// [`children`]: Document::children
    pub fn get(&self, object: NodeId, key: &str, case: KeyMatch) -> Option<NodeId> {
        let resolved = self.resolve(object)?;
        let node = self.node(resolved)?;
        if node.kind != Kind::Object {
            return None;
        }
        node.children.iter().copied().find(|&child| {
            self.node(child)
                .and_then(|node| node.key.as_deref())
                .is_some_and(|member| case.matches(member, key))
        })
    }

    /// Append `item` as a member named `key`. Always appends: adding an
    /// existing key yields a duplicate member, as the wire format permits.
    pub fn add(&mut self, object: NodeId, key: &str, item: NodeId) -> bool {
        if !self.owned_container(object, Kind::Object) || !self.attachable(object, item) {
            return false;
        }
        self.attach(object, Some(key.to_owned()), item);
        true
    }

    /// Replace the first member matching `key`, or append `item` under that
    /// name when no member matches. The new child ends up named `key`
    /// either way.
    pub fn replace_in_object(
        &mut self,
        object: NodeId,
        key: &str,
        item: NodeId,
        case: KeyMatch,
    ) -> bool {
        if !self.owned_container(object, Kind::Object) {
            return false;
        }
        match self.get(object, key, case) {
            Some(old) => {
                if !self.replace(old, item) {
                    return false;
                }
                if let Some(node) = self.node_mut(item) {
                    node.key = Some(key.to_owned());
                }
                true
            }
            None => self.add(object, key, item),
        }
    }

    /// Remove and return the first member matching `key`, parent link and
    /// member name cleared.
    pub fn detach_from_object(
        &mut self,
        object: NodeId,
        key: &str,
        case: KeyMatch,
    ) -> Option<NodeId> {
        if !self.owned_container(object, Kind::Object) {
            return None;
        }
        let child = self.get(object, key, case)?;
        if self.detach(child) {
            Some(child)
        } else {
            None
        }
    }

    /// Detach and destroy the first member matching `key`.
    pub fn delete_from_object(&mut self, object: NodeId, key: &str, case: KeyMatch) -> bool {
        match self.detach_from_object(object, key, case) {
            Some(child) => self.destroy(child),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Create-and-add conveniences
    //
    // Ergonomics only; the ownership contract is exactly `create_*` then
    // `add`. On a failed add the half-made node is destroyed, so the
    // document is left as it was found.
    // ------------------------------------------------------------------

    fn add_or_discard(&mut self, object: NodeId, key: &str, item: NodeId) -> Option<NodeId> {
        if self.add(object, key, item) {
            Some(item)
        } else {
            self.destroy(item);
            None
        }
    }

    /// Add a fresh `null` member and return it.
    pub fn add_null(&mut self, object: NodeId, key: &str) -> Option<NodeId> {
        let item = self.create_null();
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh boolean member and return it.
    pub fn add_bool(&mut self, object: NodeId, key: &str, value: bool) -> Option<NodeId> {
        let item = self.create_bool(value);
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh number member and return it.
    pub fn add_number(&mut self, object: NodeId, key: &str, value: f64) -> Option<NodeId> {
        let item = self.create_number(value);
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh string member and return it.
    pub fn add_string(&mut self, object: NodeId, key: &str, text: &str) -> Option<NodeId> {
        let item = self.create_string(text);
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh raw member and return it.
    pub fn add_raw(&mut self, object: NodeId, key: &str, json: &str) -> Option<NodeId> {
        let item = self.create_raw(json);
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh empty array member and return it.
    pub fn add_array(&mut self, object: NodeId, key: &str) -> Option<NodeId> {
        let item = self.create_array();
        self.add_or_discard(object, key, item)
    }

    /// Add a fresh empty object member and return it.
    pub fn add_object(&mut self, object: NodeId, key: &str) -> Option<NodeId> {
        let item = self.create_object();
        self.add_or_discard(object, key, item)
    }

    // ------------------------------------------------------------------
    // In-place value mutation
    // ------------------------------------------------------------------

    /// Overwrite a number node's value and refresh its cached rendering
    /// atomically, returning the new cached string. A non-finite value is
    /// stored but invalidates the cache (there is no JSON rendering for
    /// it), and `None` is returned.
    pub fn set_number(&mut self, id: NodeId, value: f64) -> Option<&str> {
        let node = self.node_mut(id)?;
        if node.kind != Kind::Number {
            return None;
        }
        node.number = value;
        node.number_text = render_number(value);
        node.number_text.as_deref()
    }

    /// Replace an owned string node's text, returning the previous owned
    /// text to the caller. Fails on a non-string node and on a string
    /// alias, whose text belongs to its owner and must not be replaced
    /// destructively.
    pub fn set_string(&mut self, id: NodeId, text: &str) -> Option<String> {
        let node = self.node_mut(id)?;
        if node.kind != Kind::String || node.ownership != Ownership::Owned {
            return None;
        }
        node.text.replace(text.to_owned())
    }

    /// Flip a boolean node in place. Key, parent, and siblings are left
    /// untouched. `false` if the node is not a boolean.
    pub fn set_bool(&mut self, id: NodeId, value: bool) -> bool {
        let node = match self.node_mut(id) {
            Some(node) => node,
            None => return false,
        };
        if !matches!(node.kind, Kind::False | Kind::True) {
            return false;
        }
        node.kind = if value { Kind::True } else { Kind::False };
        true
    }

    /// Overwrite a number node's cached rendering. Used where the caller
    /// already has the authoritative textual form (the parser's lexeme,
    /// serde's own rendering) and the value round-trips through it.
    pub(crate) fn set_number_text(&mut self, id: NodeId, text: String) {
        if let Some(node) = self.node_mut(id) {
            node.number_text = Some(text);
        }
    }
}
