//! Arena-backed XML element tree.
//!
//! Every element lives in one generational arena. Children are owned top-down
//! through each element's `children` list; `parent` and `root` are plain
//! [`NodeId`] back-references used for navigation only. Removing an element
//! frees its whole subtree, and the generational index makes any handle that
//! still points into it fail to resolve.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::entities::{Attribute, Element, ElementSpec, Value};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::NodePath;

/// Handle to an element in an [`XmlArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "#{}@{}", index, generation)
    }
}

/// Storage for any number of element trees.
///
/// A tree is identified by its root element; the arena itself is not a
/// document and carries no tree-level state.
#[derive(Debug)]
pub struct XmlArena {
    arena: Arena<Element>,
}

impl Default for XmlArena {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    /// Number of live elements across all trees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn element(&self, id: NodeId) -> DomainResult<&Element> {
        self.arena.get(id.0).ok_or(DomainError::NodeNotFound(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomainResult<&mut Element> {
        self.arena.get_mut(id.0).ok_or(DomainError::NodeNotFound(id))
    }

    /// Borrowed view of an element, or `None` for a stale handle.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena.get(id.0).map(|element| NodeRef {
            arena: self,
            id,
            element,
        })
    }

    pub fn node(&self, id: NodeId) -> DomainResult<NodeRef<'_>> {
        self.get(id).ok_or(DomainError::NodeNotFound(id))
    }

    // ------------------------------------------------------------
    // Construction & linking
    // ------------------------------------------------------------

    /// Creates a standalone element. It is its own root until attached.
    #[instrument(level = "trace", skip(self, spec))]
    pub fn new_node(&mut self, spec: impl Into<ElementSpec>, is_root: bool) -> NodeId {
        let ElementSpec {
            tag,
            attribute,
            value,
        } = spec.into();
        let id = NodeId(self.arena.insert_with(|index| Element {
            tag,
            attribute,
            value,
            parent: None,
            root: NodeId(index),
            is_root,
            children: Vec::new(),
        }));
        trace!(%id, is_root, "created element");
        id
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// Fails with `InvalidOperation` when `child` is `parent` or one of its
    /// ancestors. A child that already has a parent is moved.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.element(child)?;
        let new_root = self.element(parent)?.root;

        if parent == child || self.ancestors(parent)?.any(|a| a.id() == child) {
            return Err(DomainError::invalid("cannot add descendant as child"));
        }

        if let Some(old_parent) = self.element(child)?.parent {
            debug!(%child, %old_parent, "moving element to new parent");
            self.element_mut(old_parent)?.children.retain(|&c| c != child);
        }

        let element = self.element_mut(child)?;
        element.parent = Some(parent);
        element.is_root = false;
        self.element_mut(parent)?.children.push(child);
        self.restamp_root(child, new_root)?;
        Ok(())
    }

    fn restamp_root(&mut self, start: NodeId, root: NodeId) -> DomainResult<()> {
        let subtree: Vec<NodeId> = self.descendants(start)?.map(|n| n.id()).collect();
        for id in subtree {
            self.element_mut(id)?.root = root;
        }
        Ok(())
    }

    /// Links a freshly created element under an existing parent. The new
    /// element has no descendants so no cycle check is needed.
    fn insert_child(&mut self, parent: NodeId, spec: ElementSpec) -> DomainResult<NodeId> {
        let root = self.element(parent)?.root;
        let id = self.new_node(spec, false);
        let element = self.element_mut(id)?;
        element.parent = Some(parent);
        element.root = root;
        self.element_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Creates a new element and appends it to `parent`'s children.
    #[instrument(level = "trace", skip(self, spec))]
    pub fn make_child(&mut self, parent: NodeId, spec: impl Into<ElementSpec>) -> DomainResult<NodeId> {
        self.insert_child(parent, spec.into())
    }

    /// Creates a new element under `node`'s parent.
    ///
    /// `build` receives a spec carrying `node`'s tag and returns the spec of
    /// the sibling, so `|s| s` copies the tag and `|s| s.tag("other")` replaces it.
    #[instrument(level = "trace", skip(self, build))]
    pub fn make_sibling(
        &mut self,
        node: NodeId,
        build: impl FnOnce(ElementSpec) -> ElementSpec,
    ) -> DomainResult<NodeId> {
        let element = self.element(node)?;
        let parent = element
            .parent
            .ok_or_else(|| DomainError::invalid("root element cannot have siblings"))?;
        let spec = build(ElementSpec::new(element.tag.clone()));
        self.insert_child(parent, spec)
    }

    // ------------------------------------------------------------
    // Path addressing
    // ------------------------------------------------------------

    pub fn path(&self, id: NodeId) -> DomainResult<NodePath> {
        Ok(self.node(id)?.path())
    }

    /// Resolves `path` starting at `root`. An empty path yields `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn get_from_path(&self, root: NodeId, path: &NodePath) -> DomainResult<NodeId> {
        self.resolve(root, path, path)
    }

    /// Walks `indices` from `start`, reporting `requested` on failure.
    fn resolve(&self, start: NodeId, indices: &[usize], requested: &NodePath) -> DomainResult<NodeId> {
        let mut current = start;
        self.element(current)?;
        for &index in indices {
            current = *self
                .element(current)?
                .children
                .get(index)
                .ok_or_else(|| DomainError::out_of_range(requested))?;
        }
        Ok(current)
    }

    /// Removes the element at `path` together with its subtree and returns
    /// how many elements were freed.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_from_path(&mut self, root: NodeId, path: &NodePath) -> DomainResult<usize> {
        let (parent_path, index) = path
            .split_last()
            .ok_or_else(|| DomainError::invalid("cannot remove root element"))?;
        let parent = self.resolve(root, &parent_path, path)?;

        let children = &mut self.element_mut(parent)?.children;
        if index >= children.len() {
            return Err(DomainError::out_of_range(path));
        }
        let target = children.remove(index);

        let subtree: Vec<NodeId> = self.descendants(target)?.map(|n| n.id()).collect();
        for id in &subtree {
            self.arena.remove(id.0);
        }
        debug!(%path, removed = subtree.len(), "removed subtree");
        Ok(subtree.len())
    }

    // ------------------------------------------------------------
    // Traversal & metrics
    // ------------------------------------------------------------

    pub fn depth(&self, id: NodeId) -> DomainResult<usize> {
        Ok(self.node(id)?.depth())
    }

    pub fn no_children(&self, id: NodeId) -> DomainResult<usize> {
        Ok(self.element(id)?.children.len())
    }

    pub fn size(&self, id: NodeId) -> DomainResult<usize> {
        Ok(self.node(id)?.size())
    }

    pub fn last_child(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.element(id)?.children.last().copied())
    }

    /// Pre-order iterator over `id` and its subtree.
    pub fn descendants(&self, id: NodeId) -> DomainResult<Descendants<'_>> {
        Ok(self.node(id)?.descendants())
    }

    /// Iterator over the proper ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> DomainResult<Ancestors<'_>> {
        Ok(self.node(id)?.ancestors())
    }
}

/// Borrowed, read-only view of one element.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a XmlArena,
    id: NodeId,
    element: &'a Element,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn arena(&self) -> &'a XmlArena {
        self.arena
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn tag(&self) -> &'a str {
        &self.element.tag
    }

    pub fn attribute(&self) -> Option<&'a Attribute> {
        self.element.attribute.as_ref()
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.element.value.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.element.is_root
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.element.parent.and_then(|p| self.arena.get(p))
    }

    pub fn root_id(&self) -> NodeId {
        self.element.root
    }

    pub fn root(&self) -> Option<NodeRef<'a>> {
        self.arena.get(self.element.root)
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        self.element.children.iter().filter_map(move |&c| arena.get(c))
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.element
            .children
            .get(index)
            .and_then(|&c| self.arena.get(c))
    }

    pub fn no_children(&self) -> usize {
        self.element.children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.element.children.is_empty()
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.element
            .children
            .last()
            .and_then(|&c| self.arena.get(c))
    }

    /// Ancestor hops to the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Number of elements in this subtree, self included.
    pub fn size(&self) -> usize {
        self.descendants().count()
    }

    /// Position of this element, computed from the current tree shape.
    pub fn path(&self) -> NodePath {
        let mut indices = Vec::new();
        let mut current = *self;
        while let Some(parent) = current.parent() {
            if let Some(index) = parent.element.children.iter().position(|&c| c == current.id) {
                indices.push(index);
            }
            current = parent;
        }
        indices.reverse();
        NodePath::from(indices)
    }

    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            arena: self.arena,
            stack: vec![self.id],
        }
    }

    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            arena: self.arena,
            next: self.element.parent,
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.arena, other.arena)
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &self.element.tag)
            .field("children", &self.element.children.len())
            .finish()
    }
}

/// Lazy pre-order walk: an element, then each child's subtree in order.
pub struct Descendants<'a> {
    arena: &'a XmlArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.arena.get(id) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.element.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct Ancestors<'a> {
    arena: &'a XmlArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?)?;
        self.next = node.element.parent;
        Some(node)
    }
}
