//! The arena backing a container tree, and the scope-aware walks over it.
//!
//! Every container of one tree is a [`Node`] in a single arena. Nodes refer
//! to each other by [`NodeId`] only, so the parent/children links never form
//! ownership cycles. All walks are loops or explicit worklists.

use crate::error::{Error, Result};
use crate::key::RegistrationKey;
use crate::postponed::{PendingCallback, PostponedAction};
use crate::registration::Binding;
use crate::scope::Scope;
use generational_arena::{Arena, Index};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{trace, warn};

/// Opaque handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(Index);

pub(crate) struct Node {
  parent: Option<NodeId>,
  // Insertion order; this is the order children are searched in.
  children: Vec<NodeId>,
  registrations: HashMap<RegistrationKey, Rc<dyn Binding>>,
  postponed: HashMap<RegistrationKey, PostponedAction>,
}

impl Node {
  fn new(parent: Option<NodeId>) -> Self {
    Self {
      parent,
      children: Vec::new(),
      registrations: HashMap::new(),
      postponed: HashMap::new(),
    }
  }

  pub(crate) fn children(&self) -> &[NodeId] {
    &self.children
  }

  /// The registrations whose value has already been produced.
  pub(crate) fn created_bindings(&self) -> Vec<Rc<dyn Binding>> {
    self
      .registrations
      .values()
      .filter(|binding| binding.is_value_created())
      .cloned()
      .collect()
  }
}

pub(crate) struct Tree {
  nodes: Arena<Node>,
  this: Weak<RefCell<Tree>>,
}

impl Tree {
  /// Creates a tree holding a single parentless node.
  pub(crate) fn new_root() -> (Rc<RefCell<Tree>>, NodeId) {
    let mut nodes = Arena::new();
    let root = NodeId(nodes.insert(Node::new(None)));
    let tree = Rc::new_cyclic(|this| {
      RefCell::new(Tree {
        nodes,
        this: this.clone(),
      })
    });
    (tree, root)
  }

  /// Adds a node under `parent` and links it into the parent's children.
  pub(crate) fn insert_child(&mut self, parent: NodeId) -> Result<NodeId> {
    if !self.is_alive(parent) {
      return Err(Error::Disposed);
    }
    let id = NodeId(self.nodes.insert(Node::new(Some(parent))));
    if let Some(node) = self.nodes.get_mut(parent.0) {
      node.children.push(id);
    }
    Ok(id)
  }

  /// Removes a node and unlinks it from its parent. Its children stay in the
  /// arena; the caller is expected to remove them next.
  pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
    let node = self.nodes.remove(id.0)?;
    if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p.0)) {
      parent.children.retain(|child| *child != id);
    }
    Some(node)
  }

  pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.0)
  }

  pub(crate) fn is_alive(&self, id: NodeId) -> bool {
    self.nodes.contains(id.0)
  }

  pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).and_then(|node| node.parent)
  }

  /// Nodes strictly above `id`, nearest first.
  pub(crate) fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
    Ancestors {
      tree: self,
      next: self.parent(id),
    }
  }

  /// Nodes strictly below `id`, pre-order depth-first in insertion order.
  pub(crate) fn descendants(&self, id: NodeId) -> Descendants<'_> {
    let stack: Vec<NodeId> = self
      .node(id)
      .map(|node| node.children.iter().rev().copied().collect())
      .unwrap_or_default();
    Descendants { tree: self, stack }
  }

  fn topmost_live(&self, id: NodeId) -> NodeId {
    self
      .ancestors(id)
      .take_while(|ancestor| self.is_alive(*ancestor))
      .last()
      .unwrap_or(id)
  }

  // --- Existence ---

  pub(crate) fn contains_local(&self, id: NodeId, key: &RegistrationKey) -> bool {
    self
      .node(id)
      .is_some_and(|node| node.registrations.contains_key(key))
  }

  pub(crate) fn contains_parent(&self, id: NodeId, key: &RegistrationKey) -> bool {
    self
      .ancestors(id)
      .any(|ancestor| self.contains_local(ancestor, key))
  }

  pub(crate) fn contains_children(&self, id: NodeId, key: &RegistrationKey) -> bool {
    self
      .descendants(id)
      .any(|descendant| self.contains_local(descendant, key))
  }

  pub(crate) fn contains(&self, id: NodeId, key: &RegistrationKey, scope: Scope) -> bool {
    (scope.contains(Scope::LOCAL) && self.contains_local(id, key))
      || (scope.contains(Scope::PARENT) && self.contains_parent(id, key))
      || (scope.contains(Scope::CHILDREN) && self.contains_children(id, key))
  }

  // --- First match ---

  fn first_local(&self, id: NodeId, key: &RegistrationKey) -> Option<(NodeId, Rc<dyn Binding>)> {
    self
      .node(id)
      .and_then(|node| node.registrations.get(key))
      .map(|binding| (id, binding.clone()))
  }

  /// Finds the registration a resolve of `key` under `scope` should use,
  /// together with the node that owns it.
  ///
  /// Precedence is local, then the nearest ancestor, then the first
  /// descendant in pre-order.
  pub(crate) fn first(
    &self,
    id: NodeId,
    key: &RegistrationKey,
    scope: Scope,
  ) -> Option<(NodeId, Rc<dyn Binding>)> {
    if scope.contains(Scope::LOCAL) {
      if let Some(found) = self.first_local(id, key) {
        return Some(found);
      }
    }
    if scope.contains(Scope::PARENT) {
      if let Some(found) = self
        .ancestors(id)
        .find_map(|ancestor| self.first_local(ancestor, key))
      {
        return Some(found);
      }
    }
    if scope.contains(Scope::CHILDREN) {
      return self
        .descendants(id)
        .find_map(|descendant| self.first_local(descendant, key));
    }
    None
  }

  // --- Registration and postponement ---

  /// Inserts a binding into the node's own table and hands back the postponed
  /// action parked on that same node for the key, if any.
  pub(crate) fn register(
    &mut self,
    id: NodeId,
    key: &RegistrationKey,
    binding: Rc<dyn Binding>,
  ) -> Result<Option<PostponedAction>> {
    let node = self.nodes.get_mut(id.0).ok_or(Error::Disposed)?;
    if node.registrations.contains_key(key) {
      return Err(Error::DuplicateRegistration { key: key.clone() });
    }
    node.registrations.insert(key.clone(), binding);
    Ok(node.postponed.remove(key))
  }

  /// Files `callback` on the node's own postponed table for `key`.
  pub(crate) fn park(&mut self, id: NodeId, key: &RegistrationKey, callback: &PendingCallback) {
    let this = self.this.clone();
    let Some(node) = self.nodes.get_mut(id.0) else {
      return;
    };
    let action = node.postponed.entry(key.clone()).or_insert_with(|| {
      let key = key.clone();
      PostponedAction::new(move || {
        if let Some(tree) = this.upgrade() {
          tree.borrow_mut().prune(id, &key);
        }
      })
    });
    action.postpone(callback.clone());
    trace!(key = %key, pending = action.len(), "parked postponed callback");
  }

  /// Removes every postponed action for `key` from the tree `from` belongs to.
  ///
  /// The walk starts at the topmost live ancestor of `from`, so it still
  /// covers the remaining nodes when a dispose cascade has already removed
  /// the nodes above them.
  pub(crate) fn prune(&mut self, from: NodeId, key: &RegistrationKey) -> usize {
    let top = self.topmost_live(from);
    let mut targets = vec![top];
    targets.extend(self.descendants(top));

    let mut pruned = 0;
    for id in targets {
      if let Some(node) = self.nodes.get_mut(id.0) {
        if node.postponed.remove(key).is_some() {
          pruned += 1;
        }
      }
    }
    trace!(key = %key, pruned, "pruned postponed actions from tree");
    pruned
  }
}

impl Drop for Tree {
  fn drop(&mut self) {
    if !self.nodes.is_empty() {
      warn!(
        live = self.nodes.len(),
        "container tree dropped without being disposed; produced services were not torn down"
      );
    }
  }
}

pub(crate) struct Ancestors<'t> {
  tree: &'t Tree,
  next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.next?;
    self.next = self.tree.parent(current);
    Some(current)
  }
}

pub(crate) struct Descendants<'t> {
  tree: &'t Tree,
  stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let current = self.stack.pop()?;
    if let Some(node) = self.tree.node(current) {
      self.stack.extend(node.children.iter().rev().copied());
    }
    Some(current)
  }
}
