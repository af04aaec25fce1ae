//! The `Container` handle and its associated methods.

use crate::binding::BindingBuilder;
use crate::error::{Error, Result};
use crate::key::RegistrationKey;
use crate::locator::ServiceLocator;
use crate::postponed::{Callback, PendingCallback};
use crate::registration::{downcast, Binding, Instance};
use crate::scope::Scope;
use crate::tree::{NodeId, Tree};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, trace};

/// A node in a tree of Inversion of Control (IoC) containers.
///
/// Each container owns its own registrations and postponed callbacks, and
/// can look beyond itself into its ancestors and descendants according to the
/// [`Scope`] passed to each call.
///
/// `Container` is a cheap handle: clones refer to the same node, and two
/// handles compare equal when they do. It is single-threaded (`!Send`) and
/// callers that need to share a tree across threads must serialize access
/// themselves.
///
/// No internal borrow is held while factories, decorators, callbacks or
/// teardown hooks run, so they may bind, resolve and postpone on any
/// container of the tree.
#[derive(Clone)]
pub struct Container {
  tree: Rc<RefCell<Tree>>,
  id: NodeId,
}

impl Container {
  /// Creates a new container with no parent, the root of a new tree.
  pub fn create_root() -> Self {
    let (tree, id) = Tree::new_root();
    debug!(node = ?id, "created root container");
    Self { tree, id }
  }

  /// Creates a child of `locator`, which must be a container from this crate.
  ///
  /// The child is linked into its parent's children immediately and stays
  /// there until it is disposed.
  pub fn create_with_parent(locator: &dyn ServiceLocator) -> Result<Self> {
    let parent = locator.as_container().ok_or(Error::IncompatibleLocator)?;
    let id = parent.tree.borrow_mut().insert_child(parent.id)?;
    debug!(node = ?id, parent = ?parent.id, "created child container");
    Ok(Self {
      tree: parent.tree.clone(),
      id,
    })
  }

  fn at(&self, id: NodeId) -> Container {
    Container {
      tree: self.tree.clone(),
      id,
    }
  }

  /// Whether this container has been disposed, directly or by an ancestor.
  pub fn is_disposed(&self) -> bool {
    !self.tree.borrow().is_alive(self.id)
  }

  /// The parent container, if this is not a root and has not been disposed.
  pub fn parent(&self) -> Option<Container> {
    let parent = self.tree.borrow().parent(self.id);
    parent.map(|id| self.at(id))
  }

  /// The live children of this container, in creation order.
  pub fn children(&self) -> Vec<Container> {
    let children = self
      .tree
      .borrow()
      .node(self.id)
      .map(|node| node.children().to_vec())
      .unwrap_or_default();
    children.into_iter().map(|id| self.at(id)).collect()
  }

  // --- Binding ---

  /// Starts a binding of contract `C`, optionally qualified by `key`.
  ///
  /// The binding is registered when [`BindingBuilder::to`] supplies its factory.
  pub fn bind<C: ?Sized + Any>(&self, key: Option<&str>) -> BindingBuilder<'_, C> {
    BindingBuilder::new(self, RegistrationKey::of::<C>(key))
  }

  /// Stores `binding` in this container's own table and fires any callbacks
  /// parked on this container for the key.
  pub(crate) fn register(&self, key: RegistrationKey, binding: Rc<dyn Binding>) -> Result<()> {
    let pending = self
      .tree
      .borrow_mut()
      .register(self.id, &key, binding.clone())?;
    debug!(node = ?self.id, key = %key, "registered contract");

    if let Some(action) = pending {
      let instance = binding.instance(self);
      let fired = action.invoke(instance);
      trace!(node = ?self.id, key = %key, fired, "fired postponed callbacks");
    }
    Ok(())
  }

  // --- Resolution ---

  /// Returns whether `key` for contract `C` is bound anywhere within `scope`.
  ///
  /// A disposed container resolves nothing.
  pub fn can_resolve<C: ?Sized + Any>(&self, key: Option<&str>, scope: Scope) -> bool {
    self.can_resolve_key(&RegistrationKey::of::<C>(key), scope)
  }

  /// Resolves contract `C`, producing the value on first access.
  ///
  /// With several scope axes set, this container's own binding wins, then the
  /// nearest ancestor's, then the first descendant's in depth-first creation
  /// order. Repeated resolves of one binding return the same `Rc`.
  pub fn resolve<C: ?Sized + Any>(&self, key: Option<&str>, scope: Scope) -> Result<Rc<C>> {
    let key = RegistrationKey::of::<C>(key);
    let instance = self.resolve_key(&key, scope)?;
    downcast::<C>(&instance, &key)
  }

  /// Resolves contract `C`, falling back to `default` when it cannot be resolved.
  pub fn resolve_or_else<C: ?Sized + Any>(
    &self,
    key: Option<&str>,
    scope: Scope,
    default: impl FnOnce() -> Rc<C>,
  ) -> Rc<C> {
    self
      .resolve::<C>(key, scope)
      .unwrap_or_else(|_| default())
  }

  // --- Postponement ---

  /// Runs `callback` with the value of contract `C` as soon as it is available.
  ///
  /// If the contract is already resolvable within `scope`, the callback runs
  /// now, before this returns. Otherwise it is parked: on this container for
  /// [`Scope::LOCAL`], on the immediate parent only for [`Scope::PARENT`], and
  /// on every descendant for [`Scope::CHILDREN`]. It then runs at most once,
  /// when one of those containers binds the key.
  ///
  /// A binding made two or more levels above this container does not fire a
  /// callback parked with [`Scope::PARENT`], even though [`Container::resolve`]
  /// with the same scope would find it.
  pub fn postpone<C: ?Sized + Any>(
    &self,
    key: Option<&str>,
    scope: Scope,
    callback: impl FnOnce(Rc<C>) + 'static,
  ) -> Result<()> {
    let key = RegistrationKey::of::<C>(key);
    let typed_key = key.clone();
    self.postpone_key(
      &key,
      scope,
      Box::new(move |instance| match downcast::<C>(&instance, &typed_key) {
        Ok(value) => callback(value),
        Err(err) => error!(key = %typed_key, %err, "dropping postponed callback"),
      }),
    )
  }

  fn park(&self, key: &RegistrationKey, scope: Scope, callback: Callback) {
    let callback = PendingCallback::new(callback);
    let mut tree = self.tree.borrow_mut();

    let mut targets = Vec::new();
    if scope.contains(Scope::LOCAL) {
      targets.push(self.id);
    }
    if scope.contains(Scope::PARENT) {
      targets.extend(tree.parent(self.id));
    }
    if scope.contains(Scope::CHILDREN) {
      targets.extend(tree.descendants(self.id));
    }

    trace!(node = ?self.id, key = %key, nodes = targets.len(), "postponing callback");
    for id in targets {
      tree.park(id, key, &callback);
    }
  }

  // --- Disposal ---

  /// Disposes this container and, recursively, every descendant.
  ///
  /// For each container, the teardown hooks of produced values run first,
  /// then its tables are dropped and it is unlinked from its parent. Parked
  /// callbacks are discarded without running. Disposing twice is a no-op.
  pub fn dispose(&self) {
    let mut pending = vec![self.id];
    while let Some(id) = pending.pop() {
      let created = match self.tree.borrow().node(id) {
        Some(node) => node.created_bindings(),
        None => continue,
      };
      for binding in &created {
        binding.teardown();
      }

      let removed = self.tree.borrow_mut().remove(id);
      if let Some(node) = removed {
        pending.extend(node.children().iter().rev().copied());
        debug!(node = ?id, torn_down = created.len(), "disposed container");
      }
    }
  }
}

impl ServiceLocator for Container {
  fn can_resolve_key(&self, key: &RegistrationKey, scope: Scope) -> bool {
    self.tree.borrow().contains(self.id, key, scope)
  }

  fn resolve_key(&self, key: &RegistrationKey, scope: Scope) -> Result<Instance> {
    let found = {
      let tree = self.tree.borrow();
      if !tree.is_alive(self.id) {
        return Err(Error::Disposed);
      }
      tree.first(self.id, key, scope)
    };
    let (owner, binding) = found.ok_or_else(|| Error::UnregisteredContract { key: key.clone() })?;
    trace!(node = ?self.id, owner = ?owner, key = %key, "resolved contract");
    Ok(binding.instance(&self.at(owner)))
  }

  fn postpone_key(&self, key: &RegistrationKey, scope: Scope, callback: Callback) -> Result<()> {
    match self.resolve_key(key, scope) {
      Ok(instance) => {
        callback(instance);
        Ok(())
      }
      Err(Error::UnregisteredContract { .. }) => {
        self.park(key, scope, callback);
        Ok(())
      }
      Err(err) => Err(err),
    }
  }

  fn as_container(&self) -> Option<&Container> {
    Some(self)
  }
}

impl PartialEq for Container {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
  }
}

impl Eq for Container {}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container").field("node", &self.id).finish()
  }
}
