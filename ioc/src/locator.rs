//! The object-safe lookup surface shared by containers.

use crate::container::Container;
use crate::error::Result;
use crate::key::RegistrationKey;
use crate::registration::Instance;
use crate::scope::Scope;

/// Key-level lookup operations, usable as a trait object.
///
/// [`Container`] is the implementation this crate provides, with typed
/// counterparts of these methods. Values cross this boundary as [`Instance`]s,
/// which wrap the contract's `Rc<C>`.
///
/// Only locators that expose themselves through [`ServiceLocator::as_container`]
/// can parent new containers; any other implementation is rejected by
/// [`Container::create_with_parent`] with [`crate::Error::IncompatibleLocator`].
pub trait ServiceLocator {
  fn can_resolve_key(&self, key: &RegistrationKey, scope: Scope) -> bool;

  fn resolve_key(&self, key: &RegistrationKey, scope: Scope) -> Result<Instance>;

  fn postpone_key(
    &self,
    key: &RegistrationKey,
    scope: Scope,
    callback: Box<dyn FnOnce(Instance)>,
  ) -> Result<()>;

  /// The container behind this locator, if it is one of ours.
  fn as_container(&self) -> Option<&Container> {
    None
  }
}
