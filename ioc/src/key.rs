//! The identity under which a contract is registered and looked up.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a registration: a contract type plus an optional string key.
///
/// Two keys are equal when they name the same contract type and carry the
/// same optional key. A keyless registration is only ever equal to another
/// keyless one, so `bind::<T>(None)` and `bind::<T>(Some("x"))` never collide.
#[derive(Clone)]
pub struct RegistrationKey {
  type_id: TypeId,
  type_name: &'static str,
  key: Option<String>,
}

impl RegistrationKey {
  /// Builds the key for contract `C`, optionally qualified by `key`.
  ///
  /// `C` may be unsized, so trait objects (`dyn Trait`) are valid contracts.
  pub fn of<C: ?Sized + Any>(key: Option<&str>) -> Self {
    Self {
      type_id: TypeId::of::<C>(),
      type_name: std::any::type_name::<C>(),
      key: key.map(str::to_owned),
    }
  }

  /// The `TypeId` of the contract.
  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  /// The contract's type name. Diagnostic only; not part of equality.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// The name qualifying the binding, if any.
  pub fn key(&self) -> Option<&str> {
    self.key.as_deref()
  }
}

impl PartialEq for RegistrationKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.key == other.key
  }
}

impl Eq for RegistrationKey {}

impl Hash for RegistrationKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.key.hash(state);
  }
}

impl fmt::Debug for RegistrationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.key {
      Some(key) => write!(f, "Key(Type({}), Name({}))", self.type_name, key),
      None => write!(f, "Key(Type({}))", self.type_name),
    }
  }
}

impl fmt::Display for RegistrationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.key {
      Some(key) => write!(f, "Key=\"{}\", Type=\"{}\"", key, self.type_name),
      None => write!(f, "Key=None, Type=\"{}\"", self.type_name),
    }
  }
}
