use crate::key::RegistrationKey;
use thiserror::Error;

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported synchronously by container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The key is already bound on this container. Bindings are never overwritten.
  #[error("Contract with key {key} already registered")]
  DuplicateRegistration { key: RegistrationKey },

  /// No container within the requested scope has the key bound.
  #[error("Contract with key {key} not registered")]
  UnregisteredContract { key: RegistrationKey },

  /// A child container was requested from a locator this library did not create.
  #[error(
    "Trying to create a child container from an incompatible service locator. \
     Please use a service locator coming from this IoC container library."
  )]
  IncompatibleLocator,

  /// The container was disposed and no longer takes part in its tree.
  #[error("the container has been disposed")]
  Disposed,

  /// A stored value did not downcast to the contract it was registered under.
  #[error("value stored for {key} does not match its contract type")]
  ContractMismatch { key: RegistrationKey },
}
