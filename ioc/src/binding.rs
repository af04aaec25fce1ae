//! Fluent registration of factories, decorators and teardown hooks.

use crate::container::Container;
use crate::error::Result;
use crate::key::RegistrationKey;
use crate::registration::{Decorator, Registration};
use std::rc::Rc;

/// Teardown for services that hold resources beyond their memory.
///
/// A binding opts in with [`BindingIntercept::disposable`]; disposing the
/// container that owns the binding then calls [`Dispose::dispose`] exactly
/// once, and only if the value was ever produced.
pub trait Dispose {
  fn dispose(&self);
}

/// The first half of a binding, returned by [`Container::bind`].
///
/// Nothing is registered until [`BindingBuilder::to`] is called.
pub struct BindingBuilder<'c, C: ?Sized + 'static> {
  container: &'c Container,
  key: RegistrationKey,
  decorator: Option<Decorator<C>>,
}

impl<'c, C: ?Sized + 'static> BindingBuilder<'c, C> {
  pub(crate) fn new(container: &'c Container, key: RegistrationKey) -> Self {
    Self {
      container,
      key,
      decorator: None,
    }
  }

  /// Decorates the produced value before it is cached.
  ///
  /// Set here, the decorator is in place before the binding is registered,
  /// so callbacks fired by the registration already see the decorated value.
  pub fn decorate(self, decorator: impl Fn(Rc<C>) -> Rc<C> + 'static) -> Self {
    self.decorate_with(move |_, inner| decorator(inner))
  }

  /// Like [`BindingBuilder::decorate`], with access to the owning container.
  pub fn decorate_with(mut self, decorator: impl Fn(&Container, Rc<C>) -> Rc<C> + 'static) -> Self {
    let decorator: Decorator<C> = Rc::new(decorator);
    self.decorator = Some(decorator);
    self
  }

  /// Registers `factory` as the source of the contract's value.
  ///
  /// The factory runs lazily, at most once, and receives the container the
  /// binding was made on. Any callbacks parked on that container for this key
  /// fire before this returns.
  ///
  /// Fails with [`crate::Error::DuplicateRegistration`] if the container
  /// already has this key bound.
  pub fn to(self, factory: impl Fn(&Container) -> Rc<C> + 'static) -> Result<BindingIntercept<C>> {
    let registration = Rc::new(Registration::new(Box::new(factory), self.decorator));
    self.container.register(self.key, registration.clone())?;
    Ok(BindingIntercept { registration })
  }

  /// Registers an already-built value.
  pub fn to_instance(self, instance: Rc<C>) -> Result<BindingIntercept<C>> {
    self.to(move |_| instance.clone())
  }
}

/// A registered binding, still open to decoration and teardown hooks.
pub struct BindingIntercept<C: ?Sized + 'static> {
  registration: Rc<Registration<C>>,
}

impl<C: ?Sized + 'static> BindingIntercept<C> {
  /// Decorates the produced value before it is cached.
  ///
  /// Has no effect once the value exists, which is already the case if
  /// registering the binding fired parked callbacks. Use
  /// [`BindingBuilder::decorate`] to decorate ahead of registration.
  pub fn decorate(self, decorator: impl Fn(Rc<C>) -> Rc<C> + 'static) -> Self {
    self.decorate_with(move |_, inner| decorator(inner))
  }

  pub fn decorate_with(self, decorator: impl Fn(&Container, Rc<C>) -> Rc<C> + 'static) -> Self {
    self.registration.set_decorator(Rc::new(decorator));
    self
  }

  /// Runs `hook` on the produced value when the owning container is disposed.
  pub fn on_dispose(self, hook: impl Fn(&C) + 'static) -> Self {
    self.registration.set_teardown(Rc::new(hook));
    self
  }

  /// Calls [`Dispose::dispose`] on the produced value when the owning
  /// container is disposed.
  pub fn disposable(self) -> Self
  where
    C: Dispose,
  {
    self.on_dispose(C::dispose)
  }
}
