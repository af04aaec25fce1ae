//! Lazily produced, memoized service values.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::key::RegistrationKey;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// A type-erased service value.
///
/// For a contract `C` the erased value always wraps an `Rc<C>`, so it can be
/// recovered with `instance.downcast_ref::<Rc<C>>()`. The extra indirection
/// is what lets unsized contracts (`dyn Trait`) travel through the same
/// tables and callbacks as concrete types.
pub type Instance = Rc<dyn Any>;

pub(crate) type Factory<C> = Box<dyn Fn(&Container) -> Rc<C>>;
pub(crate) type Decorator<C> = Rc<dyn Fn(&Container, Rc<C>) -> Rc<C>>;
pub(crate) type Teardown<C> = Rc<dyn Fn(&C)>;

/// A factory, an optional decorator and the value they produce, at most once.
pub(crate) struct Registration<C: ?Sized + 'static> {
  factory: Factory<C>,
  decorator: RefCell<Option<Decorator<C>>>,
  teardown: RefCell<Option<Teardown<C>>>,
  cell: OnceCell<Rc<C>>,
}

impl<C: ?Sized + 'static> Registration<C> {
  pub(crate) fn new(factory: Factory<C>, decorator: Option<Decorator<C>>) -> Self {
    Self {
      factory,
      decorator: RefCell::new(decorator),
      teardown: RefCell::new(None),
      cell: OnceCell::new(),
    }
  }

  pub(crate) fn set_decorator(&self, decorator: Decorator<C>) {
    *self.decorator.borrow_mut() = Some(decorator);
  }

  pub(crate) fn set_teardown(&self, teardown: Teardown<C>) {
    *self.teardown.borrow_mut() = Some(teardown);
  }

  /// Returns the memoized value, producing it on first access.
  ///
  /// `locator` is the container the registration was bound on. A factory
  /// that resolves its own registration re-enters the cell and panics.
  pub(crate) fn value(&self, locator: &Container) -> Rc<C> {
    self
      .cell
      .get_or_init(|| {
        let value = (self.factory)(locator);
        // Cloned out so the decorator may itself touch this registration.
        let decorator = self.decorator.borrow().clone();
        match decorator {
          Some(decorate) => decorate(locator, value),
          None => value,
        }
      })
      .clone()
  }
}

/// The object-safe view of a [`Registration`] stored in a container's table.
pub(crate) trait Binding {
  fn instance(&self, locator: &Container) -> Instance;

  fn is_value_created(&self) -> bool;

  /// Runs the teardown hook against the produced value, if both exist.
  fn teardown(&self);
}

impl<C: ?Sized + 'static> Binding for Registration<C> {
  fn instance(&self, locator: &Container) -> Instance {
    Rc::new(self.value(locator))
  }

  fn is_value_created(&self) -> bool {
    self.cell.get().is_some()
  }

  fn teardown(&self) {
    let hook = self.teardown.borrow().clone();
    if let (Some(value), Some(hook)) = (self.cell.get(), hook) {
      hook(value.as_ref());
    }
  }
}

/// Recovers the typed value from an erased [`Instance`].
pub(crate) fn downcast<C: ?Sized + 'static>(
  instance: &Instance,
  key: &RegistrationKey,
) -> Result<Rc<C>> {
  instance
    .downcast_ref::<Rc<C>>()
    .cloned()
    .ok_or_else(|| Error::ContractMismatch { key: key.clone() })
}
