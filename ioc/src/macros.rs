//! Public macros for ergonomic service resolution.

/// Resolves a service from a container with [`Scope::DEFAULT`](crate::Scope::DEFAULT).
///
/// This macro is the short way to get dependencies that must be present. It
/// panics if the requested service cannot be resolved, naming the contract.
///
/// # Panics
///
/// Panics on any resolution error. For a non-panicking version, call
/// [`Container::resolve`](crate::Container::resolve) directly.
///
/// # Examples
///
/// ```
/// use arbor_ioc::{resolve, Container};
/// use std::rc::Rc;
///
/// let container = Container::create_root();
/// container
///   .bind::<String>(None)
///   .to(|_| Rc::new(String::from("hello")))
///   .unwrap();
///
/// let message = resolve!(container, String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use arbor_ioc::{resolve, Container};
/// use std::rc::Rc;
///
/// trait Greeter { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::create_root();
/// container
///   .bind::<dyn Greeter>(Some("english"))
///   .to(|_| Rc::new(EnglishGreeter) as Rc<dyn Greeter>)
///   .unwrap();
///
/// let greeter = resolve!(container, trait Greeter, "english");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $container
      .resolve::<dyn $trait_ident>(None, $crate::Scope::DEFAULT)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service {}: {}",
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // resolve!(container, trait MyTrait, "name")
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    $container
      .resolve::<dyn $trait_ident>(Some($name), $crate::Scope::DEFAULT)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service with name '{}' {}: {}",
          $name,
          std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container
      .resolve::<$type>(None, $crate::Scope::DEFAULT)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service {}: {}",
          std::any::type_name::<$type>(),
          err
        )
      })
  };

  // resolve!(container, MyService, "name")
  ($container:expr, $type:ty, $name:expr) => {
    $container
      .resolve::<$type>(Some($name), $crate::Scope::DEFAULT)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service with name '{}' {}: {}",
          $name,
          std::any::type_name::<$type>(),
          err
        )
      })
  };
}
