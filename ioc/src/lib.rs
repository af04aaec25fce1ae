//! # Arbor IoC
//!
//! A hierarchical, scope-aware Inversion of Control (IoC) container for Rust.
//!
//! Containers form a tree. Each one holds its own bindings, and every lookup
//! says which part of the tree it may consider: the container itself, its
//! ancestors, its descendants, or any combination of them.
//!
//! ## Core Concepts
//!
//! - **Container**: a node of the tree, created with [`Container::create_root`]
//!   or [`Container::create_with_parent`].
//! - **Binding**: a factory registered for a contract type and optional key.
//!   The value is produced on first resolve and cached for the binding's life.
//! - **Scope**: a [`Scope`] mask of `PARENT`, `LOCAL` and `CHILDREN`.
//! - **Postponement**: [`Container::postpone`] runs a callback as soon as a
//!   contract becomes available, immediately if it already is.
//! - **Disposal**: [`Container::dispose`] tears down produced services that
//!   opted in through [`Dispose`], then disposes every descendant.
//!
//! ## Quick Start
//!
//! ```
//! use arbor_ioc::{Container, Scope};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//!
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String {
//!         "Hello, World!".to_string()
//!     }
//! }
//!
//! fn main() -> arbor_ioc::Result<()> {
//!     let app = Container::create_root();
//!     let request = Container::create_with_parent(&app)?;
//!
//!     // Ask for the greeter before anyone provides it.
//!     let greeting = Rc::new(RefCell::new(String::new()));
//!     let sink = greeting.clone();
//!     request.postpone::<dyn Greeter>(None, Scope::PARENT, move |greeter| {
//!         *sink.borrow_mut() = greeter.greet();
//!     })?;
//!
//!     // Binding on the parent fires the parked callback.
//!     app.bind::<dyn Greeter>(None)
//!         .to(|_| Rc::new(EnglishGreeter) as Rc<dyn Greeter>)?;
//!     assert_eq!(*greeting.borrow(), "Hello, World!");
//!
//!     // The child finds the parent's binding when looking upward.
//!     let greeter = request.resolve::<dyn Greeter>(None, Scope::UPWARD)?;
//!     assert_eq!(greeter.greet(), "Hello, World!");
//!
//!     app.dispose();
//!     assert!(request.is_disposed());
//!     Ok(())
//! }
//! ```

mod binding;
mod container;
mod error;
mod key;
mod locator;
mod macros;
mod postponed;
mod registration;
mod scope;
mod tree;

pub use binding::{BindingBuilder, BindingIntercept, Dispose};
pub use container::Container;
pub use error::{Error, Result};
pub use key::RegistrationKey;
pub use locator::ServiceLocator;
pub use registration::Instance;
pub use scope::Scope;
