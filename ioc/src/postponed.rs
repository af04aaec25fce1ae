//! Callbacks parked on a container until a key becomes available.

use crate::registration::Instance;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub(crate) type Callback = Box<dyn FnOnce(Instance)>;

/// A callback filed by one `postpone` call.
///
/// The same callback may be parked on several containers (for example on
/// every descendant when `Scope::CHILDREN` is requested). All copies share
/// one slot, and firing takes the callback out of it, so it runs at most once.
#[derive(Clone)]
pub(crate) struct PendingCallback(Rc<RefCell<Option<Callback>>>);

impl PendingCallback {
  pub(crate) fn new(callback: Callback) -> Self {
    Self(Rc::new(RefCell::new(Some(callback))))
  }

  /// Runs the callback if no other copy has run it yet.
  pub(crate) fn fire(&self, instance: Instance) -> bool {
    let callback = self.0.borrow_mut().take();
    match callback {
      Some(callback) => {
        callback(instance);
        true
      }
      None => false,
    }
  }
}

/// The pending callbacks for one key on one container, plus the cleanup
/// that prunes the key from the rest of the tree once they have run.
pub(crate) struct PostponedAction {
  callbacks: Vec<PendingCallback>,
  cleanup: Box<dyn FnOnce()>,
}

impl PostponedAction {
  pub(crate) fn new(cleanup: impl FnOnce() + 'static) -> Self {
    Self {
      callbacks: Vec::new(),
      cleanup: Box::new(cleanup),
    }
  }

  pub(crate) fn postpone(&mut self, callback: PendingCallback) {
    self.callbacks.push(callback);
  }

  pub(crate) fn len(&self) -> usize {
    self.callbacks.len()
  }

  /// Fires every callback in filing order, then runs the cleanup.
  ///
  /// A panicking callback unwinds through here: later callbacks and the
  /// cleanup do not run.
  pub(crate) fn invoke(self, instance: Instance) -> usize {
    let mut fired = 0;
    for callback in &self.callbacks {
      if callback.fire(instance.clone()) {
        fired += 1;
      }
    }
    (self.cleanup)();
    fired
  }
}

impl fmt::Debug for PostponedAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PostponedAction")
      .field("callbacks", &self.callbacks.len())
      .finish()
  }
}
