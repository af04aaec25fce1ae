use arbor_ioc::{Container, Error, Instance, RegistrationKey, Scope, ServiceLocator};
use std::rc::Rc;

// --- Test Fixtures ---

trait StubContract {
  fn locator(&self) -> &Container;
}

// Remembers the container whose factory built it.
struct StubService {
  locator: Container,
}

impl StubContract for StubService {
  fn locator(&self) -> &Container {
    &self.locator
  }
}

fn bind_stub(container: &Container) {
  container
    .bind::<dyn StubContract>(None)
    .to(|locator| {
      Rc::new(StubService {
        locator: locator.clone(),
      }) as Rc<dyn StubContract>
    })
    .unwrap();
}

struct Family {
  parent: Container,
  sut: Container,
  child: Container,
}

impl Family {
  // parent -> sut -> child
  fn new() -> Self {
    let parent = Container::create_root();
    let sut = Container::create_with_parent(&parent).unwrap();
    let child = Container::create_with_parent(&sut).unwrap();
    Self { parent, sut, child }
  }

  fn can(&self, scope: Scope) -> bool {
    self.sut.can_resolve::<dyn StubContract>(None, scope)
  }

  fn resolved_from(&self, scope: Scope) -> Container {
    self
      .sut
      .resolve::<dyn StubContract>(None, scope)
      .unwrap()
      .locator()
      .clone()
  }
}

impl Drop for Family {
  fn drop(&mut self) {
    // Stub services hold container handles; disposal breaks the cycle.
    self.parent.dispose();
  }
}

// --- Creation ---

#[test]
fn test_child_registers_with_parent() {
  let family = Family::new();

  assert_eq!(family.parent.children(), vec![family.sut.clone()]);
  assert_eq!(family.sut.children(), vec![family.child.clone()]);
  assert_eq!(family.child.parent(), Some(family.sut.clone()));
  assert_eq!(family.parent.parent(), None);
}

#[test]
fn test_children_keep_creation_order() {
  let root = Container::create_root();
  let first = Container::create_with_parent(&root).unwrap();
  let second = Container::create_with_parent(&root).unwrap();
  let third = Container::create_with_parent(&root).unwrap();

  assert_eq!(root.children(), vec![first, second, third]);
}

#[test]
fn test_foreign_locator_is_rejected() {
  struct ForeignLocator;

  impl ServiceLocator for ForeignLocator {
    fn can_resolve_key(&self, _key: &RegistrationKey, _scope: Scope) -> bool {
      false
    }

    fn resolve_key(&self, key: &RegistrationKey, _scope: Scope) -> arbor_ioc::Result<Instance> {
      Err(Error::UnregisteredContract { key: key.clone() })
    }

    fn postpone_key(
      &self,
      _key: &RegistrationKey,
      _scope: Scope,
      _callback: Box<dyn FnOnce(Instance)>,
    ) -> arbor_ioc::Result<()> {
      Ok(())
    }
  }

  let result = Container::create_with_parent(&ForeignLocator);

  assert_eq!(result.err(), Some(Error::IncompatibleLocator));
}

#[test]
fn test_container_works_as_locator_object() {
  let root = Container::create_root();
  bind_stub(&root);
  let locator: &dyn ServiceLocator = &root;
  let key = RegistrationKey::of::<dyn StubContract>(None);

  assert!(locator.can_resolve_key(&key, Scope::LOCAL));
  let instance = locator.resolve_key(&key, Scope::LOCAL).unwrap();
  let typed = instance.downcast_ref::<Rc<dyn StubContract>>().unwrap();
  assert_eq!(*typed.locator(), root);

  root.dispose();
}

// --- CanResolve ---

#[test]
fn test_register_locally_then_can_resolve_locally() {
  let family = Family::new();
  bind_stub(&family.sut);

  assert!(family.can(Scope::LOCAL));
  assert!(!family.can(Scope::PARENT));
  assert!(!family.can(Scope::CHILDREN));
}

#[test]
fn test_register_on_parent_then_can_resolve_from_parent() {
  let family = Family::new();
  bind_stub(&family.parent);

  assert!(!family.can(Scope::LOCAL));
  assert!(family.can(Scope::PARENT));
  assert!(!family.can(Scope::CHILDREN));
}

#[test]
fn test_register_on_child_then_can_resolve_from_child() {
  let family = Family::new();
  bind_stub(&family.child);

  assert!(!family.can(Scope::LOCAL));
  assert!(!family.can(Scope::PARENT));
  assert!(family.can(Scope::CHILDREN));
}

#[test]
fn test_register_locally_and_on_parent() {
  let family = Family::new();
  bind_stub(&family.parent);
  bind_stub(&family.sut);

  assert!(family.can(Scope::LOCAL));
  assert!(family.can(Scope::PARENT));
  assert!(!family.can(Scope::CHILDREN));
}

#[test]
fn test_register_locally_and_on_child() {
  let family = Family::new();
  bind_stub(&family.sut);
  bind_stub(&family.child);

  assert!(family.can(Scope::LOCAL));
  assert!(!family.can(Scope::PARENT));
  assert!(family.can(Scope::CHILDREN));
}

#[test]
fn test_register_on_parent_and_child() {
  let family = Family::new();
  bind_stub(&family.parent);
  bind_stub(&family.child);

  assert!(!family.can(Scope::LOCAL));
  assert!(family.can(Scope::PARENT));
  assert!(family.can(Scope::CHILDREN));
  assert!(!family.can(Scope::DEFAULT));
  assert!(family.can(Scope::UPWARD));
  assert!(family.can(Scope::DOWNWARD));
}

#[test]
fn test_register_two_levels_up_then_can_resolve_from_parent() {
  let family = Family::new();
  let sut = Container::create_with_parent(&family.child).unwrap();
  bind_stub(&family.parent);

  assert!(!sut.can_resolve::<dyn StubContract>(None, Scope::LOCAL));
  assert!(sut.can_resolve::<dyn StubContract>(None, Scope::PARENT));
  assert!(!sut.can_resolve::<dyn StubContract>(None, Scope::CHILDREN));
}

#[test]
fn test_register_two_levels_down_then_can_resolve_from_child() {
  let family = Family::new();
  let grandchild = Container::create_with_parent(&family.child).unwrap();
  bind_stub(&grandchild);

  assert!(!family.can(Scope::LOCAL));
  assert!(!family.can(Scope::PARENT));
  assert!(family.can(Scope::CHILDREN));
}

// --- Resolve ---

#[test]
fn test_resolve_locally() {
  let family = Family::new();
  bind_stub(&family.sut);

  assert_eq!(family.resolved_from(Scope::LOCAL), family.sut);
}

#[test]
fn test_resolve_from_parent() {
  let family = Family::new();
  bind_stub(&family.parent);

  assert_eq!(family.resolved_from(Scope::PARENT), family.parent);
}

#[test]
fn test_resolve_from_child() {
  let family = Family::new();
  bind_stub(&family.child);

  assert_eq!(family.resolved_from(Scope::CHILDREN), family.child);
}

#[test]
fn test_local_wins_over_parent() {
  let family = Family::new();
  bind_stub(&family.parent);
  bind_stub(&family.sut);

  assert_eq!(family.resolved_from(Scope::ALL), family.sut);
}

#[test]
fn test_local_wins_over_child() {
  let family = Family::new();
  bind_stub(&family.sut);
  bind_stub(&family.child);

  assert_eq!(family.resolved_from(Scope::ALL), family.sut);
}

#[test]
fn test_parent_wins_over_child() {
  let family = Family::new();
  bind_stub(&family.parent);
  bind_stub(&family.child);

  assert_eq!(family.resolved_from(Scope::ALL), family.parent);
}

#[test]
fn test_downward_skips_parent() {
  let family = Family::new();
  bind_stub(&family.parent);
  bind_stub(&family.child);

  assert_eq!(family.resolved_from(Scope::DOWNWARD), family.child);
}

#[test]
fn test_resolve_two_levels_up() {
  let family = Family::new();
  let sut = Container::create_with_parent(&family.child).unwrap();
  bind_stub(&family.parent);

  let resolved = sut.resolve::<dyn StubContract>(None, Scope::PARENT).unwrap();
  assert_eq!(*resolved.locator(), family.parent);
}

#[test]
fn test_resolve_nearest_ancestor() {
  let family = Family::new();
  let sut = Container::create_with_parent(&family.child).unwrap();
  bind_stub(&family.parent);
  bind_stub(&family.sut);

  let resolved = sut.resolve::<dyn StubContract>(None, Scope::PARENT).unwrap();
  assert_eq!(*resolved.locator(), family.sut);
}

#[test]
fn test_resolve_two_levels_down() {
  let family = Family::new();
  let grandchild = Container::create_with_parent(&family.child).unwrap();
  bind_stub(&grandchild);

  assert_eq!(family.resolved_from(Scope::CHILDREN), grandchild);
}

#[test]
fn test_children_are_searched_depth_first_in_creation_order() {
  // root -> (a -> a1), b
  let root = Container::create_root();
  let a = Container::create_with_parent(&root).unwrap();
  let b = Container::create_with_parent(&root).unwrap();
  let a1 = Container::create_with_parent(&a).unwrap();
  bind_stub(&a1);
  bind_stub(&b);

  // a's subtree is exhausted before moving on to b.
  let resolved = root.resolve::<dyn StubContract>(None, Scope::CHILDREN).unwrap();
  assert_eq!(*resolved.locator(), a1);

  root.dispose();
}

#[test]
fn test_resolve_from_parent_when_not_found_fails() {
  let family = Family::new();
  bind_stub(&family.child);

  let err = family
    .sut
    .resolve::<dyn StubContract>(None, Scope::UPWARD)
    .err();
  assert_eq!(
    err,
    Some(Error::UnregisteredContract {
      key: RegistrationKey::of::<dyn StubContract>(None)
    })
  );
}

#[test]
fn test_same_binding_resolved_through_different_paths_is_shared() {
  let family = Family::new();
  bind_stub(&family.sut);

  let from_child = family
    .child
    .resolve::<dyn StubContract>(None, Scope::PARENT)
    .unwrap();
  let from_parent = family
    .parent
    .resolve::<dyn StubContract>(None, Scope::CHILDREN)
    .unwrap();

  assert!(Rc::ptr_eq(&from_child, &from_parent));
  assert_eq!(*from_child.locator(), family.sut);
}
