use arbor_ioc::{Container, Scope};
use std::cell::RefCell;
use std::rc::Rc;

struct Database {
  url: String,
}

struct Plugin {
  name: &'static str,
}

fn main() -> arbor_ioc::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let host = Container::create_root();
  let plugin = Container::create_with_parent(&host)?;
  let log = Rc::new(RefCell::new(Vec::new()));

  // The plugin wants the host's database, which is not configured yet.
  let sink = log.clone();
  plugin.postpone::<Database>(None, Scope::PARENT, move |db| {
    sink.borrow_mut().push(format!("plugin connected to {}", db.url));
  })?;

  // The host wants to know about any plugin registered below it.
  let sink = log.clone();
  host.postpone::<Plugin>(None, Scope::CHILDREN, move |p| {
    sink.borrow_mut().push(format!("host discovered plugin '{}'", p.name));
  })?;

  println!("Before binding: {} callbacks fired", log.borrow().len());

  host.bind::<Database>(None).to(|_| {
    println!("Creating Database...");
    Rc::new(Database {
      url: "postgres://localhost/app".to_string(),
    })
  })?;
  plugin
    .bind::<Plugin>(None)
    .to(|_| Rc::new(Plugin { name: "metrics" }))?;

  for line in log.borrow().iter() {
    println!("{}", line);
  }
  assert_eq!(log.borrow().len(), 2);

  // Once bound, postponing runs right away.
  plugin.postpone::<Database>(None, Scope::PARENT, |db| {
    println!("late subscriber sees {}", db.url);
  })?;

  host.dispose();
  Ok(())
}
