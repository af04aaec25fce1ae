use arbor_ioc::{Container, Dispose, Scope};
use std::rc::Rc;

// A service holding something that must be released explicitly.
struct ConnectionPool {
  name: String,
}

impl Dispose for ConnectionPool {
  fn dispose(&self) {
    println!("Closing connection pool '{}'", self.name);
  }
}

fn main() -> arbor_ioc::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let app = Container::create_root();
  let tenant_a = Container::create_with_parent(&app)?;
  let tenant_b = Container::create_with_parent(&app)?;

  for (tenant, name) in [(&tenant_a, "tenant-a"), (&tenant_b, "tenant-b")] {
    tenant
      .bind::<ConnectionPool>(None)
      .to(move |_| {
        println!("Opening connection pool '{}'", name);
        Rc::new(ConnectionPool {
          name: name.to_string(),
        })
      })?
      .disposable();
  }

  // Only tenant-a's pool is ever produced, so only it gets closed.
  tenant_a.resolve::<ConnectionPool>(None, Scope::LOCAL)?;

  println!("Disposing tenant-a...");
  tenant_a.dispose();
  assert_eq!(app.children(), vec![tenant_b.clone()]);

  println!("Disposing app...");
  app.dispose();
  assert!(tenant_b.is_disposed());
  Ok(())
}
