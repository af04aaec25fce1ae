use arbor_ioc::{Container, Scope};
use std::rc::Rc;

// --- Abstraction and Implementations ---
trait MessageSender {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() -> arbor_ioc::Result<()> {
  // RUST_LOG=arbor_ioc=trace shows every lookup.
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  // app -> request -> handler
  let app = Container::create_root();
  let request = Container::create_with_parent(&app)?;
  let handler = Container::create_with_parent(&request)?;

  app
    .bind::<dyn MessageSender>(None)
    .to(|_| Rc::new(EmailSender) as Rc<dyn MessageSender>)?;
  request
    .bind::<dyn MessageSender>(Some("urgent"))
    .to(|_| Rc::new(SmsSender) as Rc<dyn MessageSender>)?;

  // The handler has nothing of its own; it looks upward.
  let sender = handler.resolve::<dyn MessageSender>(None, Scope::UPWARD)?;
  println!("{}", sender.send("alice@example.com", "Your report is ready"));

  let urgent = handler.resolve::<dyn MessageSender>(Some("urgent"), Scope::PARENT)?;
  println!("{}", urgent.send("+15550100", "Server is down"));

  // The app can look down into its descendants.
  assert!(app.can_resolve::<dyn MessageSender>(Some("urgent"), Scope::CHILDREN));
  assert!(!app.can_resolve::<dyn MessageSender>(Some("urgent"), Scope::LOCAL));

  // Local lookups stay local.
  match handler.resolve::<dyn MessageSender>(None, Scope::LOCAL) {
    Ok(_) => unreachable!("handler has no local sender"),
    Err(err) => println!("As expected: {}", err),
  }

  app.dispose();
  Ok(())
}
