//! Interactive operator client: context stack, command bindings, transport,
//! and the line-oriented REPL.

mod repl;
mod session;
mod transport;

pub use repl::Repl;
pub use session::{bindings_for, Binding, LocalCommand, Session};
pub use transport::{HttpTransport, Transport};
