//! Process wiring: state bootstrap, HTTP server, health checks and shutdown

mod bootstrap;
mod health;
mod server;
mod shutdown;

pub use bootstrap::*;
pub use health::*;
pub use server::*;
pub use shutdown::*;
