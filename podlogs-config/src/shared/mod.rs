mod base;
mod controller;
mod sentry;
mod server;
mod store;

pub use base::*;
pub use controller::*;
pub use sentry::*;
pub use server::*;
pub use store::*;
