//! Configuration for the podlogs services.
//!
//! Provides environment detection, layered loading of YAML files and `APP_`
//! environment variables, and the configuration types shared by the
//! controller and the retrieval server.

mod environment;
mod load;
pub mod shared;

pub use environment::*;
pub use load::*;
