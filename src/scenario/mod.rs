//! Scenario table
//!
//! Scenarios come either from the built-in TimThumb table or from a YAML
//! suite file. Both produce the same ordered [`ScenarioTable`].

mod config;
mod suite;
mod table;

pub use config::*;
pub use suite::{load_suite, parse_suite, Suite};
pub use table::{builtin_suite, EXTERNAL_IMAGE, LOCAL_IMAGE};
