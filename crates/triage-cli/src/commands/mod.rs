//! Command implementations.

mod config;
mod eval;
mod run;

pub use config::execute_config;
pub use eval::execute_eval;
pub use run::{execute_run, load_request};
