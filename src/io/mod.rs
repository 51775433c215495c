//! Input/output helpers.
//!
//! - bin plan exports (CSV) (`export`)
//! - run report JSON (`run_file`)

pub mod export;
pub mod run_file;

pub use export::*;
pub use run_file::*;
