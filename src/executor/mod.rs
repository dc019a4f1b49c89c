//! Check execution engine
//!
//! Provides sequential check execution with panic isolation.

mod runner;

pub use runner::SuiteRunner;
