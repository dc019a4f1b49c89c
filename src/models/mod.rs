//! Data models for the backend smoke suite
//!
//! Check bookkeeping types and the wire models of the API under test.

mod check_result;
mod status_record;

pub use check_result::{CheckCase, CheckResult, CheckStatus, SuiteSummary};
pub use status_record::{record_id, status_list, RootMessage, SchemaError, StatusRecord};
