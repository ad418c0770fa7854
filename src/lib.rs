//! Bullying incident reporting for schools
//!
//! Students file reports, teachers review them and administrators assign
//! reviewing staff. Every privileged action is checked against a fixed
//! permission table before anything is mutated.

pub mod domain;
pub use domain::{
    AssignError, AssignOutcome, Config, Filing, Report, ReportId, ReportStatus, Role,
    SecurityManager, User, UserId,
};

/// In-memory registry of users and reports.
pub mod storage;
pub use storage::School;
