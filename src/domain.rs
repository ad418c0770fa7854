//! Domain models for incident reporting.
//!
//! This module contains the core domain types including users and their
//! roles, reports, the permission table and the staff-assignment workflow.

/// Permission table and role tags.
pub mod access;
pub use access::{Action, PermissionDenied, Principal, Role};

/// Staff assignment workflow.
pub mod assignment;
pub use assignment::{
    AssignError, AssignOutcome, ReassignChoice, ScriptedSelection, SelectionError, SelectionSource,
};

/// Reversible description transform.
pub mod codec;
pub use codec::{Base64Codec, DecodeError, DescriptionCodec, SecurityManager};

mod config;
pub use config::{Config, InvalidReportPolicy};

/// Password digests.
pub mod credentials;
pub use credentials::{PasswordDigest, hash_password, verify_password};

/// User and report identifiers.
pub mod id;
pub use id::{ReportId, UserId};

/// Report model, validation and status transitions.
pub mod report;
pub use report::{
    ConfidentialityLevel, EncryptOutcome, Report, ReportDetails, ReportStatus, RequiredField,
    ValidationError,
};

/// Role behaviours: filing and reviewing.
pub mod roles;
pub use roles::{FileError, Filing, ReviewOutcome, StatusChange};

/// Users and their role-specific profiles.
pub mod user;
pub use user::{Grade, Profile, User};
