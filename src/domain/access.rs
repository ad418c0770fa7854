use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of roles a user can hold.
///
/// A role is fixed when the user is created and determines which actions the
/// user may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Files reports.
    Student,
    /// Reviews and triages reports.
    Teacher,
    /// Assigns reviewing staff to reports.
    Administrator,
}

impl Role {
    /// All roles, in menu order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Teacher, Self::Administrator];

    /// The role name as shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised role name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a valid role")]
pub struct InvalidRoleError(String);

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidRoleError(s.to_string()))
    }
}

/// A privileged action that is gated by the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Submitting a new report.
    FileReport,
    /// Reviewing a report (status transition and description encryption).
    ReviewReport,
    /// Assigning, changing or removing the reviewing teacher of a report.
    AssignStaff,
}

impl Action {
    /// The action name used in the permission table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileReport => "file_report",
            Self::ReviewReport => "review_report",
            Self::AssignStaff => "assign_staff",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an action name that is not in the table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown action '{0}'")]
pub struct UnknownActionError(String);

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PERMISSIONS
            .iter()
            .map(|(action, _)| *action)
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownActionError(s.to_string()))
    }
}

/// The fixed permission table.
///
/// Any action not listed here is denied for every role.
const PERMISSIONS: &[(Action, &[Role])] = &[
    (Action::FileReport, &[Role::Student]),
    (Action::ReviewReport, &[Role::Teacher]),
    (Action::AssignStaff, &[Role::Administrator]),
];

/// Anything that acts on the system under a role.
pub trait Principal {
    /// Display name, used in log and error messages.
    fn name(&self) -> &str;

    /// The role the principal acts under.
    fn role(&self) -> Role;
}

/// Returns whether `role` may perform `action`.
#[must_use]
pub fn permits(role: Role, action: Action) -> bool {
    PERMISSIONS
        .iter()
        .any(|(listed, roles)| *listed == action && roles.contains(&role))
}

/// Returns whether the principal may perform the named action.
///
/// Unknown action names are always denied.
#[must_use]
pub fn check_permission<P: Principal + ?Sized>(principal: &P, action: &str) -> bool {
    action
        .parse::<Action>()
        .is_ok_and(|action| permits(principal.role(), action))
}

/// Check a principal against the permission table before a privileged
/// operation.
///
/// # Errors
///
/// Returns [`PermissionDenied`] if the principal's role is not allowed to
/// perform the action. Callers must not mutate anything in that case.
pub fn require<P: Principal + ?Sized>(principal: &P, action: Action) -> Result<(), PermissionDenied> {
    if permits(principal.role(), action) {
        Ok(())
    } else {
        tracing::warn!(
            "{} {} attempted '{action}' without permission",
            principal.role(),
            principal.name()
        );
        Err(PermissionDenied {
            role: principal.role(),
            action,
        })
    }
}

/// An action was attempted by a role that lacks the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("permission denied: a {role} may not {action}")]
pub struct PermissionDenied {
    /// The role of the principal that attempted the action.
    pub role: Role,
    /// The action that was attempted.
    pub action: Action,
}
