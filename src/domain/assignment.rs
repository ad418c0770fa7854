use tracing::instrument;

use crate::domain::{
    access::{self, Action, PermissionDenied, Role},
    id::{ReportId, UserId},
    report::Report,
    user::User,
};

/// What to do with a report that already has a reviewing teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassignChoice {
    /// Pick a different teacher.
    Change,
    /// Unassign the current teacher.
    Remove,
    /// Leave the assignment as it is.
    Cancel,
}

/// Supplies the decisions the assignment workflow needs.
///
/// Interactive front-ends prompt the operator; everything else can use
/// [`ScriptedSelection`].
pub trait SelectionSource {
    /// Called when `report` is already assigned to `current`.
    fn reassign_choice(&mut self, report: &Report, current: &UserId) -> ReassignChoice;

    /// Returns the raw selection text for the teacher to assign.
    ///
    /// The text should hold a 1-based index into `teachers`. It is parsed
    /// and range-checked by the workflow, so anything may be returned.
    fn teacher_selection(&mut self, report: &Report, teachers: &[&User]) -> String;
}

/// A [`SelectionSource`] with fixed answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedSelection {
    /// The answer when the report is already assigned.
    pub choice: ReassignChoice,
    /// The teacher selection text.
    pub selection: String,
}

impl ScriptedSelection {
    /// Select the teacher at the given (1-based) selection text. An existing
    /// assignment is changed.
    #[must_use]
    pub fn pick(selection: impl Into<String>) -> Self {
        Self {
            choice: ReassignChoice::Change,
            selection: selection.into(),
        }
    }

    /// Remove an existing assignment.
    #[must_use]
    pub fn remove() -> Self {
        Self {
            choice: ReassignChoice::Remove,
            selection: String::new(),
        }
    }

    /// Leave an existing assignment alone.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            choice: ReassignChoice::Cancel,
            selection: String::new(),
        }
    }
}

impl SelectionSource for ScriptedSelection {
    fn reassign_choice(&mut self, _report: &Report, _current: &UserId) -> ReassignChoice {
        self.choice
    }

    fn teacher_selection(&mut self, _report: &Report, _teachers: &[&User]) -> String {
        self.selection.clone()
    }
}

/// The selection text did not identify a teacher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The text is not a number.
    #[error("invalid input '{0}': please enter a number")]
    NotANumber(String),
    /// The number is outside `1..=available`.
    #[error("invalid selection {selected}: choose between 1 and {available}")]
    OutOfRange {
        /// The number that was entered.
        selected: i64,
        /// How many teachers were offered.
        available: usize,
    },
    /// The selected user is not a teacher.
    #[error("{0} is not a teacher")]
    NotATeacher(UserId),
}

/// Errors that can occur when assigning staff to a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    /// The user is not allowed to assign staff.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    /// There are no teachers to choose from.
    #[error("no available teachers to assign")]
    NoTeachersAvailable,
    /// The selection did not identify a teacher.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// The report does not exist.
    #[error("report {0} not found")]
    ReportNotFound(ReportId),
}

/// The effect of a successful call to [`User::assign_staff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// A teacher was assigned.
    Assigned {
        /// The teacher now assigned.
        teacher: UserId,
        /// The teacher that was assigned before, if any.
        replaced: Option<UserId>,
    },
    /// The assigned teacher was removed.
    Removed {
        /// The teacher that was assigned.
        teacher: UserId,
    },
    /// The operator backed out; nothing changed.
    Cancelled,
}

/// Parse a 1-based selection among `available` options into a 0-based index.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`SelectionError::NotANumber`] if the text is not an integer and
/// [`SelectionError::OutOfRange`] if it is not in `1..=available`.
pub fn parse_selection(input: &str, available: usize) -> Result<usize, SelectionError> {
    let trimmed = input.trim();
    let selected: i64 = trimmed
        .parse()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;

    usize::try_from(selected)
        .ok()
        .filter(|n| (1..=available).contains(n))
        .map(|n| n - 1)
        .ok_or(SelectionError::OutOfRange {
            selected,
            available,
        })
}

impl User {
    /// Assign, change or remove the reviewing teacher of a report.
    ///
    /// If the report has no teacher, one is chosen from `available` through
    /// `selection`. If it already has one, `selection` first decides whether
    /// to change it, remove it, or cancel.
    ///
    /// The report's status is never touched, and a failed call leaves the
    /// assignment unchanged.
    ///
    /// # Errors
    ///
    /// - [`AssignError::PermissionDenied`] if the user is not an
    ///   administrator.
    /// - [`AssignError::NoTeachersAvailable`] if a teacher must be chosen and
    ///   `available` is empty.
    /// - [`AssignError::Selection`] if the selection text is not a valid
    ///   choice.
    #[instrument(level = "debug", skip_all, fields(user = %self.id(), report = %report.id()))]
    pub fn assign_staff(
        &self,
        report: &mut Report,
        available: &[&User],
        selection: &mut dyn SelectionSource,
    ) -> Result<AssignOutcome, AssignError> {
        access::require(self, Action::AssignStaff)?;

        if let Some(current) = report.assigned_teacher.clone() {
            tracing::debug!("report {} is already assigned to {current}", report.id());
            match selection.reassign_choice(report, &current) {
                ReassignChoice::Change => {}
                ReassignChoice::Remove => {
                    report.assigned_teacher = None;
                    tracing::info!("staff removed from report {}", report.id());
                    return Ok(AssignOutcome::Removed { teacher: current });
                }
                ReassignChoice::Cancel => {
                    tracing::debug!("assignment of report {} left unchanged", report.id());
                    return Ok(AssignOutcome::Cancelled);
                }
            }
        }

        self.assign_new_teacher(report, available, selection)
    }

    fn assign_new_teacher(
        &self,
        report: &mut Report,
        available: &[&User],
        selection: &mut dyn SelectionSource,
    ) -> Result<AssignOutcome, AssignError> {
        if available.is_empty() {
            tracing::warn!("no available teachers to assign to report {}", report.id());
            return Err(AssignError::NoTeachersAvailable);
        }

        let input = selection.teacher_selection(report, available);
        let index = parse_selection(&input, available.len()).inspect_err(|e| {
            tracing::warn!("assignment of report {} aborted: {e}", report.id());
        })?;

        let teacher = available[index];
        if teacher.role() != Role::Teacher {
            return Err(SelectionError::NotATeacher(teacher.id().clone()).into());
        }

        let replaced = report.assigned_teacher.replace(teacher.id().clone());
        tracing::info!(
            "administrator {} assigned {} to report {}",
            self.name(),
            teacher.name(),
            report.id()
        );
        Ok(AssignOutcome::Assigned {
            teacher: teacher.id().clone(),
            replaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{ConfidentialityLevel, Grade, ReportStatus};

    fn admin() -> User {
        User::administrator("A001", "Carlo Diaz", "carlo@admin.test", "ledger")
    }

    fn teachers() -> (User, User) {
        (
            User::teacher("T001", "Ana Reyes", "ana@teacher.test", "chalk"),
            User::teacher("T002", "Marco Lim", "marco@teacher.test", "easel"),
        )
    }

    fn report() -> Report {
        Report::in_person(
            "R001",
            "A bullying incident near the school entrance.",
            ConfidentialityLevel::Confidential,
            "School Entrance",
        )
    }

    #[test]
    fn assigns_selected_teacher() {
        let (t1, t2) = teachers();
        let mut report = report();

        let outcome = admin()
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::pick("1"))
            .unwrap();

        assert_eq!(
            outcome,
            AssignOutcome::Assigned {
                teacher: t1.id().clone(),
                replaced: None,
            }
        );
        assert_eq!(report.assigned_teacher(), Some(t1.id()));
    }

    #[test]
    fn change_overwrites_assignment_without_touching_status() {
        let (t1, t2) = teachers();
        let admin = admin();
        let mut report = report();

        admin
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::pick("1"))
            .unwrap();
        let outcome = admin
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::pick("2"))
            .unwrap();

        assert_eq!(
            outcome,
            AssignOutcome::Assigned {
                teacher: t2.id().clone(),
                replaced: Some(t1.id().clone()),
            }
        );
        assert_eq!(report.assigned_teacher(), Some(t2.id()));
        assert_eq!(report.status(), ReportStatus::New);
    }

    #[test]
    fn remove_unassigns() {
        let (t1, _) = teachers();
        let admin = admin();
        let mut report = report();
        admin
            .assign_staff(&mut report, &[&t1], &mut ScriptedSelection::pick("1"))
            .unwrap();

        let outcome = admin
            .assign_staff(&mut report, &[&t1], &mut ScriptedSelection::remove())
            .unwrap();

        assert_eq!(
            outcome,
            AssignOutcome::Removed {
                teacher: t1.id().clone()
            }
        );
        assert!(report.assigned_teacher().is_none());
    }

    #[test]
    fn cancel_keeps_assignment() {
        let (t1, t2) = teachers();
        let admin = admin();
        let mut report = report();
        admin
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::pick("1"))
            .unwrap();

        let outcome = admin
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::cancel())
            .unwrap();

        assert_eq!(outcome, AssignOutcome::Cancelled);
        assert_eq!(report.assigned_teacher(), Some(t1.id()));
    }

    #[test]
    fn empty_teacher_list_never_assigns() {
        let mut report = report();

        let err = admin()
            .assign_staff(&mut report, &[], &mut ScriptedSelection::pick("1"))
            .unwrap_err();

        assert_eq!(err, AssignError::NoTeachersAvailable);
        assert!(report.assigned_teacher().is_none());
    }

    #[test_case("0"; "zero")]
    #[test_case("3"; "past the end")]
    #[test_case("99"; "far past the end")]
    #[test_case("-1"; "negative")]
    #[test_case("two"; "not a number")]
    #[test_case(""; "empty")]
    #[test_case("1.5"; "fraction")]
    fn bad_selection_never_mutates(selection: &str) {
        let (t1, t2) = teachers();
        let mut report = report();

        let err = admin()
            .assign_staff(
                &mut report,
                &[&t1, &t2],
                &mut ScriptedSelection::pick(selection),
            )
            .unwrap_err();

        assert!(matches!(err, AssignError::Selection(_)));
        assert!(report.assigned_teacher().is_none());
    }

    #[test]
    fn out_of_range_selection_leaves_report_unassigned() {
        let (t1, _) = teachers();
        let mut report = report();

        let err = admin()
            .assign_staff(&mut report, &[&t1], &mut ScriptedSelection::pick("99"))
            .unwrap_err();

        assert_eq!(
            err,
            AssignError::Selection(SelectionError::OutOfRange {
                selected: 99,
                available: 1,
            })
        );
        assert!(report.assigned_teacher().is_none());
        assert_eq!(report.status(), ReportStatus::New);
    }

    #[test]
    fn bad_change_keeps_previous_assignment() {
        let (t1, _) = teachers();
        let admin = admin();
        let mut report = report();
        admin
            .assign_staff(&mut report, &[&t1], &mut ScriptedSelection::pick("1"))
            .unwrap();

        let err = admin
            .assign_staff(&mut report, &[&t1], &mut ScriptedSelection::pick("99"))
            .unwrap_err();

        assert_eq!(
            err,
            AssignError::Selection(SelectionError::OutOfRange {
                selected: 99,
                available: 1,
            })
        );
        assert_eq!(report.assigned_teacher(), Some(t1.id()));
    }

    #[test]
    fn non_teacher_cannot_be_assigned() {
        let student = User::student(
            "S001",
            "Ben Gonzales",
            "Ben@student.com",
            Grade::new(10).unwrap(),
            "yulo",
        );
        let mut report = report();

        let err = admin()
            .assign_staff(&mut report, &[&student], &mut ScriptedSelection::pick("1"))
            .unwrap_err();

        assert_eq!(
            err,
            AssignError::Selection(SelectionError::NotATeacher(student.id().clone()))
        );
        assert!(report.assigned_teacher().is_none());
    }

    #[test]
    fn only_administrators_may_assign() {
        let (t1, t2) = teachers();
        let mut report = report();

        let err = t1
            .assign_staff(&mut report, &[&t1, &t2], &mut ScriptedSelection::pick("1"))
            .unwrap_err();

        assert!(matches!(err, AssignError::PermissionDenied(_)));
        assert!(report.assigned_teacher().is_none());
    }

    #[test_case(" 2 ", 2, Ok(1); "whitespace is trimmed")]
    #[test_case("1", 1, Ok(0); "single option")]
    #[test_case("0", 1, Err(SelectionError::OutOfRange { selected: 0, available: 1 }); "zero")]
    #[test_case("x", 1, Err(SelectionError::NotANumber("x".to_string())); "letters")]
    fn selection_parsing(input: &str, available: usize, expected: Result<usize, SelectionError>) {
        assert_eq!(parse_selection(input, available), expected);
    }
}
