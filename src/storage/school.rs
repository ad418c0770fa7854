//! The in-memory registry of users and reports
//!
//! A [`School`] is constructed explicitly and passed to every operation that
//! needs it. Collections keep insertion order; uniqueness of ids is left to
//! the callers that provision users and file reports.

use tracing::instrument;

use crate::domain::{
    AssignError, AssignOutcome, Config, InvalidReportPolicy, Report, ReportId, Role,
    SelectionSource, User, UserId, ValidationError,
    access::{self, Action},
    roles::Filing,
};

/// Descriptive information about a school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolProfile {
    /// Short identifier, e.g. `SCH001`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: String,
}

impl SchoolProfile {
    /// Construct a school profile.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// The email, password and role combination did not match any user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No user with that email, role and password exists.
    #[error("authentication failed: check your credentials and role")]
    InvalidCredentials,
}

/// The users and reports of one school.
#[derive(Debug)]
pub struct School {
    profile: SchoolProfile,
    config: Config,
    users: Vec<User>,
    reports: Vec<Report>,
}

impl School {
    /// Create an empty school.
    #[must_use]
    pub const fn new(profile: SchoolProfile, config: Config) -> Self {
        Self {
            profile,
            config,
            users: Vec::new(),
            reports: Vec::new(),
        }
    }

    /// The school's descriptive information.
    #[must_use]
    pub const fn profile(&self) -> &SchoolProfile {
        &self.profile
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Add a user to the directory.
    pub fn register_user(&mut self, user: User) {
        tracing::debug!("registered {} {}", user.role(), user.id());
        self.users.push(user);
    }

    /// All users, in registration order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Users matching a predicate, in registration order.
    pub fn users_where<F>(&self, predicate: F) -> impl Iterator<Item = &User>
    where
        F: Fn(&User) -> bool,
    {
        self.users.iter().filter(move |user| predicate(user))
    }

    /// Look up a user by id.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    /// All teachers, in registration order.
    pub fn teachers(&self) -> impl Iterator<Item = &User> {
        self.users_where(|user| user.role() == Role::Teacher)
    }

    /// Authenticate a user.
    ///
    /// Returns the first user whose email matches (ignoring case), whose role
    /// is `role`, and whose password digest matches `password`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no user matches all
    /// three.
    #[instrument(level = "debug", skip(self, password))]
    pub fn login(&self, email: &str, password: &str, role: Role) -> Result<&User, AuthError> {
        let user = self
            .users
            .iter()
            .filter(|user| user.has_email(email) && user.role() == role)
            .find(|user| user.login(password));

        if let Some(user) = user {
            tracing::info!("{} {} logged in", user.role(), user.name());
            Ok(user)
        } else {
            tracing::warn!("failed {role} login for {email}");
            Err(AuthError::InvalidCredentials)
        }
    }

    /// The id the next generated report should get.
    ///
    /// This is `R` followed by the current report count plus one, padded to
    /// the configured width.
    #[must_use]
    pub fn next_report_id(&self) -> ReportId {
        ReportId::sequential(self.reports.len() + 1, self.config.report_id_digits())
    }

    /// Add a report to the directory, subject to the invalid-report policy.
    ///
    /// Valid reports are always registered. Invalid reports are handled as
    /// configured by [`Config::invalid_reports`]: rejected, discarded, or
    /// registered with [`Report::is_flagged_invalid`] set.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] when the report is invalid and the
    /// policy is [`InvalidReportPolicy::Reject`]. Nothing is registered.
    #[instrument(level = "debug", skip(self, report), fields(report = %report.id()))]
    pub fn register_report(&mut self, mut report: Report) -> Result<Filing, ValidationError> {
        let id = report.id().clone();

        if let Err(e) = report.validate() {
            match self.config.invalid_reports {
                InvalidReportPolicy::Reject => {
                    tracing::warn!("rejected {e}");
                    return Err(e);
                }
                InvalidReportPolicy::Discard => {
                    tracing::warn!("discarded {e}");
                    return Ok(Filing::Discarded(id));
                }
                InvalidReportPolicy::Flag => {
                    tracing::warn!("registering flagged {e}");
                    report.flagged_invalid = true;
                    self.reports.push(report);
                    return Ok(Filing::Flagged(id));
                }
            }
        }

        tracing::info!("report {id} registered in {}", self.profile.name);
        self.reports.push(report);
        Ok(Filing::Registered(id))
    }

    /// All reports, in registration order.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Look up a report by id.
    #[must_use]
    pub fn report(&self, id: &ReportId) -> Option<&Report> {
        self.reports.iter().find(|report| report.id() == id)
    }

    /// Look up a report by id for modification.
    pub fn report_mut(&mut self, id: &ReportId) -> Option<&mut Report> {
        self.reports.iter_mut().find(|report| report.id() == id)
    }

    /// Reports matching a predicate, in registration order.
    pub fn reports_where<F>(&self, predicate: F) -> impl Iterator<Item = &Report>
    where
        F: Fn(&Report) -> bool,
    {
        self.reports.iter().filter(move |report| predicate(report))
    }

    /// Reports filed by the given student.
    pub fn reports_filed_by<'a>(&'a self, student: &'a UserId) -> impl Iterator<Item = &'a Report> {
        self.reports_where(move |report| report.reporter() == Some(student))
    }

    /// Reports assigned to the given teacher.
    pub fn reports_assigned_to<'a>(
        &'a self,
        teacher: &'a UserId,
    ) -> impl Iterator<Item = &'a Report> {
        self.reports_where(move |report| report.assigned_teacher() == Some(teacher))
    }

    /// Assign, change or remove the reviewing teacher of a registered report.
    ///
    /// The available teachers are every teacher in the directory, in
    /// registration order. See [`User::assign_staff`].
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::PermissionDenied`] if the user is not an
    /// administrator, whether or not the report exists. Otherwise returns
    /// [`AssignError::ReportNotFound`] if no report has the given id, or any
    /// error of [`User::assign_staff`].
    pub fn assign_staff(
        &mut self,
        administrator: &User,
        report: &ReportId,
        selection: &mut dyn SelectionSource,
    ) -> Result<AssignOutcome, AssignError> {
        access::require(administrator, Action::AssignStaff)?;

        let teachers: Vec<&User> = self
            .users
            .iter()
            .filter(|user| user.role() == Role::Teacher)
            .collect();
        let report = self
            .reports
            .iter_mut()
            .find(|candidate| candidate.id() == report)
            .ok_or_else(|| AssignError::ReportNotFound(report.clone()))?;

        administrator.assign_staff(report, &teachers, selection)
    }
}
