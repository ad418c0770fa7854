use tracing::instrument;

use crate::{
    domain::{
        access::{self, Action, PermissionDenied},
        codec::SecurityManager,
        id::ReportId,
        report::{EncryptOutcome, Report, ReportStatus, ValidationError},
        user::User,
    },
    storage::School,
};

/// What happened to a filed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filing {
    /// The report passed validation and was registered.
    Registered(ReportId),
    /// The report failed validation and was dropped without being registered.
    Discarded(ReportId),
    /// The report failed validation but was registered, flagged as invalid.
    Flagged(ReportId),
}

impl Filing {
    /// The id of the filed report.
    #[must_use]
    pub const fn report_id(&self) -> &ReportId {
        match self {
            Self::Registered(id) | Self::Discarded(id) | Self::Flagged(id) => id,
        }
    }

    /// Whether the report is now present in the school.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        matches!(self, Self::Registered(_) | Self::Flagged(_))
    }
}

/// Errors that can occur when filing a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileError {
    /// The user is not allowed to file reports.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    /// The report failed validation and the school rejects invalid reports.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// How a review changed the report's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The report moved from `NEW` to `IN_PROGRESS`.
    Started,
    /// The report had already been processed; its status was left alone.
    AlreadyProcessed(ReportStatus),
}

/// The observable effects of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// What happened to the status.
    pub status: StatusChange,
    /// What happened to the description.
    pub encryption: EncryptOutcome,
}

impl User {
    /// File a report as this user.
    ///
    /// The user is recorded as the reporter, and the report is handed to the
    /// school, which applies its invalid-report policy.
    ///
    /// # Errors
    ///
    /// - [`FileError::PermissionDenied`] if the user is not a student.
    /// - [`FileError::Invalid`] if the report fails validation and the school
    ///   rejects invalid reports.
    ///
    /// In both cases the school is left unchanged.
    #[instrument(level = "debug", skip_all, fields(user = %self.id(), report = %report.id()))]
    pub fn file_report(&self, school: &mut School, mut report: Report) -> Result<Filing, FileError> {
        access::require(self, Action::FileReport)?;

        report.reporter = Some(self.id().clone());
        let filing = school.register_report(report)?;
        if filing.is_stored() {
            tracing::info!("report {} submitted by {}", filing.report_id(), self.name());
        }
        Ok(filing)
    }

    /// Review a report as this user.
    ///
    /// A `NEW` report moves to `IN_PROGRESS`; a report in any other state
    /// keeps its status. Either way the description is then encrypted if it
    /// is not already.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionDenied`] if the user is not a teacher. The report
    /// is left unchanged.
    #[instrument(level = "debug", skip_all, fields(user = %self.id(), report = %report.id()))]
    pub fn review_report(
        &self,
        report: &mut Report,
        security: &SecurityManager,
    ) -> Result<ReviewOutcome, PermissionDenied> {
        access::require(self, Action::ReviewReport)?;
        tracing::info!("teacher {} is reviewing report {}", self.name(), report.id());

        let status = if report.status == ReportStatus::New {
            report.status = ReportStatus::InProgress;
            tracing::info!("report {} status updated to {}", report.id(), report.status);
            StatusChange::Started
        } else {
            tracing::debug!("report {} has already been processed", report.id());
            StatusChange::AlreadyProcessed(report.status)
        };

        let encryption = report.encrypt_details(security);

        Ok(ReviewOutcome { status, encryption })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConfidentialityLevel, Config, Grade, InvalidReportPolicy, Role},
        storage::SchoolProfile,
    };

    fn ben() -> User {
        User::student(
            "S001",
            "Ben Gonzales",
            "Ben@student.com",
            Grade::new(10).unwrap(),
            "yulo",
        )
    }

    fn teacher() -> User {
        User::teacher("T001", "Ana Reyes", "ana@teacher.test", "chalk")
    }

    fn school(policy: InvalidReportPolicy) -> School {
        School::new(
            SchoolProfile::new("SCH001", "Riverside High", "1 River Road"),
            Config::default().with_invalid_reports(policy),
        )
    }

    fn cafeteria(id: ReportId) -> Report {
        Report::in_person(
            id,
            "A bullying incident near the cafeteria.",
            ConfidentialityLevel::Confidential,
            "Cafeteria",
        )
    }

    #[test]
    fn student_files_in_person_report() {
        let mut school = school(InvalidReportPolicy::Reject);
        let ben = ben();
        assert!(ben.login("yulo"));

        let id = school.next_report_id();
        let filing = ben.file_report(&mut school, cafeteria(id.clone())).unwrap();
        assert_eq!(filing, Filing::Registered(id.clone()));

        assert_eq!(school.reports().len(), 1);
        let report = school.report(&id).unwrap();
        assert_eq!(report.reporter(), Some(ben.id()));
        assert_eq!(report.status(), ReportStatus::New);
        assert!(!report.is_encrypted());
        assert_eq!(report.description(), "A bullying incident near the cafeteria.");
        assert_eq!(report.confidentiality(), ConfidentialityLevel::Confidential);
        assert_eq!(
            report.details(),
            &crate::domain::ReportDetails::InPerson {
                location: "Cafeteria".to_string(),
                witnesses: Vec::new(),
            }
        );
    }

    #[test]
    fn incomplete_report_is_not_registered() {
        let mut school = school(InvalidReportPolicy::Reject);
        let report = Report::in_person("R001", "", ConfidentialityLevel::Confidential, "");

        let err = ben().file_report(&mut school, report).unwrap_err();

        assert!(matches!(err, FileError::Invalid(_)));
        assert!(school.report(&ReportId::from("R001")).is_none());
    }

    #[test]
    fn discarded_report_is_not_registered() {
        let mut school = school(InvalidReportPolicy::Discard);
        let report = Report::cyber("R001", "", ConfidentialityLevel::Public, "");

        let filing = ben().file_report(&mut school, report).unwrap();

        assert!(!filing.is_stored());
        assert!(school.reports().is_empty());
    }

    #[test]
    fn flagged_report_keeps_its_reporter() {
        let mut school = school(InvalidReportPolicy::Flag);
        let report = Report::cyber("R001", "", ConfidentialityLevel::Public, "");

        let filing = ben().file_report(&mut school, report).unwrap();

        assert!(filing.is_stored());
        let stored = &school.reports()[0];
        assert!(stored.is_flagged_invalid());
        assert_eq!(stored.reporter().map(|id| id.as_str()), Some("S001"));
    }

    #[test]
    fn only_students_may_file() {
        let mut school = school(InvalidReportPolicy::Reject);

        let err = teacher()
            .file_report(&mut school, cafeteria(ReportId::from("R001")))
            .unwrap_err();

        assert_eq!(
            err,
            FileError::PermissionDenied(PermissionDenied {
                role: Role::Teacher,
                action: Action::FileReport,
            })
        );
        assert!(school.reports().is_empty());
    }

    #[test]
    fn review_moves_new_report_in_progress_once() {
        let security = SecurityManager::new();
        let mut report = cafeteria(ReportId::from("R001"));
        let teacher = teacher();

        let first = teacher.review_report(&mut report, &security).unwrap();
        assert_eq!(
            first,
            ReviewOutcome {
                status: StatusChange::Started,
                encryption: EncryptOutcome::Encrypted,
            }
        );
        assert_eq!(report.status(), ReportStatus::InProgress);
        let encrypted = report.description().to_string();

        let second = teacher.review_report(&mut report, &security).unwrap();
        assert_eq!(
            second,
            ReviewOutcome {
                status: StatusChange::AlreadyProcessed(ReportStatus::InProgress),
                encryption: EncryptOutcome::AlreadyEncrypted,
            }
        );
        assert_eq!(report.status(), ReportStatus::InProgress);
        assert_eq!(report.description(), encrypted);
        assert_eq!(
            report.readable_description(&security).unwrap(),
            "A bullying incident near the cafeteria."
        );
    }

    #[test]
    fn review_encrypts_even_when_already_processed() {
        let security = SecurityManager::new();
        let mut report = cafeteria(ReportId::from("R001"));
        report.status = ReportStatus::InProgress;

        let outcome = teacher().review_report(&mut report, &security).unwrap();

        assert_eq!(
            outcome.status,
            StatusChange::AlreadyProcessed(ReportStatus::InProgress)
        );
        assert_eq!(outcome.encryption, EncryptOutcome::Encrypted);
        assert!(report.is_encrypted());
    }

    #[test]
    fn only_teachers_may_review() {
        let security = SecurityManager::new();
        let mut report = cafeteria(ReportId::from("R001"));
        let before = report.clone();

        let err = ben().review_report(&mut report, &security).unwrap_err();

        assert_eq!(err.action, Action::ReviewReport);
        assert_eq!(report, before);
    }
}
