use std::{borrow::Cow, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    codec::{DecodeError, SecurityManager},
    id::{ReportId, UserId},
};

/// Where a report is in the review process.
///
/// Reports start as [`ReportStatus::New`]. Reviewing moves them to
/// [`ReportStatus::InProgress`]. [`ReportStatus::Resolved`] is a terminal
/// state that no current operation transitions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Filed, not yet reviewed.
    #[default]
    New,
    /// Reviewed at least once.
    InProgress,
    /// Closed.
    Resolved,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        };
        f.write_str(token)
    }
}

/// How sensitive the reporter considers the report.
///
/// This is informational; it does not gate access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidentialityLevel {
    /// May be discussed openly.
    Public,
    /// Default level.
    #[default]
    Confidential,
    /// Restricted to the reviewing staff.
    HighlyConfidential,
}

impl fmt::Display for ConfidentialityLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            Self::Public => "PUBLIC",
            Self::Confidential => "CONFIDENTIAL",
            Self::HighlyConfidential => "HIGHLY_CONFIDENTIAL",
        };
        f.write_str(token)
    }
}

/// Variant-specific report data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDetails {
    /// An incident that happened on the premises.
    InPerson {
        /// Where it happened. Required.
        location: String,
        /// Names of witnesses, if any.
        witnesses: Vec<String>,
    },
    /// An incident that happened online.
    Cyber {
        /// The platform it happened on. Required.
        online_platform: String,
        /// Links, screenshots or other references.
        evidence: Vec<String>,
    },
}

/// A field that must be non-empty for a report to be well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// The free-text description.
    Description,
    /// The location of an in-person incident.
    Location,
    /// The platform of an online incident.
    OnlinePlatform,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            Self::Description => "description",
            Self::Location => "location",
            Self::OnlinePlatform => "online platform",
        };
        f.write_str(token)
    }
}

/// A report is missing one or more required fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    /// The report that failed validation.
    pub report: ReportId,
    /// Every required field that was empty.
    pub missing: Vec<RequiredField>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report {} is missing: ", self.report)?;
        for (i, field) in self.missing.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// The result of asking a report to encrypt its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptOutcome {
    /// The description was transformed by this call.
    Encrypted,
    /// The description was already transformed; nothing changed.
    AlreadyEncrypted,
}

/// A bullying report.
///
/// A report is either an in-person or a cyberbullying report, see
/// [`ReportDetails`]. It is filed by a student, reviewed by teachers and
/// assigned a reviewing teacher by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    id: ReportId,
    date: DateTime<Utc>,
    description: String,
    confidentiality: ConfidentialityLevel,
    pub(crate) status: ReportStatus,
    encrypted: bool,
    pub(crate) reporter: Option<UserId>,
    pub(crate) assigned_teacher: Option<UserId>,
    pub(crate) flagged_invalid: bool,
    details: ReportDetails,
}

impl Report {
    /// Construct a new report dated now.
    #[must_use]
    pub fn new(
        id: ReportId,
        description: String,
        confidentiality: ConfidentialityLevel,
        details: ReportDetails,
    ) -> Self {
        Self {
            id,
            date: Utc::now(),
            description,
            confidentiality,
            status: ReportStatus::New,
            encrypted: false,
            reporter: None,
            assigned_teacher: None,
            flagged_invalid: false,
            details,
        }
    }

    /// Construct an in-person report with no witnesses.
    #[must_use]
    pub fn in_person(
        id: impl Into<ReportId>,
        description: impl Into<String>,
        confidentiality: ConfidentialityLevel,
        location: impl Into<String>,
    ) -> Self {
        Self::new(
            id.into(),
            description.into(),
            confidentiality,
            ReportDetails::InPerson {
                location: location.into(),
                witnesses: Vec::new(),
            },
        )
    }

    /// Construct a cyberbullying report with no evidence.
    #[must_use]
    pub fn cyber(
        id: impl Into<ReportId>,
        description: impl Into<String>,
        confidentiality: ConfidentialityLevel,
        online_platform: impl Into<String>,
    ) -> Self {
        Self::new(
            id.into(),
            description.into(),
            confidentiality,
            ReportDetails::Cyber {
                online_platform: online_platform.into(),
                evidence: Vec::new(),
            },
        )
    }

    /// Set the witnesses of an in-person report.
    ///
    /// Has no effect on a cyberbullying report.
    #[must_use]
    pub fn with_witnesses(mut self, names: Vec<String>) -> Self {
        if let ReportDetails::InPerson { witnesses, .. } = &mut self.details {
            *witnesses = names;
        }
        self
    }

    /// Set the evidence of a cyberbullying report.
    ///
    /// Has no effect on an in-person report.
    #[must_use]
    pub fn with_evidence(mut self, items: Vec<String>) -> Self {
        if let ReportDetails::Cyber { evidence, .. } = &mut self.details {
            *evidence = items;
        }
        self
    }

    /// Override the report date.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// The report's identifier.
    #[must_use]
    pub const fn id(&self) -> &ReportId {
        &self.id
    }

    /// When the report was created.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The description as currently stored.
    ///
    /// Once the report is encrypted this is the encoded form, see
    /// [`Report::readable_description`].
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The confidentiality level chosen by the reporter.
    #[must_use]
    pub const fn confidentiality(&self) -> ConfidentialityLevel {
        self.confidentiality
    }

    /// The current review status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// Whether the description has been transformed.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// The student who filed the report, if known.
    #[must_use]
    pub const fn reporter(&self) -> Option<&UserId> {
        self.reporter.as_ref()
    }

    /// The teacher assigned to review the report, if any.
    #[must_use]
    pub const fn assigned_teacher(&self) -> Option<&UserId> {
        self.assigned_teacher.as_ref()
    }

    /// Whether the report was stored despite failing validation.
    #[must_use]
    pub const fn is_flagged_invalid(&self) -> bool {
        self.flagged_invalid
    }

    /// Variant-specific data.
    #[must_use]
    pub const fn details(&self) -> &ReportDetails {
        &self.details
    }

    /// The name of the report variant, for listings.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.details {
            ReportDetails::InPerson { .. } => "InPersonReport",
            ReportDetails::Cyber { .. } => "CyberBullyingReport",
        }
    }

    /// Check that the description and the variant's required field are
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every empty required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.description.is_empty() {
            missing.push(RequiredField::Description);
        }
        match &self.details {
            ReportDetails::InPerson { location, .. } if location.is_empty() => {
                missing.push(RequiredField::Location);
            }
            ReportDetails::Cyber {
                online_platform, ..
            } if online_platform.is_empty() => {
                missing.push(RequiredField::OnlinePlatform);
            }
            _ => {}
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                report: self.id.clone(),
                missing,
            })
        }
    }

    /// Whether [`Report::validate`] passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Replace the description with its encoded form.
    ///
    /// This is idempotent: once encrypted, further calls change nothing and
    /// return [`EncryptOutcome::AlreadyEncrypted`].
    pub fn encrypt_details(&mut self, security: &SecurityManager) -> EncryptOutcome {
        if self.encrypted {
            tracing::debug!("{} {} is already encrypted", self.kind_name(), self.id);
            return EncryptOutcome::AlreadyEncrypted;
        }

        self.description = security.encrypt_data(&self.description);
        self.encrypted = true;
        tracing::info!("{} {} details encrypted", self.kind_name(), self.id);
        EncryptOutcome::Encrypted
    }

    /// The description in plain text, decoding it if the report is
    /// encrypted.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the stored description cannot be decoded
    /// with the given security manager's codec.
    pub fn readable_description(
        &self,
        security: &SecurityManager,
    ) -> Result<Cow<'_, str>, DecodeError> {
        if self.encrypted {
            security.decrypt_data(&self.description).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(&self.description))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use test_case::test_case;

    use super::*;

    fn cafeteria() -> Report {
        Report::in_person(
            "R001",
            "A bullying incident near the cafeteria.",
            ConfidentialityLevel::Confidential,
            "Cafeteria",
        )
    }

    #[test]
    fn new_report_defaults() {
        let report = cafeteria();
        assert_eq!(report.status(), ReportStatus::New);
        assert!(!report.is_encrypted());
        assert!(report.reporter().is_none());
        assert!(report.assigned_teacher().is_none());
        assert!(!report.is_flagged_invalid());
        assert_eq!(
            report.details(),
            &ReportDetails::InPerson {
                location: "Cafeteria".to_string(),
                witnesses: Vec::new(),
            }
        );
    }

    #[test_case("desc", "Cafeteria", &[]; "valid")]
    #[test_case("", "Cafeteria", &[RequiredField::Description]; "missing description")]
    #[test_case("desc", "", &[RequiredField::Location]; "missing location")]
    #[test_case("", "", &[RequiredField::Description, RequiredField::Location]; "missing both")]
    fn in_person_validation(description: &str, location: &str, missing: &[RequiredField]) {
        let report = Report::in_person("R001", description, ConfidentialityLevel::Public, location);
        match report.validate() {
            Ok(()) => assert!(missing.is_empty()),
            Err(e) => assert_eq!(e.missing, missing),
        }
        assert_eq!(report.is_valid(), missing.is_empty());
    }

    #[test_case("desc", "Instagram", true; "valid")]
    #[test_case("desc", "", false; "missing platform")]
    #[test_case("", "Instagram", false; "missing description")]
    fn cyber_validation(description: &str, platform: &str, valid: bool) {
        let report = Report::cyber("R002", description, ConfidentialityLevel::Public, platform);
        assert_eq!(report.is_valid(), valid);
    }

    #[test]
    fn validation_error_lists_fields() {
        let report = Report::cyber("R009", "", ConfidentialityLevel::Public, "");
        let err = report.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "report R009 is missing: description, online platform"
        );
    }

    #[test]
    fn encrypt_is_idempotent() {
        let security = SecurityManager::new();
        let mut report = cafeteria();

        assert_eq!(report.encrypt_details(&security), EncryptOutcome::Encrypted);
        let once = report.description().to_string();
        assert_ne!(once, "A bullying incident near the cafeteria.");

        assert_eq!(
            report.encrypt_details(&security),
            EncryptOutcome::AlreadyEncrypted
        );
        assert_eq!(report.description(), once);
        assert!(report.is_encrypted());
    }

    #[test]
    fn readable_description_decodes_when_encrypted() {
        let security = SecurityManager::new();
        let mut report = cafeteria();
        assert_eq!(
            report.readable_description(&security).unwrap(),
            "A bullying incident near the cafeteria."
        );

        report.encrypt_details(&security);
        assert_eq!(
            report.readable_description(&security).unwrap(),
            "A bullying incident near the cafeteria."
        );
    }

    #[test]
    fn empty_description_encrypts_and_decodes() {
        let security = SecurityManager::new();
        let mut report = Report::cyber("R003", "", ConfidentialityLevel::Public, "Discord");
        report.encrypt_details(&security);
        assert!(report.is_encrypted());
        assert_eq!(report.readable_description(&security).unwrap(), "");
    }

    #[test]
    fn builders_only_touch_their_variant() {
        let report = cafeteria()
            .with_witnesses(vec!["Jose".to_string()])
            .with_evidence(vec!["ignored".to_string()]);
        assert_eq!(
            report.details(),
            &ReportDetails::InPerson {
                location: "Cafeteria".to_string(),
                witnesses: vec!["Jose".to_string()],
            }
        );

        let cyber = Report::cyber("R002", "d", ConfidentialityLevel::Public, "Instagram")
            .with_evidence(vec!["screenshot.png".to_string()]);
        assert_eq!(
            cyber.details(),
            &ReportDetails::Cyber {
                online_platform: "Instagram".to_string(),
                evidence: vec!["screenshot.png".to_string()],
            }
        );
    }

    #[test]
    fn date_can_be_fixed() {
        let date = Utc.with_ymd_and_hms(2024, 9, 2, 8, 30, 0).unwrap();
        assert_eq!(cafeteria().with_date(date).date(), date);
    }

    #[test]
    fn kind_names() {
        assert_eq!(cafeteria().kind_name(), "InPersonReport");
        assert_eq!(
            Report::cyber("R2", "d", ConfidentialityLevel::Public, "p").kind_name(),
            "CyberBullyingReport"
        );
    }

    #[test]
    fn status_displays_like_the_wire_names() {
        assert_eq!(ReportStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(
            ConfidentialityLevel::HighlyConfidential.to_string(),
            "HIGHLY_CONFIDENTIAL"
        );
    }
}
