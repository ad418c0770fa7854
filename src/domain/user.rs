use std::{fmt, num::NonZeroU8};

use crate::domain::{
    access::{Principal, Role},
    credentials::{self, PasswordDigest},
    id::UserId,
};

/// A student's school grade (a small positive integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(NonZeroU8);

impl Grade {
    /// Create a grade.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGradeError`] if `grade` is zero.
    pub fn new(grade: u8) -> Result<Self, InvalidGradeError> {
        NonZeroU8::new(grade).map(Self).ok_or(InvalidGradeError)
    }

    /// The grade as a number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when constructing a grade of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grade must be a positive integer")]
pub struct InvalidGradeError;

/// Role-specific data of a user.
///
/// The variant fixes the user's [`Role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// A student, who may file reports.
    Student {
        /// The student's grade.
        grade: Grade,
    },
    /// A teacher, who may review reports.
    Teacher,
    /// An administrator, who may assign reviewing staff.
    Administrator,
}

impl Profile {
    /// The role tag of this profile.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Student { .. } => Role::Student,
            Self::Teacher => Role::Teacher,
            Self::Administrator => Role::Administrator,
        }
    }
}

/// A person with an account in the school system.
///
/// Users are created once at provisioning time and do not change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    password: PasswordDigest,
    profile: Profile,
}

impl User {
    /// Construct a user from an already computed password digest.
    #[must_use]
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: PasswordDigest,
        profile: Profile,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            password,
            profile,
        }
    }

    /// Construct a student, hashing the given plaintext password.
    #[must_use]
    pub fn student(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        grade: Grade,
        password: &str,
    ) -> Self {
        Self::new(
            id,
            name,
            email,
            credentials::hash_password(password),
            Profile::Student { grade },
        )
    }

    /// Construct a teacher, hashing the given plaintext password.
    #[must_use]
    pub fn teacher(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Self {
        Self::new(
            id,
            name,
            email,
            credentials::hash_password(password),
            Profile::Teacher,
        )
    }

    /// Construct an administrator, hashing the given plaintext password.
    #[must_use]
    pub fn administrator(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Self {
        Self::new(
            id,
            name,
            email,
            credentials::hash_password(password),
            Profile::Administrator,
        )
    }

    /// The user's unique identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// The user's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's email address, as provisioned.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The stored password digest.
    #[must_use]
    pub const fn password_digest(&self) -> &PasswordDigest {
        &self.password
    }

    /// Role-specific data.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.profile.role()
    }

    /// The student's grade, if this user is a student.
    #[must_use]
    pub const fn grade(&self) -> Option<Grade> {
        match self.profile {
            Profile::Student { grade } => Some(grade),
            Profile::Teacher | Profile::Administrator => None,
        }
    }

    /// Whether this user's email matches `email`, ignoring case.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Check a candidate password against the stored digest.
    #[must_use]
    pub fn login(&self, password: &str) -> bool {
        credentials::verify_password(password, &self.password)
    }
}

impl Principal for User {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.profile.role()
    }
}
