use std::{fmt, ops::Deref};

/// Unique, stable identifier of a user (e.g. `S001`).
///
/// Reports refer to users through this id rather than by holding the user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

/// The widest zero-padding a generated report id may use.
pub const MAX_REPORT_ID_DIGITS: usize = 9;

/// Unique identifier of a report (e.g. `R001`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportId(String);

impl ReportId {
    /// Build the sequential id for the `n`th report, zero-padded to `digits`.
    ///
    /// `digits` is capped at [`MAX_REPORT_ID_DIGITS`].
    ///
    /// # Examples
    ///
    /// ```
    /// use incident::ReportId;
    ///
    /// assert_eq!(ReportId::sequential(1, 3).to_string(), "R001");
    /// assert_eq!(ReportId::sequential(42, 4).to_string(), "R0042");
    /// assert_eq!(ReportId::sequential(1000, 3).to_string(), "R1000");
    /// ```
    #[must_use]
    pub fn sequential(n: usize, digits: usize) -> Self {
        let digits = digits.min(MAX_REPORT_ID_DIGITS);
        Self(format!("R{n:0digits$}"))
    }
}

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Returns the string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(UserId);
string_id!(ReportId);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(1, 3, "R001"; "first report")]
    #[test_case(99, 3, "R099"; "below width")]
    #[test_case(999, 3, "R999"; "at width")]
    #[test_case(1000, 3, "R1000"; "expands past width")]
    #[test_case(7, 1, "R7"; "single digit")]
    #[test_case(5, 70_000, "R000000005"; "oversize width is capped")]
    fn sequential_report_ids(n: usize, digits: usize, expected: &str) {
        assert_eq!(ReportId::sequential(n, digits).as_str(), expected);
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(UserId::from("S001"), UserId::from("S001".to_string()));
        assert_ne!(UserId::from("S001"), UserId::from("S002"));
    }
}
