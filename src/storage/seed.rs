use crate::{
    domain::{ConfidentialityLevel, Config, Grade, Profile, Report, User, hash_password},
    storage::{School, SchoolProfile},
};

/// A demo account: id, name, email, plaintext password, and grade for
/// students (`None` for staff, whose role is given by the id prefix).
type DemoAccount = (&'static str, &'static str, &'static str, &'static str, Option<u8>);

/// Demo accounts registered by [`demo_school`], with their plaintext
/// passwords.
pub const DEMO_ACCOUNTS: &[DemoAccount] = &[
    ("T001", "Ana Reyes", "ana@teacher.test", "chalk and slate", None),
    ("T002", "Marco Lim", "marco@teacher.test", "easel", None),
    ("A001", "Carlo Diaz", "carlo@admin.test", "ledger", None),
    ("S001", "Ben Gonzales", "Ben@student.com", "yulo", Some(10)),
    ("S002", "Jose Santos", "jose@student.test", "noli me tangere", Some(11)),
];

/// Build a school populated with the [`DEMO_ACCOUNTS`] and two unassigned
/// reports.
///
/// # Panics
///
/// Panics if a demo student has a grade of zero (which should never happen).
#[must_use]
pub fn demo_school(config: Config) -> School {
    let mut school = School::new(
        SchoolProfile::new("SCH001", "Riverside High", "1 River Road, Alangilan"),
        config,
    );

    for &(id, name, email, password, grade) in DEMO_ACCOUNTS {
        let profile = match (grade, id.as_bytes().first()) {
            (Some(grade), _) => Profile::Student {
                grade: Grade::new(grade).expect("demo grades are non-zero"),
            },
            (None, Some(b'A')) => Profile::Administrator,
            (None, _) => Profile::Teacher,
        };
        school.register_user(User::new(id, name, email, hash_password(password), profile));
    }

    let entrance = Report::in_person(
        school.next_report_id(),
        "A bullying incident near the school entrance.",
        ConfidentialityLevel::Confidential,
        "School Entrance",
    );
    register_demo_report(&mut school, entrance);

    let online = Report::cyber(
        school.next_report_id(),
        "Online bullying on a social media platform.",
        ConfidentialityLevel::HighlyConfidential,
        "Instagram",
    );
    register_demo_report(&mut school, online);

    school
}

fn register_demo_report(school: &mut School, report: Report) {
    if let Err(e) = school.register_report(report) {
        tracing::error!("demo report failed validation: {e}");
    }
}
