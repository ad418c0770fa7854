use incident::{
    Filing, Report, School, User,
    domain::{ConfidentialityLevel, FileError},
};

use crate::cli::{listing, prompt, terminal::Colorize};

pub fn menu(school: &mut School, user: &User) -> anyhow::Result<()> {
    let options = ["File a bullying report", "View my reports", "Log out"];

    loop {
        match prompt::select("Student menu", &options)? {
            0 => file_report(school, user)?,
            1 => listing::render(school, school.reports_filed_by(user.id())),
            _ => return Ok(()),
        }
    }
}

fn file_report(school: &mut School, user: &User) -> anyhow::Result<()> {
    let report = compose_report(school)?;

    match user.file_report(school, report) {
        Ok(Filing::Registered(id)) => {
            println!("{}", format!("✅ Report {id} submitted.").success());
        }
        Ok(Filing::Flagged(id)) => {
            println!(
                "{}",
                format!("⚠️  Report {id} submitted but marked as incomplete.").warning()
            );
        }
        Ok(Filing::Discarded(id)) => {
            println!(
                "{}",
                format!("⚠️  Report {id} was incomplete and has been discarded.").warning()
            );
        }
        Err(FileError::Invalid(e)) => {
            eprintln!("{}", format!("Report not submitted: {e}").error());
        }
        Err(e) => eprintln!("{}", e.to_string().error()),
    }
    Ok(())
}

fn compose_report(school: &School) -> anyhow::Result<Report> {
    let kind = prompt::select("Type of incident", &["In-person", "Cyberbullying"])?;
    let description = prompt::text("Describe what happened")?;

    let levels = [
        ConfidentialityLevel::Public,
        ConfidentialityLevel::Confidential,
        ConfidentialityLevel::HighlyConfidential,
    ];
    let level = levels[prompt::select("Confidentiality", &levels)?];

    let id = school.next_report_id();
    let report = if kind == 0 {
        let location = prompt::text("Where did it happen?")?;
        let witnesses = prompt::list("Witnesses (comma-separated, optional)")?;
        Report::in_person(id, description, level, location).with_witnesses(witnesses)
    } else {
        let platform = prompt::text("Which online platform?")?;
        let evidence = prompt::list("Evidence (comma-separated, optional)")?;
        Report::cyber(id, description, level, platform).with_evidence(evidence)
    };
    Ok(report)
}
