use incident::{
    ReportId, School, SecurityManager, User,
    domain::{EncryptOutcome, StatusChange},
};

use crate::cli::{listing, prompt, terminal::Colorize};

pub fn menu(school: &mut School, user: &User, security: &SecurityManager) -> anyhow::Result<()> {
    let options = [
        "Review an assigned report",
        "View my assigned reports",
        "Log out",
    ];

    loop {
        match prompt::select("Teacher menu", &options)? {
            0 => review(school, user, security)?,
            1 => listing::render(school, school.reports_assigned_to(user.id())),
            _ => return Ok(()),
        }
    }
}

fn review(school: &mut School, user: &User, security: &SecurityManager) -> anyhow::Result<()> {
    let directory: &School = school;
    let (ids, labels): (Vec<ReportId>, Vec<String>) = directory
        .reports_assigned_to(user.id())
        .map(|report| (report.id().clone(), listing::label(directory, report)))
        .unzip();

    if ids.is_empty() {
        println!("{}", "No reports are assigned to you.".dim());
        return Ok(());
    }

    let id = &ids[prompt::select("Select a report to review", &labels)?];
    let Some(report) = school.report_mut(id) else {
        anyhow::bail!("report {id} disappeared during review");
    };

    let outcome = user.review_report(report, security)?;
    match outcome.status {
        StatusChange::Started => {
            println!("{}", format!("Report {id} is now {}.", report.status()).success());
        }
        StatusChange::AlreadyProcessed(status) => {
            println!("{}", format!("Report {id} has already been processed ({status}).").dim());
        }
    }
    if outcome.encryption == EncryptOutcome::Encrypted {
        println!("{}", "Report details encrypted.".dim());
    }

    if prompt::confirm("View the report description?")? {
        match report.readable_description(security) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("{}", format!("Could not decode the description: {e}").error()),
        }
    }
    Ok(())
}
