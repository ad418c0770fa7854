use incident::{AssignError, AssignOutcome, ReportId, School, User, UserId};

use crate::cli::{
    listing,
    prompt::{self, DialoguerSelection},
    terminal::Colorize,
};

pub fn menu(school: &mut School, user: &User) -> anyhow::Result<()> {
    let options = ["Assign staff to a report", "View all reports", "Log out"];

    loop {
        match prompt::select("Administrator menu", &options)? {
            0 => assign(school, user)?,
            1 => listing::render(school, school.reports()),
            _ => return Ok(()),
        }
    }
}

fn assign(school: &mut School, user: &User) -> anyhow::Result<()> {
    let directory: &School = school;
    let (ids, labels): (Vec<ReportId>, Vec<String>) = directory
        .reports()
        .iter()
        .map(|report| (report.id().clone(), listing::label(directory, report)))
        .unzip();

    if ids.is_empty() {
        println!("{}", "There are no reports to assign.".dim());
        return Ok(());
    }

    let id = &ids[prompt::select("Select a report", &labels)?];
    let mut selection = DialoguerSelection::new(school.users());

    match school.assign_staff(user, id, &mut selection) {
        Ok(AssignOutcome::Assigned { teacher, replaced }) => {
            let message = match replaced {
                Some(previous) => format!(
                    "✅ Report {id} reassigned from {} to {}.",
                    name(school, &previous),
                    name(school, &teacher)
                ),
                None => format!("✅ Report {id} assigned to {}.", name(school, &teacher)),
            };
            println!("{}", message.success());
        }
        Ok(AssignOutcome::Removed { teacher }) => {
            println!(
                "{}",
                format!("{} removed from report {id}.", name(school, &teacher)).success()
            );
        }
        Ok(AssignOutcome::Cancelled) => println!("{}", "No changes made.".dim()),
        Err(AssignError::Selection(e)) => eprintln!("{}", e.to_string().error()),
        Err(e) => eprintln!("{}", format!("Assignment failed: {e}").error()),
    }
    Ok(())
}

fn name<'a>(school: &'a School, id: &'a UserId) -> &'a str {
    school.user(id).map_or(id.as_str(), User::name)
}
