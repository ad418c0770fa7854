//! Thin wrappers over `dialoguer` prompts.

use std::{collections::HashMap, fmt};

use dialoguer::{Confirm, Input, Password, Select};
use incident::{
    Report, User, UserId,
    domain::{ReassignChoice, SelectionSource},
};

use crate::cli::terminal::Colorize;

/// Pick one of `items`, returning its index.
pub fn select<T: fmt::Display>(prompt: &str, items: &[T]) -> dialoguer::Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
}

/// Read a line of free text. Empty input is allowed.
pub fn text(prompt: &str) -> dialoguer::Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
}

/// Read a comma-separated list, dropping blank entries.
pub fn list(prompt: &str) -> dialoguer::Result<Vec<String>> {
    let raw = text(prompt)?;
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn password(prompt: &str) -> dialoguer::Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
}

pub fn confirm(prompt: &str) -> dialoguer::Result<bool> {
    Confirm::new().with_prompt(prompt).default(false).interact()
}

/// Asks the operator for staff-assignment decisions.
///
/// Prompt failures (for example a closed terminal) are treated as backing
/// out: the reassignment menu answers [`ReassignChoice::Cancel`] and the
/// teacher selection is empty, which the workflow rejects.
pub struct DialoguerSelection {
    names: HashMap<UserId, String>,
}

impl DialoguerSelection {
    /// Build a selection source that can name any of `users`.
    pub fn new<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        let names = users
            .into_iter()
            .map(|user| (user.id().clone(), user.name().to_string()))
            .collect();
        Self { names }
    }

    fn name_of<'a>(&'a self, id: &'a UserId) -> &'a str {
        self.names.get(id).map_or(id.as_str(), String::as_str)
    }
}

impl SelectionSource for DialoguerSelection {
    fn reassign_choice(&mut self, report: &Report, current: &UserId) -> ReassignChoice {
        println!(
            "{}",
            format!(
                "Report {} is already assigned to {}.",
                report.id(),
                self.name_of(current)
            )
            .info()
        );

        let options = ["Change assigned teacher", "Remove assigned teacher", "Back"];
        match select("What would you like to do?", &options) {
            Ok(0) => ReassignChoice::Change,
            Ok(1) => ReassignChoice::Remove,
            Ok(_) => ReassignChoice::Cancel,
            Err(e) => {
                tracing::debug!("reassignment prompt failed: {e}");
                ReassignChoice::Cancel
            }
        }
    }

    fn teacher_selection(&mut self, report: &Report, teachers: &[&User]) -> String {
        println!("Available teachers for report {}:", report.id());
        for (number, teacher) in teachers.iter().enumerate() {
            println!(
                "  {}. {} {}",
                number + 1,
                teacher.name(),
                format!("<{}>", teacher.email()).dim()
            );
        }

        text("Select a teacher by number").unwrap_or_else(|e| {
            tracing::debug!("teacher prompt failed: {e}");
            String::new()
        })
    }
}
