use anyhow::Context;
use clap::{Parser, ValueEnum};
use incident::{Report, School, UserId};
use serde::Serialize;

use crate::cli::terminal::{self, Colorize};

/// Command arguments for `incident reports`.
#[derive(Debug, Parser)]
pub struct Reports {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Reports {
    pub fn run(self, school: &School) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Table => {
                render(school, school.reports());
                Ok(())
            }
            OutputFormat::Json => render_json(school, school.reports()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One report as shown to an operator.
///
/// The description is never part of a listing; it is only shown on an
/// explicit request by a reviewing teacher.
#[derive(Debug, Serialize)]
struct Row {
    id: String,
    kind: &'static str,
    date: String,
    status: String,
    confidentiality: String,
    reporter: String,
    assigned_to: String,
    flagged_invalid: bool,
}

impl Row {
    const HEADERS: [&'static str; 6] = ["ID", "TYPE", "DATE", "STATUS", "LEVEL", "ASSIGNED TO"];

    fn new(school: &School, report: &Report) -> Self {
        let name_of = |id: &UserId| {
            school
                .user(id)
                .map_or_else(|| id.to_string(), |user| user.name().to_string())
        };

        Self {
            id: report.id().to_string(),
            kind: report.kind_name(),
            date: report.date().format("%Y-%m-%d %H:%M").to_string(),
            status: report.status().to_string(),
            confidentiality: report.confidentiality().to_string(),
            reporter: report.reporter().map_or_else(|| "-".to_string(), name_of),
            assigned_to: report
                .assigned_teacher()
                .map_or_else(|| "None".to_string(), name_of),
            flagged_invalid: report.is_flagged_invalid(),
        }
    }

    fn cells(&self) -> [&str; 6] {
        [
            &self.id,
            self.kind,
            &self.date,
            &self.status,
            &self.confidentiality,
            &self.assigned_to,
        ]
    }
}

/// Print the given reports as an aligned table, or one line per report on a
/// narrow terminal.
pub fn render<'a>(school: &School, reports: impl IntoIterator<Item = &'a Report>) {
    let rows: Vec<Row> = reports
        .into_iter()
        .map(|report| Row::new(school, report))
        .collect();

    if rows.is_empty() {
        println!("{}", "No reports to show.".dim());
        return;
    }

    if terminal::is_narrow() {
        for row in &rows {
            println!(
                "{} {} [{}] -> {}{}",
                row.id.info(),
                row.kind,
                row.status,
                row.assigned_to,
                flag_marker(row)
            );
        }
        return;
    }

    let widths: Vec<usize> = Row::HEADERS
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row.cells()[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in Row::HEADERS.iter().zip(widths.iter().copied()) {
        print!("{header:<width$}  ");
    }
    println!();
    for width in widths.iter().copied() {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in &rows {
        for (value, width) in row.cells().iter().zip(widths.iter().copied()) {
            print!("{value:<width$}  ");
        }
        println!("{}", flag_marker(row));
    }
}

fn render_json<'a>(
    school: &School,
    reports: impl IntoIterator<Item = &'a Report>,
) -> anyhow::Result<()> {
    let rows: Vec<Row> = reports
        .into_iter()
        .map(|report| Row::new(school, report))
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

fn flag_marker(row: &Row) -> String {
    if row.flagged_invalid {
        " (incomplete)".warning()
    } else {
        String::new()
    }
}

/// A one-line label for picking a report from a menu.
pub fn label(school: &School, report: &Report) -> String {
    let row = Row::new(school, report);
    format!(
        "{} {} [{}] assigned to {}",
        row.id, row.kind, row.status, row.assigned_to
    )
}
