use colored::Colorize;
use serde::Serialize;

use std::fs::File;
use std::io;
use std::path::Path;

use crate::bugs::KnownBug;
use crate::cases::Outcome;

const NAME_WIDTH: usize = 50;

#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    name: &'a str,
    outcome: &'static str,
    bug: String,
    detail: &'a str,
}

impl<'a> From<&'a CaseReport> for ReportRow<'a> {
    fn from(report: &'a CaseReport) -> Self {
        let (outcome, bug, detail) = match &report.outcome {
            Outcome::Passed => ("PASS", String::new(), ""),
            Outcome::KnownBug { bug, detail } => ("XFAIL", bug.to_string(), detail.as_str()),
            Outcome::Failed(detail) => ("FAIL", String::new(), detail.as_str()),
        };
        ReportRow {
            name: &report.name,
            outcome,
            bug,
            detail,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub known_bugs: usize,
    pub failed: usize,
}

pub fn summarize(reports: &[CaseReport]) -> Summary {
    let mut summary = Summary::default();
    for report in reports {
        match report.outcome {
            Outcome::Passed => summary.passed += 1,
            Outcome::KnownBug { .. } => summary.known_bugs += 1,
            Outcome::Failed(_) => summary.failed += 1,
        }
    }
    summary
}

pub fn print_report(reports: &[CaseReport]) {
    let header = format!(
        "{:<width$} {:<7} {}",
        "Case",
        "Outcome",
        "Detail",
        width = NAME_WIDTH
    );

    println!("{}", header);
    println!("{}", "=".repeat(header.len()));
    for report in reports {
        let row = ReportRow::from(report);
        let detail = if row.bug.is_empty() {
            row.detail.to_string()
        } else {
            format!("Known bug {}: {}", row.bug, row.detail)
        };
        let line = format!(
            "{:<width$} {:<7} {}",
            row.name,
            row.outcome,
            detail,
            width = NAME_WIDTH
        );
        let line = match report.outcome {
            Outcome::Passed => line.green(),
            Outcome::KnownBug { .. } => line.yellow(),
            Outcome::Failed(_) => line.red(),
        };
        println!("{}", line);
    }
    println!("{}", "=".repeat(header.len()));

    let mut seen: Vec<KnownBug> = vec![];
    for report in reports {
        if let Outcome::KnownBug { bug, .. } = report.outcome {
            if !seen.contains(&bug) {
                seen.push(bug);
            }
        }
    }
    for bug in seen {
        println!("{} {}", bug.to_string().yellow(), bug.description());
    }

    let summary = summarize(reports);
    println!(
        "{} passed, {} known bugs, {} failed",
        summary.passed, summary.known_bugs, summary.failed
    );
}

pub fn write_csv(
    path: impl AsRef<Path>,
    reports: &[CaseReport],
) -> Result<(), Box<dyn std::error::Error>> {
    write_csv_to(File::create(path)?, reports)
}

pub fn write_csv_to<W: io::Write>(
    output: W,
    reports: &[CaseReport],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(output);
    for report in reports {
        writer.serialize(ReportRow::from(report))?;
    }
    writer.flush()?;
    Ok(())
}
