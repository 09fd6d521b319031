//! `fieldkit save` - run a submission through the save pipeline.

use std::path::Path;

use anyhow::{Context as _, Result};
use fieldkit::{Registry, SavePipeline, SaveReport, Submission};
use fieldkit_config::FieldkitConfig;

use crate::project::{load_document, open_router, read_input, resource_context, warn_if_ephemeral};
use crate::table::{new_table, truncate_str};
use crate::{EXIT_ERROR, EXIT_INVALID, EXIT_OK};

/// Save `input` for `resource`. Returns [`EXIT_ERROR`] when the backend
/// refused a field and [`EXIT_INVALID`] when any field failed validation; the
/// remaining fields are stored regardless.
pub fn run_save(
    config: &FieldkitConfig,
    path: &Path,
    resource: &str,
    id: Option<&str>,
    input: &str,
    json: bool,
) -> Result<i32> {
    let document = load_document(path)?;
    let (kind, decl) = document.resource(resource)?;
    let context = resource_context(kind, decl, id)?;
    let submission: Submission = serde_json::from_str(&read_input(input)?)
        .context("--input must be a JSON object of field values")?;

    warn_if_ephemeral(config);
    let registry = Registry::new();
    let mut router = open_router(config);
    let report = SavePipeline::new(&registry).save(&decl.fields, &submission, &context, &mut router)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(exit_code(&report))
}

fn exit_code(report: &SaveReport) -> i32 {
    if !report.failed.is_empty() {
        EXIT_ERROR
    } else if !report.errors.is_empty() {
        EXIT_INVALID
    } else {
        EXIT_OK
    }
}

fn print_report(report: &SaveReport) {
    let mut table = new_table(["Key", "Status", "Message"]);
    for key in &report.saved {
        table.add_row(vec![key.as_str(), "saved", ""]);
    }
    for name in &report.skipped {
        table.add_row(vec![name.as_str(), "skipped", ""]);
    }
    for error in &report.errors {
        let message = truncate_str(&error.message, 80);
        table.add_row(vec![error.key.as_str(), "invalid", message.as_str()]);
    }
    for failure in &report.failed {
        let message = truncate_str(&failure.message, 80);
        table.add_row(vec![failure.key.as_str(), "failed", message.as_str()]);
    }
    println!("{table}");
}
