//! User interface module - rendering workflow results for humans.
//!
//! - `formatter` - Formatting and printing primitives
//! - This module - Presentation of a whole workflow report

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction,
    display_proposed_tag, display_rules, display_status, display_success,
};

use crate::cli::{WorkflowOutcome, WorkflowReport};

/// Print warnings, then what the run did.
///
/// # Arguments
/// * `report` - Result of the release workflow
/// * `remote` - Remote the tag was (or would be) pushed to
pub fn display_report(report: &WorkflowReport, remote: &str) {
    for warning in &report.warnings {
        display_boundary_warning(warning);
    }

    match &report.outcome {
        WorkflowOutcome::Skipped { branch } => {
            display_status(&format!("No release for branch '{}'", branch));
        }
        WorkflowOutcome::DryRun { record } => {
            display_proposed_tag(record.previous_tag.as_deref(), &record.tag);
            display_status("Dry run:");
            display_success(&format!(
                "  Would create tag {} on {}",
                record.tag,
                record.short_commit()
            ));
            display_success(&format!("  Would push {} to {}", record.tag, remote));
        }
        WorkflowOutcome::Released { record, pushed } => {
            display_proposed_tag(record.previous_tag.as_deref(), &record.tag);
            if *pushed {
                display_success(&format!("Published {} to {}", record.title(), remote));
            } else {
                display_success(&format!("Created tag {} locally", record.tag));
                display_manual_push_instruction(&record.tag, remote);
            }
        }
    }
}
