//! Machine-readable release outputs in `key=value` form, appended to a file
//! the way GitHub Actions reads `$GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::cli::{WorkflowOutcome, WorkflowReport};
use crate::error::Result;

/// Output pairs describing a workflow run
pub fn output_pairs(report: &WorkflowReport) -> Vec<(&'static str, String)> {
    let (released, pushed) = match &report.outcome {
        WorkflowOutcome::Skipped { .. } | WorkflowOutcome::DryRun { .. } => (false, false),
        WorkflowOutcome::Released { pushed, .. } => (true, *pushed),
    };

    let mut pairs = vec![("released", released.to_string())];

    match report.outcome.record() {
        Some(record) => {
            pairs.push(("tag", record.tag.clone()));
            pairs.push(("version", record.version.to_string()));
            pairs.push((
                "previous_tag",
                record.previous_tag.clone().unwrap_or_default(),
            ));
            pairs.push(("category", record.category.to_string()));
        }
        None => pairs.push(("category", "invalid".to_string())),
    }

    pairs.push(("pushed", pushed.to_string()));
    pairs
}

/// Append the run's outputs to `path`, creating the file if needed
pub fn append_outputs(path: &Path, report: &WorkflowReport) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    for (key, value) in output_pairs(report) {
        writeln!(file, "{}={}", key, value)?;
    }

    tracing::debug!(path = %path.display(), "wrote release outputs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ReleaseRecord, Version};

    fn released(pushed: bool) -> WorkflowReport {
        WorkflowReport {
            outcome: WorkflowOutcome::Released {
                record: ReleaseRecord {
                    tag: "v2.4.0".to_string(),
                    version: Version::new(2, 4, 0),
                    previous_tag: Some("v2.3.4".to_string()),
                    branch: "feature/x".to_string(),
                    category: Category::Feature,
                    pull_request: None,
                    commit: "abc".to_string(),
                },
                pushed,
            },
            warnings: Vec::new(),
            attempts: 1,
        }
    }

    #[test]
    fn test_released_outputs() {
        let pairs = output_pairs(&released(true));
        assert_eq!(
            pairs,
            vec![
                ("released", "true".to_string()),
                ("tag", "v2.4.0".to_string()),
                ("version", "2.4.0".to_string()),
                ("previous_tag", "v2.3.4".to_string()),
                ("category", "feature".to_string()),
                ("pushed", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_skipped_outputs() {
        let report = WorkflowReport {
            outcome: WorkflowOutcome::Skipped {
                branch: "docs/x".to_string(),
            },
            warnings: Vec::new(),
            attempts: 0,
        };
        let pairs = output_pairs(&report);
        assert_eq!(pairs[0], ("released", "false".to_string()));
        assert!(pairs.iter().all(|(key, _)| *key != "tag"));
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        append_outputs(&path, &released(false)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier=1\nreleased=true\n"));
        assert!(text.ends_with("pushed=false\n"));
    }
}
