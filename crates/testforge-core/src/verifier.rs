//! External test-runner execution.
//!
//! Tries an ordered list of candidate command lines. A candidate whose
//! executable cannot start advances the search; the first candidate that
//! starts is awaited to completion and decides the verdict. Running out of
//! candidates is a normal failure outcome, not an error.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fixed diagnostic when every candidate fails to start.
pub const NO_RUNNER_DIAGNOSTIC: &str =
    "no suitable runner available: tried jest, vitest, and npm test";

/// Placeholder in candidate command lines replaced by the test file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// True iff a runner started and exited with status zero.
    pub success: bool,

    /// Combined stdout and stderr of the runner, or the fixed
    /// no-runner diagnostic.
    pub diagnostics: String,
}

/// Seam for test execution so the orchestrator is testable with fakes.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Run the suite at `test_file` with `project_root` as working
    /// directory.
    async fn run(&self, test_file: &Path, project_root: &Path) -> VerifyReport;
}

/// Runner that walks the ordered candidate command list.
pub struct CandidateRunner {
    candidates: Vec<Vec<String>>,
}

impl CandidateRunner {
    pub fn new() -> Self {
        Self {
            candidates: vec![
                vec!["npx".into(), "jest".into(), FILE_PLACEHOLDER.into()],
                vec![
                    "npx".into(),
                    "vitest".into(),
                    "run".into(),
                    FILE_PLACEHOLDER.into(),
                ],
                vec!["npm".into(), "test".into()],
            ],
        }
    }

    /// Replace the default candidate list (used by tests and embedders).
    pub fn with_candidates(candidates: Vec<Vec<String>>) -> Self {
        Self { candidates }
    }

    fn resolve(command: &[String], test_file: &Path) -> Vec<String> {
        command
            .iter()
            .map(|arg| {
                if arg == FILE_PLACEHOLDER {
                    test_file.to_string_lossy().to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }
}

impl Default for CandidateRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestRunner for CandidateRunner {
    async fn run(&self, test_file: &Path, project_root: &Path) -> VerifyReport {
        for candidate in &self.candidates {
            let argv = Self::resolve(candidate, test_file);
            let Some((exe, args)) = argv.split_first() else {
                continue;
            };

            let start = Instant::now();
            let spawned = Command::new(exe)
                .args(args)
                .current_dir(project_root)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn();

            let child = match spawned {
                Ok(child) => child,
                Err(err) => {
                    debug!(runner = %exe, error = %err, "candidate failed to start; trying next");
                    continue;
                }
            };

            // One live child at a time; wait synchronously for completion.
            let output = match child.wait_with_output().await {
                Ok(output) => output,
                Err(err) => {
                    warn!(runner = %exe, error = %err, "candidate died before producing output");
                    continue;
                }
            };

            let mut diagnostics = String::from_utf8_lossy(&output.stdout).to_string();
            diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));
            let success = output.status.success();

            info!(
                runner = %exe,
                success,
                duration_ms = start.elapsed().as_millis() as u64,
                "verification run completed"
            );

            return VerifyReport {
                success,
                diagnostics,
            };
        }

        VerifyReport {
            success: false,
            diagnostics: NO_RUNNER_DIAGNOSTIC.to_string(),
        }
    }
}
