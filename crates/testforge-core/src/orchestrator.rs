//! The bounded generate/verify/repair loop.
//!
//! One run covers one component source file: analyze, synthesize, then at
//! most [`MAX_ITERATIONS`] rounds of persist, verify, classify, repair.
//! Every exit path is a terminal verdict; the loop cannot spin. The most
//! recent test source is always persisted, so even failed runs leave a
//! best-effort suite on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyzer::SourceAnalyzer;
use crate::domain::{Result, TestforgeError};
use crate::repairer::{classify, repair};
use crate::synthesizer::generate;
use crate::verifier::{CandidateRunner, TestRunner};

/// Iteration ceiling for one run.
pub const MAX_ITERATIONS: u32 = 5;

/// Terminal verdict of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terminal {
    /// A runner exited zero.
    Passed,
    /// The iteration ceiling was reached while still failing.
    Exhausted,
    /// A repair pass produced no textual change.
    Stalled,
}

/// Mutable state threaded through the loop.
#[derive(Debug, Clone)]
pub struct LoopState {
    pub iteration: u32,
    pub test_source: String,
    pub terminal: Option<Terminal>,
}

/// Summary artifact of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopReport {
    pub run_id: Uuid,
    pub terminal: Terminal,
    pub iterations: u32,
    pub test_path: PathBuf,
    /// SHA-256 of the persisted test source, for artifact verification.
    pub source_digest: String,
    pub last_diagnostics: String,
    pub finished_at: DateTime<Utc>,
}

/// Where the generated suite for a component lives: a `__tests__`
/// directory next to the component, named `<stem>.test.tsx`.
pub fn resolve_output_path(component_path: &Path) -> PathBuf {
    let parent = component_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = component_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Component".to_string());
    parent.join("__tests__").join(format!("{stem}.test.tsx"))
}

/// Drives the loop for one component at a time.
pub struct Orchestrator {
    analyzer: SourceAnalyzer,
    runner: Box<dyn TestRunner>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            analyzer: SourceAnalyzer::new(),
            runner: Box::new(CandidateRunner::new()),
        }
    }

    /// Swap the runner seam (used by tests and embedders).
    pub fn with_runner(runner: Box<dyn TestRunner>) -> Self {
        Self {
            analyzer: SourceAnalyzer::new(),
            runner,
        }
    }

    /// Run the full loop for the component at `component_path`, writing
    /// the suite to the conventional sibling `__tests__` directory.
    pub async fn run(&mut self, component_path: &Path, project_root: &Path) -> Result<LoopReport> {
        self.run_with_output(component_path, project_root, None).await
    }

    /// Run the full loop with an explicit output path override.
    pub async fn run_with_output(
        &mut self,
        component_path: &Path,
        project_root: &Path,
        output_path: Option<&Path>,
    ) -> Result<LoopReport> {
        let run_id = Uuid::new_v4();
        let source = read_component_source(component_path)?;
        let model = self.analyzer.analyze(&source, component_path);
        info!(
            %run_id,
            component = %model.name,
            props = model.props.len(),
            path = %component_path.display(),
            "analysis complete"
        );

        let test_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| resolve_output_path(component_path));
        if let Some(parent) = test_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut state = LoopState {
            iteration: 0,
            test_source: generate(&model),
            terminal: None,
        };
        let mut last_diagnostics = String::new();

        while state.terminal.is_none() && state.iteration < MAX_ITERATIONS {
            state.iteration += 1;
            std::fs::write(&test_path, &state.test_source)?;

            let report = self.runner.run(&test_path, project_root).await;
            last_diagnostics = report.diagnostics;

            if report.success {
                info!(%run_id, iteration = state.iteration, "suite passed");
                state.terminal = Some(Terminal::Passed);
                break;
            }

            let signals = classify(&last_diagnostics);
            debug!(%run_id, iteration = state.iteration, signals = signals.len(), "classified failure");

            let revised = repair(&state.test_source, &signals, &model);
            if revised == state.test_source {
                warn!(%run_id, iteration = state.iteration, "repair made no progress");
                state.terminal = Some(Terminal::Stalled);
            } else {
                state.test_source = revised;
            }
        }

        let terminal = state.terminal.unwrap_or(Terminal::Exhausted);
        // the latest source is kept on disk whatever the verdict
        std::fs::write(&test_path, &state.test_source)?;

        info!(%run_id, ?terminal, iterations = state.iteration, "run finished");
        Ok(LoopReport {
            run_id,
            terminal,
            iterations: state.iteration,
            test_path,
            source_digest: digest(&state.test_source),
            last_diagnostics,
            finished_at: Utc::now(),
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn read_component_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            TestforgeError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TestforgeError::Io(err)
        }
    })?;
    String::from_utf8(bytes).map_err(|_| TestforgeError::InvalidEncoding {
        path: path.to_path_buf(),
    })
}

fn digest(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::VerifyReport;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct AlwaysPass;

    #[async_trait]
    impl TestRunner for AlwaysPass {
        async fn run(&self, _test_file: &Path, _project_root: &Path) -> VerifyReport {
            VerifyReport {
                success: true,
                diagnostics: "Tests: 8 passed, 8 total".to_string(),
            }
        }
    }

    struct ScriptedRunner {
        outcomes: Mutex<VecDeque<VerifyReport>>,
    }

    impl ScriptedRunner {
        fn new(outcomes: Vec<VerifyReport>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl TestRunner for ScriptedRunner {
        async fn run(&self, _test_file: &Path, _project_root: &Path) -> VerifyReport {
            self.outcomes
                .lock()
                .expect("scripted outcomes")
                .pop_front()
                .unwrap_or(VerifyReport {
                    success: false,
                    diagnostics: "unscripted".to_string(),
                })
        }
    }

    fn failure(diagnostics: &str) -> VerifyReport {
        VerifyReport {
            success: false,
            diagnostics: diagnostics.to_string(),
        }
    }

    fn write_button_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("Button.tsx");
        std::fs::write(
            &path,
            "interface ButtonProps {\n\
             \x20 label: string;\n\
             \x20 onClick: (e: MouseEvent) => void;\n\
             \x20 disabled?: boolean;\n\
             \x20 count?: number;\n\
             }\n\n\
             export function Button({ label, onClick, disabled, count }: ButtonProps) {\n\
             \x20 return <button onClick={onClick}>{label}</button>;\n\
             }\n",
        )
        .expect("write fixture");
        path
    }

    #[test]
    fn test_output_path_is_sibling_tests_dir() {
        let path = resolve_output_path(Path::new("src/components/Button.tsx"));
        assert_eq!(
            path,
            PathBuf::from("src/components/__tests__/Button.test.tsx")
        );
    }

    #[test]
    fn test_output_path_without_parent_dir() {
        let path = resolve_output_path(Path::new("Button.tsx"));
        assert_eq!(path, PathBuf::from("__tests__/Button.test.tsx"));
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut orchestrator = Orchestrator::with_runner(Box::new(AlwaysPass));
        let result = orchestrator
            .run(&dir.path().join("Missing.tsx"), dir.path())
            .await;
        assert!(matches!(
            result,
            Err(TestforgeError::InputNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_encoding_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Binary.tsx");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).expect("write fixture");
        let mut orchestrator = Orchestrator::with_runner(Box::new(AlwaysPass));
        let result = orchestrator.run(&path, dir.path()).await;
        assert!(matches!(
            result,
            Err(TestforgeError::InvalidEncoding { .. })
        ));
    }

    #[tokio::test]
    async fn test_pass_on_first_iteration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = write_button_fixture(dir.path());
        let mut orchestrator = Orchestrator::with_runner(Box::new(AlwaysPass));
        let report = orchestrator.run(&component, dir.path()).await.expect("run");

        assert_eq!(report.terminal, Terminal::Passed);
        assert_eq!(report.iterations, 1);
        let persisted = std::fs::read_to_string(&report.test_path).expect("persisted suite");
        assert!(persisted.contains("describe('Button'"));
        assert_eq!(report.source_digest, digest(&persisted));
    }

    #[tokio::test]
    async fn test_unclassifiable_failure_stalls_with_suite_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = write_button_fixture(dir.path());
        let runner = ScriptedRunner::new(vec![failure("segmentation fault in runner harness")]);
        let mut orchestrator = Orchestrator::with_runner(Box::new(runner));
        let report = orchestrator.run(&component, dir.path()).await.expect("run");

        assert_eq!(report.terminal, Terminal::Stalled);
        assert_eq!(report.iterations, 1);
        assert!(report.test_path.exists());
        assert!(report.last_diagnostics.contains("segmentation fault"));
    }

    #[tokio::test]
    async fn test_repairable_failure_then_pass() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = write_button_fixture(dir.path());
        let runner = ScriptedRunner::new(vec![
            failure("expect(element.className).toContain('disabled')\nReceived: \"btn\""),
            VerifyReport {
                success: true,
                diagnostics: "Tests: 9 passed, 9 total".to_string(),
            },
        ]);
        let mut orchestrator = Orchestrator::with_runner(Box::new(runner));
        let report = orchestrator.run(&component, dir.path()).await.expect("run");

        assert_eq!(report.terminal, Terminal::Passed);
        assert_eq!(report.iterations, 2);
        let persisted = std::fs::read_to_string(&report.test_path).expect("persisted suite");
        assert!(persisted.contains("expect(element).toBeDisabled();"));
    }

    #[tokio::test]
    async fn test_exhaustion_at_the_iteration_ceiling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = write_button_fixture(dir.path());
        // five distinct failures, each repairable, none final
        let runner = ScriptedRunner::new(vec![
            failure("Unable to find an accessible element with the role \"button\""),
            failure("Unable to find an element with the text: Click me."),
            failure("expect(element.className).toContain('disabled')"),
            failure("export 'Button' (imported as 'Button') was not found in '../Button'"),
            failure("Warning: Failed prop type: The prop `count` is marked as required"),
        ]);
        let mut orchestrator = Orchestrator::with_runner(Box::new(runner));
        let report = orchestrator.run(&component, dir.path()).await.expect("run");

        assert_eq!(report.terminal, Terminal::Exhausted);
        assert_eq!(report.iterations, MAX_ITERATIONS);
        let persisted = std::fs::read_to_string(&report.test_path).expect("persisted suite");
        assert!(persisted.contains("screen.getByTestId('root')"));
        assert!(persisted.contains("import Button from '../Button';"));
        assert!(persisted.contains("count={0}"));
    }

    #[tokio::test]
    async fn test_explicit_output_path_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = write_button_fixture(dir.path());
        let custom = dir.path().join("generated").join("Button.spec.tsx");

        let mut orchestrator = Orchestrator::with_runner(Box::new(AlwaysPass));
        let report = orchestrator
            .run_with_output(&component, dir.path(), Some(&custom))
            .await
            .expect("run");

        assert_eq!(report.test_path, custom);
        assert!(custom.exists());
    }

    #[test]
    fn test_terminal_serde_is_screaming_case() {
        let json = serde_json::to_string(&Terminal::Exhausted).expect("serialize");
        assert_eq!(json, "\"EXHAUSTED\"");
    }
}
