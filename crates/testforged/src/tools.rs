//! The tool catalog and dispatcher.
//!
//! Three tools are exposed over the wire. An unknown tool name maps to
//! method-not-found; resource-resolution problems (missing file, bad
//! encoding) map to invalid-params; anything else that goes wrong while
//! handling a well-formed call is an internal fault. A failed repair
//! loop is none of those: the run completed, so its outcome is reported
//! inside a success-shaped result.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::info;

use testforge_core::{
    CandidateRunner, Orchestrator, SourceAnalyzer, Terminal, TestRunner, TestforgeError,
};

/// How a tool call failed, for mapping onto wire error codes.
#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    InvalidParams(String),
    Internal(String),
}

/// Builds one runner per generate call; the loop owns its runner.
pub type RunnerFactory = Box<dyn Fn() -> Box<dyn TestRunner> + Send + Sync>;

pub struct ToolContext {
    project_root: PathBuf,
    runner_factory: RunnerFactory,
}

impl ToolContext {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_runner_factory(project_root, Box::new(|| Box::new(CandidateRunner::new())))
    }

    /// Swap the runner behind generate calls (tests and embedders).
    pub fn with_runner_factory(
        project_root: impl Into<PathBuf>,
        runner_factory: RunnerFactory,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            runner_factory,
        }
    }

    /// Effective project root for one call: the `project_root` argument
    /// when present, else the service-wide default.
    fn effective_root(&self, arguments: &Value) -> PathBuf {
        arguments
            .get("project_root")
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.project_root.clone())
    }
}

/// Relative paths in arguments resolve against the project root.
fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// The `tools/list` result.
pub fn catalog() -> Value {
    json!({
        "tools": [
            {
                "name": "generate_component_tests",
                "description": "Generate a test suite for a React component and run the verify/repair loop until it passes, stalls, or exhausts its iteration budget",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "component_path": {
                            "type": "string",
                            "description": "Path to the component source file, relative to the project root"
                        },
                        "project_root": {
                            "type": "string",
                            "description": "Project root for this call; defaults to the service-wide root"
                        },
                        "output_path": {
                            "type": "string",
                            "description": "Where to write the suite; defaults to __tests__/<name>.test.tsx next to the component"
                        }
                    },
                    "required": ["component_path"]
                }
            },
            {
                "name": "analyze_component",
                "description": "Analyze a React component source file and return its structural model",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "component_path": {
                            "type": "string",
                            "description": "Path to the component source file, relative to the project root"
                        },
                        "project_root": {
                            "type": "string",
                            "description": "Project root for this call; defaults to the service-wide root"
                        }
                    },
                    "required": ["component_path"]
                }
            },
            {
                "name": "read_component",
                "description": "Read a component source file as UTF-8 text",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "component_path": {
                            "type": "string",
                            "description": "Path to the component source file, relative to the project root"
                        },
                        "project_root": {
                            "type": "string",
                            "description": "Project root for this call; defaults to the service-wide root"
                        }
                    },
                    "required": ["component_path"]
                }
            }
        ]
    })
}

/// Handle one `tools/call`.
pub async fn dispatch(ctx: &ToolContext, name: &str, arguments: &Value) -> Result<Value, ToolError> {
    match name {
        "generate_component_tests" => generate_component_tests(ctx, arguments).await,
        "analyze_component" => analyze_component(ctx, arguments),
        "read_component" => read_component(ctx, arguments),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn required_path(root: &Path, arguments: &Value) -> Result<PathBuf, ToolError> {
    arguments
        .get("component_path")
        .and_then(Value::as_str)
        .map(|p| resolve(root, p))
        .ok_or_else(|| ToolError::InvalidParams("component_path is required".to_string()))
}

fn map_domain_error(err: TestforgeError) -> ToolError {
    match err {
        TestforgeError::InputNotFound { .. } | TestforgeError::InvalidEncoding { .. } => {
            ToolError::InvalidParams(err.to_string())
        }
        other => ToolError::Internal(other.to_string()),
    }
}

async fn generate_component_tests(
    ctx: &ToolContext,
    arguments: &Value,
) -> Result<Value, ToolError> {
    let root = ctx.effective_root(arguments);
    let component = required_path(&root, arguments)?;
    let output_path = arguments
        .get("output_path")
        .and_then(Value::as_str)
        .map(|p| resolve(&root, p));
    info!(component = %component.display(), "generate_component_tests");

    let mut orchestrator = Orchestrator::with_runner((ctx.runner_factory)());
    let report = orchestrator
        .run_with_output(&component, &root, output_path.as_deref())
        .await
        .map_err(map_domain_error)?;

    // the loop always leaves its latest suite on disk; surface it even
    // when the verdict is not PASSED
    let test_source = std::fs::read_to_string(&report.test_path)
        .map_err(|err| ToolError::Internal(err.to_string()))?;

    let summary = match report.terminal {
        Terminal::Passed => format!(
            "suite passed after {} iteration(s); written to {}",
            report.iterations,
            report.test_path.display()
        ),
        Terminal::Exhausted => format!(
            "iteration budget exhausted after {} iteration(s); best-effort suite written to {}",
            report.iterations,
            report.test_path.display()
        ),
        Terminal::Stalled => format!(
            "repair stalled after {} iteration(s); best-effort suite written to {}\nlast diagnostics:\n{}",
            report.iterations,
            report.test_path.display(),
            report.last_diagnostics
        ),
    };

    let report_value =
        serde_json::to_value(&report).map_err(|err| ToolError::Internal(err.to_string()))?;

    Ok(json!({
        "content": [
            { "type": "text", "text": summary },
            { "type": "text", "text": test_source }
        ],
        "report": report_value
    }))
}

fn analyze_component(ctx: &ToolContext, arguments: &Value) -> Result<Value, ToolError> {
    let component = required_path(&ctx.effective_root(arguments), arguments)?;
    let source = read_source(&component)?;

    let model = SourceAnalyzer::new().analyze(&source, &component);
    let model_value =
        serde_json::to_value(&model).map_err(|err| ToolError::Internal(err.to_string()))?;

    Ok(json!({
        "content": [
            { "type": "text", "text": format!("analyzed {} ({} props)", model.name, model.props.len()) }
        ],
        "model": model_value
    }))
}

fn read_component(ctx: &ToolContext, arguments: &Value) -> Result<Value, ToolError> {
    let component = required_path(&ctx.effective_root(arguments), arguments)?;
    let source = read_source(&component)?;
    Ok(json!({
        "content": [ { "type": "text", "text": source } ]
    }))
}

fn read_source(path: &Path) -> Result<String, ToolError> {
    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ToolError::InvalidParams(format!("component source not found: {}", path.display()))
        } else {
            ToolError::Internal(err.to_string())
        }
    })?;
    String::from_utf8(bytes).map_err(|_| {
        ToolError::InvalidParams(format!(
            "component source is not valid UTF-8: {}",
            path.display()
        ))
    })
}
