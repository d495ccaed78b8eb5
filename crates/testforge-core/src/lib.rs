//! testforge core library
//!
//! Analyzes React/TypeScript component sources, synthesizes Testing
//! Library suites for them, and drives a bounded verify/repair loop
//! against an external test runner.

pub mod analyzer;
pub mod domain;
pub mod orchestrator;
pub mod repairer;
pub mod synthesizer;
pub mod telemetry;
pub mod verifier;

pub use analyzer::{ParserBackend, SourceAnalyzer, TsxBackend};
pub use domain::{
    ComponentKind, ComponentModel, ImportRecord, PropSpec, Result, TestforgeError, TypeDescriptor,
};
pub use orchestrator::{
    resolve_output_path, LoopReport, LoopState, Orchestrator, Terminal, MAX_ITERATIONS,
};
pub use repairer::{classify, repair, AssertionFamily, FailureSignal};
pub use synthesizer::{component_module, default_attribute, default_value, generate, infer_role};
pub use telemetry::init_tracing;
pub use verifier::{CandidateRunner, TestRunner, VerifyReport, NO_RUNNER_DIAGNOSTIC};

/// testforge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
