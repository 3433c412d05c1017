//! skylift-engine - The rule-driven call-rewriting core
//!
//! Takes a parsed program model, detects calls into the agnostic
//! `skylift` namespace, renders each against its rewrite rule, and
//! splices the rendered fragments back into the source text. The two
//! external collaborators (the Python parser probe and the syntax
//! validator) run as subprocesses behind trait seams.
//!
//! # Architecture
//!
//! ```text
//! skylift-engine/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── detect.rs    # Detector - agnostic-call resolution
//! ├── render.rs    # Renderer - rule lookup + template rendering
//! ├── splice.rs    # Rewriter - text surgery and outcome assembly
//! ├── exec.rs      # Subprocess runner with timeout
//! ├── parse.rs     # SourceParser trait + PythonParser collaborator
//! ├── validate.rs  # SyntaxValidator trait + PythonValidator
//! └── pipeline.rs  # Engine - single-pass orchestration
//! ```
//!
//! # Pipeline
//!
//! Parsed -> Detected -> Ruled -> Rendered -> Rewritten -> Validated,
//! single pass, fail-fast: the first error aborts the transformation and
//! nothing downstream runs.

mod detect;
mod exec;
mod parse;
mod pipeline;
mod render;
mod splice;
mod validate;

pub use detect::Detector;
pub use parse::{PythonParser, SourceParser};
pub use pipeline::{DEFAULT_NAMESPACE, Engine, EngineConfig};
pub use render::Renderer;
pub use splice::Rewriter;
pub use validate::{PythonValidator, SyntaxValidator};
