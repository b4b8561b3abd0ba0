#![deny(clippy::all)]

//! Documentation comment synthesis for C# declarations.
//!
//! This crate provides:
//! - A declaration model with a closed [`TypeShape`] sum type.
//! - A deterministic heuristic generator (tokenizer, pluralizer, type phrases,
//!   one template strategy per declaration kind).
//! - A scan-and-patch workflow that finds undocumented declarations and splices
//!   `///` XML documentation blocks into their leading trivia.
//! - A tree-sitter based C# declaration scanner and source rewriter.
//! - An optional LLM path backed by Ollama, with a sliding-expiry response cache.
//! - A [`Documentor`] that ties the pieces together for whole source files.

pub mod comment;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod patch;
pub mod pluralize;
pub mod scan;
pub mod source;
pub mod template;
pub mod tokenize;
pub mod type_phrase;

#[cfg(feature = "llm")]
pub mod llm;

pub use comment::{DocComment, DocSegment};
pub use diagnostics::MissingDocumentation;
pub use error::{DocsError, Result};
pub use model::{
    Container, Declaration, DeclarationKind, Modifiers, Parameter, PropertyInfo, TextSpan,
    Trivia, TypeShape, Visibility,
};
pub use orchestrator::{
    Documented, Documentor, DocumentorOptions, GenerationSource, Outcome, OutcomeStatus,
    UnitReport,
};
pub use patch::{patch, PatchedDeclaration};
pub use scan::{scan_unit, should_document, ScanOptions};
pub use source::SourceUnit;
pub use template::{CommentTemplate, TemplateRegistry};
pub use type_phrase::describe;

#[cfg(feature = "llm")]
pub use llm::{LlmCommentGenerator, LlmConfig, LlmTarget, ResponseCache, TextGenerator};
