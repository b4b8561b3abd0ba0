//! Per-declaration and per-file documentation runs.
//!
//! [`Documentor::document`] decides whether a declaration needs a comment,
//! builds one with the heuristic templates or the LLM path, and patches it in.
//! [`Documentor::document_unit`] does the same for every declaration of a
//! [`SourceUnit`] concurrently and rewrites the file text.

#[cfg(feature = "llm")]
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::comment::DocComment;
use crate::error::Result;
use crate::model::{Declaration, DeclarationKind};
use crate::patch::{patch, PatchedDeclaration};
use crate::scan::{should_document, ScanOptions};
use crate::source::SourceUnit;
use crate::template::TemplateRegistry;

#[cfg(feature = "llm")]
use crate::llm::{LlmComment, LlmCommentGenerator, LlmTarget};

/// Options for a [`Documentor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentorOptions {
    /// Kinds sent to the LLM path when one is attached. Only classes and methods are supported.
    #[serde(default = "default_llm_kinds")]
    pub llm_kinds: Vec<DeclarationKind>,

    /// Use the heuristic template when the LLM path fails.
    #[serde(default)]
    pub fallback_to_heuristic: bool,

    #[serde(default)]
    pub scan: ScanOptions,

    /// Maximum number of declarations generated at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for DocumentorOptions {
    fn default() -> Self {
        Self {
            llm_kinds: default_llm_kinds(),
            fallback_to_heuristic: false,
            scan: ScanOptions::default(),
            concurrency: default_concurrency(),
        }
    }
}

impl DocumentorOptions {
    pub fn with_scan(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_fallback(mut self, fallback_to_heuristic: bool) -> Self {
        self.fallback_to_heuristic = fallback_to_heuristic;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

fn default_llm_kinds() -> Vec<DeclarationKind> {
    vec![DeclarationKind::Class, DeclarationKind::Method]
}

fn default_concurrency() -> usize {
    4
}

/// Where a comment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationSource {
    Heuristic,
    Llm,
    /// LLM path, answered from the response cache.
    Cache,
}

/// A declaration that received a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Documented {
    pub patched: PatchedDeclaration,
    pub source: GenerationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeStatus {
    Documented,
    Skipped,
    Failed,
}

/// What happened to one declaration of a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub kind: DeclarationKind,
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<GenerationSource>,
    /// Failure message for [`OutcomeStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    fn new(declaration: &Declaration, status: OutcomeStatus) -> Self {
        Self {
            kind: declaration.kind,
            name: declaration.name.clone(),
            line: declaration.line,
            column: declaration.column,
            status,
            source: None,
            error: None,
        }
    }
}

/// Result of documenting a whole source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    /// One outcome per declaration, in source order.
    pub outcomes: Vec<Outcome>,
    /// Source text with every generated comment applied.
    #[serde(skip)]
    pub text: String,
    pub documented: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl UnitReport {
    /// Returns `true` when at least one comment was inserted.
    pub fn changed(&self) -> bool {
        self.documented > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Failed)
    }
}

/// Scans, synthesizes and patches documentation comments.
pub struct Documentor {
    options: DocumentorOptions,
    templates: TemplateRegistry,
    #[cfg(feature = "llm")]
    llm: Option<Arc<LlmCommentGenerator>>,
}

impl Documentor {
    /// Creates a documentor that uses the heuristic templates for every kind.
    pub fn new(options: DocumentorOptions) -> Self {
        Self {
            options,
            templates: TemplateRegistry::default(),
            #[cfg(feature = "llm")]
            llm: None,
        }
    }

    /// Replaces the template registry.
    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Sends the configured LLM kinds to `generator`.
    #[cfg(feature = "llm")]
    pub fn with_llm(mut self, generator: Arc<LlmCommentGenerator>) -> Self {
        self.llm = Some(generator);
        self
    }

    pub fn options(&self) -> &DocumentorOptions {
        &self.options
    }

    /// Documents one declaration.
    ///
    /// Returns `Ok(None)` when the declaration is not a candidate. The input is
    /// never modified; the returned [`PatchedDeclaration`] carries the new trivia.
    pub async fn document(&self, declaration: &Declaration) -> Result<Option<Documented>> {
        if !should_document(declaration, &self.options.scan) {
            return Ok(None);
        }

        let (comment, source) = self.synthesize(declaration).await?;
        let patched = patch(declaration, &comment)?;

        debug!(
            name = %declaration.name,
            kind = %declaration.kind,
            ?source,
            "documented declaration"
        );
        Ok(Some(Documented { patched, source }))
    }

    async fn synthesize(&self, declaration: &Declaration) -> Result<(DocComment, GenerationSource)> {
        #[cfg(feature = "llm")]
        if let Some((generator, target)) = self.llm_route(declaration) {
            match generator
                .generate_comment(target, &declaration.source_text)
                .await
            {
                Ok(LlmComment { comment, cache_hit }) => {
                    let source = if cache_hit {
                        GenerationSource::Cache
                    } else {
                        GenerationSource::Llm
                    };
                    return Ok((comment, source));
                }
                Err(error) if self.options.fallback_to_heuristic => {
                    warn!(
                        name = %declaration.name,
                        %error,
                        "LLM generation failed, using heuristic template"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        let comment = self.templates.build(declaration)?;
        Ok((comment, GenerationSource::Heuristic))
    }

    #[cfg(feature = "llm")]
    fn llm_route(&self, declaration: &Declaration) -> Option<(&LlmCommentGenerator, LlmTarget)> {
        let generator = self.llm.as_deref()?;
        if !self.options.llm_kinds.contains(&declaration.kind) {
            return None;
        }
        LlmTarget::for_kind(declaration.kind).map(|target| (generator, target))
    }

    /// Documents every declaration of a source unit.
    ///
    /// Declarations are processed concurrently, bounded by
    /// [`DocumentorOptions::concurrency`]. A failure is recorded in its
    /// outcome and leaves that declaration untouched; the rest of the unit is
    /// still documented.
    pub async fn document_unit(&self, unit: &SourceUnit) -> UnitReport {
        let mut results: Vec<(usize, Result<Option<Documented>>)> =
            stream::iter(unit.declarations.iter().enumerate())
                .map(|(index, declaration)| async move { (index, self.document(declaration).await) })
                .buffer_unordered(self.options.concurrency.max(1))
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut outcomes = Vec::with_capacity(results.len());
        let mut patches = Vec::new();

        for (index, result) in results {
            let declaration = &unit.declarations[index];
            let outcome = match result {
                Ok(Some(documented)) => {
                    let mut outcome = Outcome::new(declaration, OutcomeStatus::Documented);
                    outcome.source = Some(documented.source);
                    patches.push(documented.patched);
                    outcome
                }
                Ok(None) => Outcome::new(declaration, OutcomeStatus::Skipped),
                Err(error) => {
                    warn!(
                        name = %declaration.name,
                        kind = %declaration.kind,
                        line = declaration.line,
                        %error,
                        "failed to document declaration"
                    );
                    let mut outcome = Outcome::new(declaration, OutcomeStatus::Failed);
                    outcome.error = Some(error.to_string());
                    outcome
                }
            };
            outcomes.push(outcome);
        }

        let count = |status: OutcomeStatus| outcomes.iter().filter(|o| o.status == status).count();
        let (documented, skipped, failed) = (
            count(OutcomeStatus::Documented),
            count(OutcomeStatus::Skipped),
            count(OutcomeStatus::Failed),
        );
        info!(documented, skipped, failed, "documented source unit");

        UnitReport {
            text: unit.apply(&patches),
            outcomes,
            documented,
            skipped,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocsError;
    use crate::model::{Container, Parameter, TypeShape, Visibility};
    use crate::template::CommentTemplate;

    fn host() -> Container {
        Container::new(DeclarationKind::Class, "MethodTester", Visibility::Public)
    }

    struct Failing;

    impl CommentTemplate for Failing {
        fn kind(&self) -> DeclarationKind {
            DeclarationKind::Method
        }

        fn build(&self, declaration: &Declaration) -> Result<DocComment> {
            Err(DocsError::unsupported_shape(&declaration.name, "test failure"))
        }
    }

    #[tokio::test]
    async fn heuristic_path_patches_candidates() {
        let documentor = Documentor::new(DocumentorOptions::default());
        let method = Declaration::new(DeclarationKind::Method, "ShowMethodWithParameterTester")
            .with_container(host())
            .with_parameters(vec![
                Parameter::new("param1", TypeShape::primitive("string")),
                Parameter::new("param3", TypeShape::primitive("bool")),
            ])
            .with_return_type(TypeShape::primitive("void"))
            .with_indent("\t\t")
            .with_source_text("public void ShowMethodWithParameterTester(string param1, bool param3) { }");

        let documented = documentor
            .document(&method)
            .await
            .unwrap()
            .expect("public method is a candidate");
        assert_eq!(documented.source, GenerationSource::Heuristic);
        assert_eq!(
            documented.patched.comment.render_lines(),
            vec![
                "/// <summary>",
                "/// Shows the method with parameter tester.",
                "/// </summary>",
                "/// <param name=\"param1\">The param1.</param>",
                "/// <param name=\"param3\">If true, param3.</param>",
            ]
        );
    }

    #[tokio::test]
    async fn non_candidates_are_skipped() {
        let documentor = Documentor::new(DocumentorOptions::default());
        let private = Declaration::new(DeclarationKind::Method, "Run")
            .with_visibility(Visibility::Private)
            .with_container(host());
        assert!(documentor.document(&private).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_unit() {
        let mut templates = TemplateRegistry::default();
        templates.register(Box::new(Failing));
        let documentor = Documentor::new(DocumentorOptions::default()).with_templates(templates);

        let unit = SourceUnit::parse(
            "public class Widget\n{\n    public void Spin() { }\n\n    public int Size { get; set; }\n}\n",
        );
        let report = documentor.document_unit(&unit).await;

        assert_eq!((report.documented, report.failed, report.skipped), (2, 1, 0));
        let failure = report.failures().next().expect("one failure");
        assert_eq!(failure.name, "Spin");
        assert!(failure.error.as_deref().is_some_and(|e| e.contains("test failure")));

        assert!(report.text.contains("    /// Gets or sets the size.\n"));
        assert!(report.text.contains("{\n    public void Spin() { }"));
    }
}
