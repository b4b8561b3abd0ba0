//! Structured documentation comments and their `///` XML rendering.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::model::Declaration;

/// Marker that starts every documentation line.
pub const DOC_MARKER: &str = "///";

/// One element of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "camelCase")]
pub enum DocSegment {
    /// `<summary>` text, possibly spanning several lines.
    Summary { text: String },
    /// `<param name="..">` description.
    Param { name: String, text: String },
    /// `<returns>` description.
    Returns { text: String },
    /// `<inheritdoc/>` marker.
    InheritDoc,
    /// Any other element (`<remarks>`, `<exception>`, ...) or loose text, kept line by line.
    Verbatim { lines: Vec<String> },
}

/// Ordered documentation segments, independent of indentation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    /// Segments in render order.
    pub segments: Vec<DocSegment>,
}

impl DocComment {
    /// Creates an empty comment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a comment holding only a summary.
    pub fn summary(text: impl Into<String>) -> Self {
        Self {
            segments: vec![DocSegment::Summary { text: text.into() }],
        }
    }

    /// Creates a comment holding only an `<inheritdoc/>` marker.
    pub fn inherit_doc() -> Self {
        Self {
            segments: vec![DocSegment::InheritDoc],
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.segments.push(DocSegment::Param {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    pub fn with_returns(mut self, text: impl Into<String>) -> Self {
        self.segments.push(DocSegment::Returns { text: text.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_summary(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, DocSegment::Summary { .. }))
    }

    pub fn has_inherit_doc(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, DocSegment::InheritDoc))
    }

    /// Summary text, if present.
    pub fn summary_text(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            DocSegment::Summary { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns text, if present.
    pub fn returns_text(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            DocSegment::Returns { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Parameter names and texts in order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments.iter().filter_map(|segment| match segment {
            DocSegment::Param { name, text } => Some((name.as_str(), text.as_str())),
            _ => None,
        })
    }

    /// Checks that the comment is well formed.
    ///
    /// A comment is well formed when it is non-empty, holds at most one summary
    /// or one `<inheritdoc/>` (never both), at most one returns element, uniquely
    /// named parameters, and no text that would close its own element early.
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(DocsError::malformed("comment has no segments"));
        }

        let mut summaries = 0;
        let mut inherit_docs = 0;
        let mut returns = 0;
        let mut param_names = HashSet::new();

        for segment in &self.segments {
            match segment {
                DocSegment::Summary { text } => {
                    summaries += 1;
                    ensure_text_fits("summary", text)?;
                }
                DocSegment::Param { name, text } => {
                    if name.trim().is_empty() {
                        return Err(DocsError::malformed("parameter without a name"));
                    }
                    if name.contains('"') {
                        return Err(DocsError::malformed(format!(
                            "parameter name '{name}' contains a quote"
                        )));
                    }
                    if !param_names.insert(name.as_str()) {
                        return Err(DocsError::malformed(format!(
                            "parameter '{name}' is documented twice"
                        )));
                    }
                    ensure_text_fits("param", text)?;
                }
                DocSegment::Returns { text } => {
                    returns += 1;
                    ensure_text_fits("returns", text)?;
                }
                DocSegment::InheritDoc => inherit_docs += 1,
                DocSegment::Verbatim { .. } => {}
            }
        }

        if summaries > 1 {
            return Err(DocsError::malformed("more than one summary"));
        }
        if inherit_docs > 1 {
            return Err(DocsError::malformed("more than one inheritdoc marker"));
        }
        if summaries == 1 && inherit_docs == 1 {
            return Err(DocsError::malformed("summary and inheritdoc are exclusive"));
        }
        if returns > 1 {
            return Err(DocsError::malformed("more than one returns element"));
        }

        Ok(())
    }

    /// Checks that the comment is well formed and documents its declaration,
    /// through a summary or an `<inheritdoc/>` marker.
    pub fn validate_insertable(&self) -> Result<()> {
        self.validate()?;
        if !(self.has_summary() || self.has_inherit_doc()) {
            return Err(DocsError::malformed(
                "comment needs a summary or an inheritdoc marker",
            ));
        }
        Ok(())
    }

    /// Returns `true` when params and returns line up with the declaration's signature.
    pub fn conforms_to(&self, declaration: &Declaration) -> bool {
        let documented: Vec<&str> = self.params().map(|(name, _)| name).collect();
        let declared: Vec<&str> = declaration
            .parameters
            .iter()
            .map(|param| param.name.as_str())
            .collect();

        documented == declared && (self.returns_text().is_some() == declaration.returns_value())
    }

    /// Renders the comment as unindented `///` lines.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for segment in &self.segments {
            match segment {
                DocSegment::Summary { text } => {
                    lines.push(doc_line("<summary>"));
                    lines.extend(text.lines().map(doc_line));
                    lines.push(doc_line("</summary>"));
                }
                DocSegment::Param { name, text } => {
                    let element = format!("<param name=\"{name}\">{text}</param>");
                    lines.extend(element.lines().map(doc_line));
                }
                DocSegment::Returns { text } => {
                    let element = format!("<returns>{text}</returns>");
                    lines.extend(element.lines().map(doc_line));
                }
                DocSegment::InheritDoc => lines.push(doc_line("<inheritdoc/>")),
                DocSegment::Verbatim { lines: raw } => {
                    lines.extend(raw.iter().map(|line| doc_line(line)));
                }
            }
        }

        lines
    }

    /// Renders the comment with every line after the first prefixed by `indent`.
    ///
    /// The first line is left bare so the block can be placed where the
    /// declaration's own indentation already sits. No trailing newline is added.
    pub fn render(&self, indent: &str) -> String {
        self.render_lines().join(&format!("\n{indent}"))
    }

    /// Parses a block of `///` lines (indentation allowed) into segments.
    pub fn parse(block: &str) -> Result<Self> {
        let lines: Vec<&str> = block.lines().filter(|line| !line.trim().is_empty()).collect();
        Self::parse_lines(&lines)
    }

    /// Parses individual `///` lines into segments.
    pub fn parse_lines(lines: &[&str]) -> Result<Self> {
        let mut body = Vec::with_capacity(lines.len());
        for line in lines {
            let trimmed = line.trim_start();
            let Some(rest) = trimmed.strip_prefix(DOC_MARKER) else {
                return Err(DocsError::malformed(format!(
                    "line is not a documentation line: {trimmed}"
                )));
            };
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            body.push(rest.trim_end());
        }

        XmlDocParser::new(&body.join("\n")).parse()
    }

    /// Finds the last well-formed `<summary>` or `<inheritdoc/>` element in
    /// lines that do not parse as a whole.
    ///
    /// A summary is read from its opening line through the first line that
    /// closes it. Returns `None` when no such element parses on its own.
    pub fn recover_lines(lines: &[&str]) -> Option<Self> {
        (0..lines.len()).rev().find_map(|start| {
            let line = lines[start];
            let end = if line.contains("<summary") {
                start + lines[start..].iter().position(|l| l.contains("</summary>"))?
            } else if line.contains("<inheritdoc") {
                start
            } else {
                return None;
            };

            Self::parse_lines(&lines[start..=end])
                .ok()
                .filter(|comment| comment.has_summary() || comment.has_inherit_doc())
        })
    }
}

impl fmt::Display for DocComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_lines().join("\n"))
    }
}

fn doc_line(content: &str) -> String {
    if content.is_empty() {
        DOC_MARKER.to_string()
    } else {
        format!("{DOC_MARKER} {content}")
    }
}

fn ensure_text_fits(tag: &str, text: &str) -> Result<()> {
    if text.contains(&format!("</{tag}>")) {
        return Err(DocsError::malformed(format!(
            "{tag} text closes its own element"
        )));
    }
    Ok(())
}

/// Minimal reader for the XML subset used in documentation comments.
struct XmlDocParser<'a> {
    body: &'a str,
    pos: usize,
}

impl<'a> XmlDocParser<'a> {
    fn new(body: &'a str) -> Self {
        Self { body, pos: 0 }
    }

    fn parse(mut self) -> Result<DocComment> {
        let mut comment = DocComment::new();

        loop {
            self.skip_whitespace();
            let body = self.body;
            let rest = &body[self.pos..];
            if rest.is_empty() {
                break;
            }

            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                comment.segments.push(verbatim(&rest[..end]));
                self.pos += end;
                continue;
            }

            if rest.starts_with("<!--") {
                let end = rest
                    .find("-->")
                    .ok_or_else(|| DocsError::malformed("unterminated XML comment"))?
                    + 3;
                comment.segments.push(verbatim(&rest[..end]));
                self.pos += end;
                continue;
            }

            comment.segments.push(self.element()?);
        }

        Ok(comment)
    }

    fn element(&mut self) -> Result<DocSegment> {
        let body = self.body;
        let start = self.pos;
        let rest = &body[start..];
        let tag_end = rest
            .find('>')
            .ok_or_else(|| DocsError::malformed("unterminated start tag"))?;
        let tag = &rest[1..tag_end];

        if tag.starts_with('/') {
            return Err(DocsError::malformed(format!("unexpected closing tag <{tag}>")));
        }

        let self_closing = tag.ends_with('/');
        let name: String = tag
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if name.is_empty() {
            return Err(DocsError::malformed("element without a name"));
        }

        let content_start = start + tag_end + 1;

        if self_closing {
            self.pos = content_start;
            return Ok(match name.as_str() {
                "inheritdoc" => DocSegment::InheritDoc,
                _ => verbatim(&body[start..content_start]),
            });
        }

        let (content_end, after) = find_closing(body, content_start, &name)
            .ok_or_else(|| DocsError::malformed(format!("element <{name}> is never closed")))?;
        self.pos = after;

        let content = &body[content_start..content_end];
        Ok(match name.as_str() {
            "summary" => DocSegment::Summary {
                text: normalize_text(content),
            },
            "returns" => DocSegment::Returns {
                text: normalize_text(content),
            },
            "param" => DocSegment::Param {
                name: attribute(tag, "name").ok_or_else(|| {
                    DocsError::malformed("param element without a name attribute")
                })?,
                text: normalize_text(content),
            },
            "inheritdoc" => DocSegment::InheritDoc,
            _ => verbatim(&body[start..after]),
        })
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.body[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}

/// Finds the matching `</name>` for an element opened before `from`, honouring nesting.
/// Returns the offset where the closing tag starts and the offset just past it.
fn find_closing(body: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut depth = 1usize;
    let mut cursor = from;

    while cursor < body.len() {
        let rest = &body[cursor..];
        let next_close = rest.find(&close)?;
        let next_open = rest.find(&open).filter(|&index| {
            index < next_close && opens_same_element(&rest[index + open.len()..])
        });

        match next_open {
            Some(index) => {
                let tag_end = rest[index..].find('>')?;
                if !rest[index..index + tag_end].ends_with('/') {
                    depth += 1;
                }
                cursor += index + tag_end + 1;
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some((cursor + next_close, cursor + next_close + close.len()));
                }
                cursor += next_close + close.len();
            }
        }
    }

    None
}

fn opens_same_element(after_name: &str) -> bool {
    after_name
        .chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}

/// Reads a quoted attribute value from a start tag.
fn attribute(tag: &str, key: &str) -> Option<String> {
    let mut search = tag;
    while let Some(index) = search.find(key) {
        let preceded_by_space = search[..index]
            .chars()
            .last()
            .is_some_and(char::is_whitespace);
        let after = search[index + key.len()..].trim_start();
        if preceded_by_space {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
                let inner = &value[1..];
                let end = inner.find(quote)?;
                return Some(inner[..end].to_string());
            }
        }
        search = &search[index + key.len()..];
    }
    None
}

fn normalize_text(content: &str) -> String {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn verbatim(raw: &str) -> DocSegment {
    DocSegment::Verbatim {
        lines: raw.trim().lines().map(|line| line.trim_end().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclarationKind, Parameter, TypeShape};

    #[test]
    fn renders_summary_params_and_returns() {
        let comment = DocComment::summary("Shows the method with parameter tester.")
            .with_param("param1", "The param1.")
            .with_param("param3", "If true, param3.")
            .with_returns("A MethodTester.");

        assert_eq!(
            comment.render_lines(),
            vec![
                "/// <summary>",
                "/// Shows the method with parameter tester.",
                "/// </summary>",
                "/// <param name=\"param1\">The param1.</param>",
                "/// <param name=\"param3\">If true, param3.</param>",
                "/// <returns>A MethodTester.</returns>",
            ]
        );
    }

    #[test]
    fn render_indents_every_line_after_the_first() {
        let comment = DocComment::summary("The widget.");
        assert_eq!(
            comment.render("    "),
            "/// <summary>\n    /// The widget.\n    /// </summary>"
        );
    }

    #[test]
    fn parses_rendered_output_back() {
        let comment = DocComment::summary("Gets the name.").with_param("value", "The value.");
        let parsed = DocComment::parse(&comment.to_string()).expect("rendered comment parses");
        assert_eq!(parsed, comment);
    }

    #[test]
    fn parses_indented_multiline_elements() {
        let parsed = DocComment::parse_lines(&[
            "        /// <summary>",
            "        /// Loads the widget",
            "        /// from <see cref=\"Storage\"/>.",
            "        /// </summary>",
            "        /// <remarks>Cached.</remarks>",
            "        /// <param name='id'>",
            "        /// The id.",
            "        /// </param>",
        ])
        .expect("valid comment");

        assert_eq!(
            parsed.summary_text(),
            Some("Loads the widget\nfrom <see cref=\"Storage\"/>.")
        );
        assert_eq!(parsed.params().collect::<Vec<_>>(), vec![("id", "The id.")]);
        assert!(parsed
            .segments
            .contains(&DocSegment::Verbatim {
                lines: vec!["<remarks>Cached.</remarks>".to_string()]
            }));
    }

    #[test]
    fn recognises_inheritdoc_forms() {
        assert!(DocComment::parse("/// <inheritdoc/>").unwrap().has_inherit_doc());
        assert!(DocComment::parse("/// <inheritdoc cref=\"IWidget\" />")
            .unwrap()
            .has_inherit_doc());
        assert!(DocComment::parse("/// <inheritdoc></inheritdoc>")
            .unwrap()
            .has_inherit_doc());
    }

    #[test]
    fn nested_same_name_elements_close_correctly() {
        let parsed = DocComment::parse(
            "/// <para>One<para>Two</para></para>\n/// <summary>S</summary>",
        )
        .expect("valid comment");
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.summary_text(), Some("S"));
    }

    #[test]
    fn rejects_unclosed_and_stray_closing_tags() {
        assert!(matches!(
            DocComment::parse("/// <summary>\n/// never closed"),
            Err(DocsError::MalformedComment { .. })
        ));
        assert!(matches!(
            DocComment::parse("/// </summary>"),
            Err(DocsError::MalformedComment { .. })
        ));
        assert!(matches!(
            DocComment::parse_lines(&["// not a doc line"]),
            Err(DocsError::MalformedComment { .. })
        ));
    }

    #[test]
    fn loose_text_is_kept_verbatim() {
        let parsed = DocComment::parse("/// Just some words").expect("loose text is allowed");
        assert!(!parsed.has_summary());
        assert_eq!(parsed.segments.len(), 1);
    }

    #[test]
    fn validate_enforces_segment_invariants() {
        assert!(DocComment::summary("The widget.").validate().is_ok());
        assert!(DocComment::new().validate().is_err());

        let mut both = DocComment::summary("A.");
        both.segments.push(DocSegment::InheritDoc);
        assert!(both.validate().is_err());

        let duplicated = DocComment::summary("A.")
            .with_param("x", "The x.")
            .with_param("x", "The x.");
        assert!(duplicated.validate().is_err());

        let twice = DocComment::summary("A.").with_returns("B.").with_returns("C.");
        assert!(twice.validate().is_err());

        let closes_early = DocComment::summary("oops </summary> here");
        assert!(closes_early.validate().is_err());
    }

    #[test]
    fn recovery_finds_the_last_complete_element() {
        let unclosed_then_patched = [
            "/// <summary>",
            "/// never closed",
            "/// <summary>",
            "/// Runs the.",
            "/// </summary>",
        ];
        assert!(DocComment::parse_lines(&unclosed_then_patched).is_err());
        let recovered = DocComment::recover_lines(&unclosed_then_patched).expect("recovered");
        assert_eq!(recovered.summary_text(), Some("Runs the."));

        let stray_close = ["/// </summary>", "/// <inheritdoc/>"];
        assert!(DocComment::recover_lines(&stray_close).is_some_and(|c| c.has_inherit_doc()));

        assert!(DocComment::recover_lines(&["/// <summary>", "/// never closed"]).is_none());
        assert!(DocComment::recover_lines(&["/// </summary>"]).is_none());
    }

    #[test]
    fn insertable_comments_document_their_declaration() {
        assert!(DocComment::summary("The widget.").validate_insertable().is_ok());
        assert!(DocComment::inherit_doc().validate_insertable().is_ok());

        let params_only = DocComment::new().with_param("x", "The x.");
        assert!(params_only.validate().is_ok());
        assert!(matches!(
            params_only.validate_insertable(),
            Err(DocsError::MalformedComment { .. })
        ));
    }

    #[test]
    fn conformance_checks_params_and_returns() {
        let method = Declaration::new(DeclarationKind::Method, "Show")
            .with_parameters(vec![Parameter::new("count", TypeShape::primitive("int"))])
            .with_return_type(TypeShape::primitive("int"));

        let good = DocComment::summary("Shows the.")
            .with_param("count", "The count.")
            .with_returns("An int.");
        assert!(good.conforms_to(&method));

        let missing_returns = DocComment::summary("Shows the.").with_param("count", "The count.");
        assert!(!missing_returns.conforms_to(&method));
    }
}
