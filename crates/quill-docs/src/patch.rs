//! Splicing rendered comments into a declaration's leading trivia.

use crate::comment::DocComment;
use crate::error::Result;
use crate::model::{Declaration, Trivia};

/// A declaration combined with a newly inserted documentation block.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchedDeclaration {
    /// Copy of the input declaration carrying the new leading trivia.
    pub declaration: Declaration,
    /// The comment that was inserted.
    pub comment: DocComment,
}

impl PatchedDeclaration {
    /// Source text of the new leading trivia.
    pub fn leading_text(&self) -> String {
        render_trivia(&self.declaration.leading_trivia)
    }

    /// Leading trivia followed by the untouched declaration text.
    pub fn render(&self) -> String {
        let mut text = self.leading_text();
        text.push_str(&self.declaration.source_text);
        text
    }
}

/// Concatenates trivia back into source text.
pub fn render_trivia(trivia: &[Trivia]) -> String {
    trivia.iter().map(Trivia::as_str).collect()
}

/// Inserts `comment` immediately before the declaration.
///
/// Existing trivia is kept as is. When the trivia ends in alignment whitespace,
/// that whitespace stays in front of the new block and is repeated after it so
/// the declaration keeps its column. Lines after the first are prefixed with
/// the declaration's indent.
pub fn patch(declaration: &Declaration, comment: &DocComment) -> Result<PatchedDeclaration> {
    comment.validate_insertable()?;

    let newline = declaration
        .leading_trivia
        .iter()
        .find_map(|trivia| match trivia {
            Trivia::EndOfLine(newline) => Some(newline.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "\n".to_string());

    let mut leading = declaration.leading_trivia.clone();
    let alignment = match leading.last() {
        Some(Trivia::Whitespace(whitespace)) => Some(whitespace.clone()),
        _ => None,
    };
    if alignment.is_some() {
        leading.pop();
    }
    let lead = alignment.unwrap_or_else(|| declaration.indent.clone());

    for (index, line) in comment.render_lines().into_iter().enumerate() {
        let prefix = if index == 0 { &lead } else { &declaration.indent };
        if !prefix.is_empty() {
            leading.push(Trivia::Whitespace(prefix.clone()));
        }
        leading.push(Trivia::DocComment(line));
        leading.push(Trivia::EndOfLine(newline.clone()));
    }
    if !lead.is_empty() {
        leading.push(Trivia::Whitespace(lead));
    }

    let mut patched = declaration.clone();
    patched.leading_trivia = leading;

    Ok(PatchedDeclaration {
        declaration: patched,
        comment: comment.clone(),
    })
}
