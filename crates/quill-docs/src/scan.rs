//! Decides which declarations need a generated comment.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::comment::DocComment;
use crate::diagnostics::MissingDocumentation;
use crate::model::{Declaration, DeclarationKind};
use crate::source::SourceUnit;

/// Options that narrow which declarations are considered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    /// Only `const` fields are candidates; other fields are ignored.
    #[serde(default)]
    pub const_fields_only: bool,
}

impl ScanOptions {
    pub fn with_const_fields_only(mut self, const_fields_only: bool) -> Self {
        self.const_fields_only = const_fields_only;
        self
    }
}

/// Returns `true` when the declaration is visible enough and carries no summary or `<inheritdoc/>`.
///
/// The existing-comment check looks only for the presence of either element;
/// the comment's content is never judged. When the `///` lines do not parse
/// as a whole, a complete summary or `<inheritdoc/>` among them still counts,
/// so a block patched in after broken lines is seen on the next scan.
pub fn should_document(declaration: &Declaration, options: &ScanOptions) -> bool {
    if !is_visible(declaration, options) {
        return false;
    }

    match declaration.existing_comment() {
        Ok(Some(comment)) => !(comment.has_summary() || comment.has_inherit_doc()),
        Ok(None) => true,
        Err(_) if DocComment::recover_lines(&declaration.doc_comment_lines()).is_some() => {
            debug!(
                name = %declaration.name,
                line = declaration.line,
                "malformed documentation comment holds a complete summary"
            );
            false
        }
        Err(error) => {
            warn!(
                name = %declaration.name,
                kind = %declaration.kind,
                line = declaration.line,
                %error,
                "existing documentation comment is malformed, treating it as absent"
            );
            true
        }
    }
}

fn is_visible(declaration: &Declaration, options: &ScanOptions) -> bool {
    let container_exposes = declaration
        .container
        .as_ref()
        .is_none_or(|container| container.exposes_members());
    let in_interface = declaration
        .container
        .as_ref()
        .is_some_and(|container| container.kind == DeclarationKind::Interface);
    let member_public = declaration.visibility.is_public() || in_interface;

    match declaration.kind {
        DeclarationKind::Interface => true,
        DeclarationKind::Class | DeclarationKind::Enum => {
            declaration.visibility.is_public() && container_exposes
        }
        DeclarationKind::Field => {
            if options.const_fields_only && !declaration.modifiers.is_const {
                return false;
            }
            member_public && container_exposes
        }
        DeclarationKind::Constructor | DeclarationKind::Method | DeclarationKind::Property => {
            member_public && container_exposes
        }
    }
}

/// Reports every declaration in the unit that still needs documentation.
pub fn scan_unit(unit: &SourceUnit, options: &ScanOptions) -> Vec<MissingDocumentation> {
    let missing: Vec<MissingDocumentation> = unit
        .declarations
        .iter()
        .filter(|declaration| should_document(declaration, options))
        .map(MissingDocumentation::for_declaration)
        .collect();

    debug!(
        declarations = unit.declarations.len(),
        missing = missing.len(),
        "scanned source unit"
    );
    missing
}
