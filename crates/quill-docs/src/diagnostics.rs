//! Missing-documentation diagnostics.

use serde::{Deserialize, Serialize};

use crate::model::{Declaration, DeclarationKind};

/// Category shared by every documentation diagnostic.
pub const CATEGORY: &str = "DocumentationComment";

impl DeclarationKind {
    /// Stable diagnostic identifier for a missing header on this kind.
    pub fn diagnostic_id(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "ClassDocumentationHeader",
            DeclarationKind::Interface => "InterfaceDocumentationHeader",
            DeclarationKind::Enum => "EnumDocumentationHeader",
            DeclarationKind::Constructor => "ConstructorDocumentationHeader",
            DeclarationKind::Method => "MethodDocumentationHeader",
            DeclarationKind::Property => "PropertyDocumentationHeader",
            DeclarationKind::Field => "ConstFieldDocumentationHeader",
        }
    }

    /// Title of the fix that adds a header.
    pub fn fix_title(&self) -> String {
        format!("Add documentation header to this {self}")
    }
}

/// A declaration that should have a documentation header but does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDocumentation {
    /// Diagnostic identifier, e.g. `MethodDocumentationHeader`.
    pub id: String,
    /// Diagnostic category.
    pub category: String,
    /// Kind of the undocumented declaration.
    pub kind: DeclarationKind,
    /// Declaration name.
    pub name: String,
    /// 1-based line of the declaration.
    pub line: usize,
    /// 1-based column of the declaration.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
}

impl MissingDocumentation {
    /// Builds the diagnostic for a declaration.
    pub fn for_declaration(declaration: &Declaration) -> Self {
        let label = match declaration.kind {
            DeclarationKind::Field if declaration.modifiers.is_const => "const field".to_string(),
            kind => kind.to_string(),
        };

        Self {
            id: declaration.kind.diagnostic_id().to_string(),
            category: CATEGORY.to_string(),
            kind: declaration.kind,
            name: declaration.name.clone(),
            line: declaration.line,
            column: declaration.column,
            message: format!("This {label} should have a documentation header."),
        }
    }
}
