use std::fmt;

use serde::{Deserialize, Serialize};

use crate::comment::DocComment;
use crate::error::Result;

/// Kind of a documentable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    Constructor,
    Method,
    Property,
    Field,
}

impl DeclarationKind {
    /// All kinds, in the order templates are registered.
    pub const ALL: [DeclarationKind; 7] = [
        DeclarationKind::Class,
        DeclarationKind::Interface,
        DeclarationKind::Enum,
        DeclarationKind::Constructor,
        DeclarationKind::Method,
        DeclarationKind::Property,
        DeclarationKind::Field,
    ];

    /// Returns `true` for kinds that own a member body (class-like containers).
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class | DeclarationKind::Interface | DeclarationKind::Enum
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Method => "method",
            DeclarationKind::Property => "property",
            DeclarationKind::Field => "field",
        };
        f.write_str(label)
    }
}

/// Declared accessibility of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
    Protected,
}

impl Visibility {
    /// Returns `true` for `public`.
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
        };
        f.write_str(label)
    }
}

/// Non-accessibility modifiers that influence scanning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// `const` field.
    pub is_const: bool,
    /// `static` member or type.
    pub is_static: bool,
    /// `readonly` field.
    pub is_readonly: bool,
    /// `abstract` member or type.
    pub is_abstract: bool,
}

/// The type that encloses a member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Kind of the enclosing type.
    pub kind: DeclarationKind,
    /// Simple name of the enclosing type.
    pub name: String,
    /// Effective visibility of the enclosing type.
    pub visibility: Visibility,
}

impl Container {
    /// Creates a container description.
    pub fn new(kind: DeclarationKind, name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            kind,
            name: name.into(),
            visibility,
        }
    }

    /// Interfaces expose every member, so they count as public containers.
    pub fn exposes_members(&self) -> bool {
        self.visibility.is_public() || self.kind == DeclarationKind::Interface
    }
}

/// Abstract description of a declaration's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "camelCase")]
pub enum TypeShape {
    /// Language keyword type such as `int`, `string` or `void`.
    Primitive(String),
    /// Simple identifier such as `Widget`.
    Named(String),
    /// Dotted name such as `System.IO.Stream`.
    Qualified(String),
    /// Generic instantiation such as `List<int>`.
    Generic {
        /// Generic type name without arguments.
        base: String,
        /// Type arguments in declaration order.
        args: Vec<TypeShape>,
    },
    /// Single or multi-dimensional array of an element type.
    Array(Box<TypeShape>),
    /// Nullable value type such as `bool?`.
    Nullable(Box<TypeShape>),
    /// Any other syntax (tuples, pointers), kept as raw text.
    Other(String),
}

impl TypeShape {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeShape::Primitive(name.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeShape::Named(name.into())
    }

    pub fn generic(base: impl Into<String>, args: Vec<TypeShape>) -> Self {
        TypeShape::Generic {
            base: base.into(),
            args,
        }
    }

    /// Returns `true` for `bool`, `bool?` and `System.Boolean`.
    pub fn is_boolean(&self) -> bool {
        match self {
            TypeShape::Primitive(name) => name == "bool",
            TypeShape::Named(name) => name == "Boolean",
            TypeShape::Qualified(name) => name == "System.Boolean",
            TypeShape::Nullable(inner) => inner.is_boolean(),
            _ => false,
        }
    }

    /// Returns `true` for `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeShape::Primitive(name) if name == "void")
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Primitive(text)
            | TypeShape::Named(text)
            | TypeShape::Qualified(text)
            | TypeShape::Other(text) => f.write_str(text),
            TypeShape::Generic { base, args } => {
                write!(f, "{base}<")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeShape::Array(element) => write!(f, "{element}[]"),
            TypeShape::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as written.
    pub name: String,
    /// Declared type.
    pub type_shape: TypeShape,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            type_shape,
        }
    }
}

/// Accessor facts for a property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// Declared property type.
    pub type_shape: TypeShape,
    /// Whether a `set` accessor exists without a `private` or `internal` restriction.
    pub has_setter: bool,
}

/// One element of the text that precedes a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trivia {
    /// Horizontal whitespace.
    Whitespace(String),
    /// A line break (`\n` or `\r\n`).
    EndOfLine(String),
    /// A `//` or `/* */` comment.
    Comment(String),
    /// A single `///` documentation line, without its line break.
    DocComment(String),
}

impl Trivia {
    /// Returns the exact source text of this trivia element.
    pub fn as_str(&self) -> &str {
        match self {
            Trivia::Whitespace(text)
            | Trivia::EndOfLine(text)
            | Trivia::Comment(text)
            | Trivia::DocComment(text) => text,
        }
    }
}

/// Byte offsets of a declaration inside its source unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Start of the leading trivia region.
    pub leading_start: usize,
    /// First byte of the declaration itself (attributes included).
    pub start: usize,
    /// One past the last byte of the declaration.
    pub end: usize,
}

/// A declaration as seen by the synthesis engine.
///
/// Values are read-only inputs: patching produces a new [`crate::PatchedDeclaration`]
/// and never changes the declaration it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration kind.
    pub kind: DeclarationKind,
    /// Identifier name (the type name for constructors).
    pub name: String,
    /// Declared or implied accessibility.
    pub visibility: Visibility,
    /// Additional modifiers.
    pub modifiers: Modifiers,
    /// Enclosing type, if the declaration is a member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    /// Parameters of methods and constructors.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    /// Return type of methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeShape>,
    /// Accessor facts of properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyInfo>,
    /// Declared type of fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<TypeShape>,
    /// Trivia between the previous token and the declaration.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub leading_trivia: Vec<Trivia>,
    /// Full source text of the declaration.
    pub source_text: String,
    /// Whitespace that precedes the declaration on its own line.
    pub indent: String,
    /// Location inside the source unit, when the declaration came from one.
    #[serde(default)]
    pub span: TextSpan,
    /// 1-based line of the declaration's first token.
    #[serde(default)]
    pub line: usize,
    /// 1-based column of the declaration's first token.
    #[serde(default)]
    pub column: usize,
}

impl Declaration {
    /// Creates a public declaration with no members, trivia or source text.
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            visibility: Visibility::Public,
            modifiers: Modifiers::default(),
            container: None,
            parameters: Vec::new(),
            return_type: None,
            property: None,
            field_type: None,
            leading_trivia: Vec::new(),
            source_text: String::new(),
            indent: String::new(),
            span: TextSpan::default(),
            line: 0,
            column: 0,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_type(mut self, return_type: TypeShape) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_property(mut self, type_shape: TypeShape, has_setter: bool) -> Self {
        self.property = Some(PropertyInfo {
            type_shape,
            has_setter,
        });
        self
    }

    pub fn with_field_type(mut self, type_shape: TypeShape) -> Self {
        self.field_type = Some(type_shape);
        self
    }

    pub fn with_leading_trivia(mut self, trivia: Vec<Trivia>) -> Self {
        self.leading_trivia = trivia;
        self
    }

    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Returns the `///` lines found in the leading trivia, in source order.
    pub fn doc_comment_lines(&self) -> Vec<&str> {
        self.leading_trivia
            .iter()
            .filter_map(|trivia| match trivia {
                Trivia::DocComment(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Parses the existing documentation comment, if any.
    ///
    /// Returns [`crate::DocsError::MalformedComment`] when `///` lines are present
    /// but cannot be read as XML documentation.
    pub fn existing_comment(&self) -> Result<Option<DocComment>> {
        let lines = self.doc_comment_lines();
        if lines.is_empty() {
            return Ok(None);
        }
        DocComment::parse_lines(&lines).map(Some)
    }

    /// Returns `true` for methods whose return type is neither absent nor `void`.
    pub fn returns_value(&self) -> bool {
        self.return_type
            .as_ref()
            .is_some_and(|shape| !shape.is_void())
    }

    /// Name of the type a constructor belongs to.
    pub fn owner_name(&self) -> &str {
        match (&self.kind, &self.container) {
            (DeclarationKind::Constructor, Some(container)) => &container.name,
            _ => &self.name,
        }
    }
}
