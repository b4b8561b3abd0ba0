//! Heuristic comment templates, one strategy per declaration kind.
//!
//! The phrase functions ([`common_summary`], [`method_summary`], ...) are the
//! building blocks; the [`CommentTemplate`] implementations assemble them into
//! a full [`DocComment`] for a [`Declaration`].

use std::collections::HashMap;

use crate::comment::DocComment;
use crate::error::{DocsError, Result};
use crate::model::{Declaration, DeclarationKind, TypeShape, Visibility};
use crate::pluralize::pluralize;
use crate::tokenize::{split, to_lowercase};
use crate::type_phrase::describe;

/// Summary for classes, enums and fields: `The {words}.`
pub fn common_summary(name: &str) -> String {
    sentence("The", &to_lowercase(&split(name), false))
}

/// Summary for interfaces; a leading `I` prefix is dropped.
pub fn interface_summary(name: &str) -> String {
    let mut fragments = to_lowercase(&split(name), true);
    if fragments.first().is_some_and(|first| first == "I") {
        fragments.remove(0);
    }
    sentence("The", &to_lowercase(&fragments, false))
}

/// Summary for constructors, cross-referencing the owning type.
pub fn constructor_summary(type_name: &str, is_private: bool) -> String {
    if is_private {
        format!(
            "Prevents a new instance of the <see cref=\"{type_name}\"/> class from being created."
        )
    } else {
        format!("Initializes a new instance of the <see cref=\"{type_name}\"/> class.")
    }
}

/// Summary for properties: `Gets[ or sets] ...`.
pub fn property_summary(name: &str, is_boolean: bool, has_setter: bool) -> String {
    let mut summary = String::from("Gets");
    if has_setter {
        summary.push_str(" or sets");
    }

    if is_boolean {
        summary.push_str(&boolean_clause(name));
    } else {
        let words = to_lowercase(&split(name), false);
        if !words.is_empty() {
            summary.push_str(" the ");
            summary.push_str(&words.join(" "));
        }
    }

    summary.push('.');
    summary
}

/// ` a value indicating whether {words}` with `is` moved before the final word.
fn boolean_clause(name: &str) -> String {
    let mut words = to_lowercase(&split(name), false);
    if let Some(position) = words.iter().position(|word| word == "is") {
        let is = words.remove(position);
        let before_last = words.len().saturating_sub(1);
        words.insert(before_last, is);
    }
    format!(" a value indicating whether {}", words.join(" "))
}

/// Summary for methods: the first word becomes third person, followed by `the`.
pub fn method_summary(name: &str) -> String {
    let mut fragments = to_lowercase(&split(name), true);
    let Some(first) = fragments.first_mut() else {
        return String::new();
    };
    *first = pluralize(first);
    fragments.insert(1, "the".to_string());
    format!("{}.", fragments.join(" "))
}

/// Description of a method or constructor parameter.
pub fn parameter_phrase(name: &str, type_shape: &TypeShape) -> String {
    let words = to_lowercase(&split(name), false);
    if type_shape.is_boolean() {
        format!("If true, {}.", words.join(" "))
    } else {
        sentence("The", &words)
    }
}

/// Description of a return value, or `None` for `void`.
pub fn returns_phrase(return_type: &TypeShape) -> Result<Option<String>> {
    if return_type.is_void() {
        return Ok(None);
    }
    let phrase = describe(return_type)?;
    Ok(Some(terminate(phrase)))
}

fn sentence(lead: &str, words: &[String]) -> String {
    if words.is_empty() {
        format!("{lead}.")
    } else {
        format!("{lead} {}.", words.join(" "))
    }
}

/// Ends a phrase with exactly one period.
fn terminate(phrase: String) -> String {
    let trimmed = phrase.trim_end().trim_end_matches('.');
    format!("{trimmed}.")
}

/// Strategy that builds a comment for one declaration kind.
pub trait CommentTemplate: Send + Sync {
    /// Kind this template handles.
    fn kind(&self) -> DeclarationKind;

    /// Builds the comment for a declaration of [`Self::kind`].
    fn build(&self, declaration: &Declaration) -> Result<DocComment>;
}

pub struct ClassTemplate;

impl CommentTemplate for ClassTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Class
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        Ok(DocComment::summary(common_summary(&declaration.name)))
    }
}

pub struct EnumTemplate;

impl CommentTemplate for EnumTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Enum
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        Ok(DocComment::summary(common_summary(&declaration.name)))
    }
}

pub struct FieldTemplate;

impl CommentTemplate for FieldTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Field
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        Ok(DocComment::summary(common_summary(&declaration.name)))
    }
}

pub struct InterfaceTemplate;

impl CommentTemplate for InterfaceTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Interface
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        Ok(DocComment::summary(interface_summary(&declaration.name)))
    }
}

pub struct ConstructorTemplate;

impl CommentTemplate for ConstructorTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Constructor
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        let is_private = declaration.visibility == Visibility::Private;
        let mut comment =
            DocComment::summary(constructor_summary(declaration.owner_name(), is_private));
        for param in &declaration.parameters {
            comment = comment.with_param(&param.name, parameter_phrase(&param.name, &param.type_shape));
        }
        Ok(comment)
    }
}

pub struct PropertyTemplate;

impl CommentTemplate for PropertyTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Property
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        let (is_boolean, has_setter) = declaration
            .property
            .as_ref()
            .map(|info| (info.type_shape.is_boolean(), info.has_setter))
            .unwrap_or((false, false));
        Ok(DocComment::summary(property_summary(
            &declaration.name,
            is_boolean,
            has_setter,
        )))
    }
}

pub struct MethodTemplate;

impl CommentTemplate for MethodTemplate {
    fn kind(&self) -> DeclarationKind {
        DeclarationKind::Method
    }

    fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        let mut comment = DocComment::summary(method_summary(&declaration.name));
        for param in &declaration.parameters {
            comment = comment.with_param(&param.name, parameter_phrase(&param.name, &param.type_shape));
        }
        if let Some(return_type) = &declaration.return_type {
            if let Some(returns) = returns_phrase(return_type)? {
                comment = comment.with_returns(returns);
            }
        }
        Ok(comment)
    }
}

/// Dispatches declarations to the template registered for their kind.
pub struct TemplateRegistry {
    templates: HashMap<DeclarationKind, Box<dyn CommentTemplate>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        let mut registry = Self {
            templates: HashMap::new(),
        };
        registry.register(Box::new(ClassTemplate));
        registry.register(Box::new(InterfaceTemplate));
        registry.register(Box::new(EnumTemplate));
        registry.register(Box::new(ConstructorTemplate));
        registry.register(Box::new(MethodTemplate));
        registry.register(Box::new(PropertyTemplate));
        registry.register(Box::new(FieldTemplate));
        registry
    }
}

impl TemplateRegistry {
    /// Creates a registry with the built-in template for every kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous one for the same kind.
    pub fn register(&mut self, template: Box<dyn CommentTemplate>) {
        self.templates.insert(template.kind(), template);
    }

    /// Builds and validates a comment for the declaration.
    pub fn build(&self, declaration: &Declaration) -> Result<DocComment> {
        let template = self.templates.get(&declaration.kind).ok_or_else(|| DocsError::Other {
            message: format!("no template registered for {}", declaration.kind),
        })?;
        let comment = template.build(declaration)?;
        comment.validate()?;
        Ok(comment)
    }
}
