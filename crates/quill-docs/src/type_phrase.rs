//! Translation of type shapes into English noun phrases.

use crate::error::{DocsError, Result};
use crate::model::TypeShape;
use crate::pluralize::pluralize;

/// Describes a type as a noun phrase with a leading article.
///
/// Container shapes (arrays and collection generics) supply their own lead
/// words instead of an article:
///
/// ```
/// use quill_docs::{describe, TypeShape};
///
/// let list = TypeShape::generic("List", vec![TypeShape::primitive("int")]);
/// assert_eq!(describe(&list).unwrap(), "A list of ints.");
/// assert_eq!(describe(&TypeShape::named("Widget")).unwrap(), "A Widget");
/// ```
pub fn describe(shape: &TypeShape) -> Result<String> {
    match shape {
        TypeShape::Primitive(text)
        | TypeShape::Named(text)
        | TypeShape::Qualified(text)
        | TypeShape::Other(text) => with_article(text, shape),
        TypeShape::Generic { base, args } => {
            if base.contains("ReadOnlyCollection") {
                Ok(format!(
                    "A read only collection of {}",
                    plural_bare_name(first_argument(shape, args)?)?
                ))
            } else if base == "IEnumerable" || base.contains("List") {
                Ok(format!(
                    "A list of {}",
                    plural_bare_name(first_argument(shape, args)?)?
                ))
            } else if base == "Task" {
                Ok(format!(
                    "A Task result of {}",
                    plural_bare_name(first_argument(shape, args)?)?
                ))
            } else {
                with_article(base, shape)
            }
        }
        TypeShape::Array(element) => Ok(format!("An array of {}", bare_name(element)?)),
        TypeShape::Nullable(_) => with_article(&shape.to_string(), shape),
    }
}

/// Returns the bare text used inside container phrases.
///
/// Keywords and simple names are returned as is, generic shapes contribute the
/// simple name of their base, and every other shape its source text.
pub fn bare_name(shape: &TypeShape) -> Result<String> {
    let text = match shape {
        TypeShape::Primitive(name) | TypeShape::Named(name) => name.clone(),
        TypeShape::Generic { base, .. } => base.rsplit('.').next().unwrap_or(base).to_string(),
        TypeShape::Qualified(_)
        | TypeShape::Array(_)
        | TypeShape::Nullable(_)
        | TypeShape::Other(_) => shape.to_string(),
    };

    if text.trim().is_empty() {
        return Err(DocsError::unsupported_shape(
            shape.to_string(),
            "no name text to describe",
        ));
    }
    Ok(text)
}

/// Pluralized bare name followed by a period, e.g. `ints.` or `Widgets.`.
pub fn plural_bare_name(shape: &TypeShape) -> Result<String> {
    Ok(format!("{}.", pluralize(&bare_name(shape)?)))
}

/// Picks `An` for words starting with a vowel, `A` otherwise.
pub fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}

fn with_article(text: &str, shape: &TypeShape) -> Result<String> {
    if text.trim().is_empty() {
        return Err(DocsError::unsupported_shape(
            shape.to_string(),
            "no name text to describe",
        ));
    }
    Ok(format!("{} {}", article(text), text))
}

fn first_argument<'a>(shape: &TypeShape, args: &'a [TypeShape]) -> Result<&'a TypeShape> {
    args.first().ok_or_else(|| {
        DocsError::unsupported_shape(shape.to_string(), "collection type without a type argument")
    })
}
