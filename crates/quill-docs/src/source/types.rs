use tree_sitter::Node;

use super::syntax::{child_of_kind, node_text};
use crate::model::TypeShape;

const KEYWORD_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "object", "string", "void", "nint", "nuint", "dynamic",
];

/// Classifies the written form of a C# type.
///
/// Tuples and pointers are kept verbatim as [`TypeShape::Other`]. Generic
/// instantiations over a dotted base become [`TypeShape::Qualified`] so the
/// phrase builder treats them as opaque names.
pub fn parse_type(text: &str) -> TypeShape {
    let written = squeeze(text);
    if written.is_empty() {
        return TypeShape::Other(written);
    }
    if KEYWORD_TYPES.contains(&written.as_str()) {
        return TypeShape::primitive(written);
    }

    let wrapped = format!("class __Type {{ {written} __value; }}");
    let Some(tree) = super::parse_tree(&wrapped) else {
        return TypeShape::Other(written);
    };

    find_kind(tree.root_node(), "variable_declaration")
        .and_then(|declaration| declaration.child_by_field_name("type"))
        .filter(|node| !node.has_error() && squeeze(node_text(*node, &wrapped)) == written)
        .map(|node| shape_of(node, &wrapped))
        .unwrap_or(TypeShape::Other(written))
}

/// Maps a type node onto its shape.
pub(crate) fn shape_of(node: Node<'_>, text: &str) -> TypeShape {
    let written = squeeze(node_text(node, text));
    if KEYWORD_TYPES.contains(&written.as_str()) {
        return TypeShape::primitive(written);
    }

    match node.kind() {
        "predefined_type" => TypeShape::primitive(written),
        "identifier" => TypeShape::named(written.trim_start_matches('@')),
        "generic_name" => {
            let base = node
                .child_by_field_name("name")
                .or_else(|| child_of_kind(node, "identifier"))
                .map(|name| node_text(name, text).trim_start_matches('@').to_string());
            let Some(base) = base else {
                return TypeShape::Other(written);
            };
            let args = child_of_kind(node, "type_argument_list")
                .map(|list| {
                    let mut cursor = list.walk();
                    list.named_children(&mut cursor)
                        .filter(|arg| arg.kind() != "comment")
                        .map(|arg| shape_of(arg, text))
                        .collect()
                })
                .unwrap_or_default();
            TypeShape::generic(base, args)
        }
        "qualified_name" | "alias_qualified_name" => TypeShape::Qualified(written),
        "array_type" => match element_of(node) {
            Some(element) => TypeShape::Array(Box::new(shape_of(element, text))),
            None => TypeShape::Other(written),
        },
        "nullable_type" => match element_of(node) {
            Some(inner) => TypeShape::Nullable(Box::new(shape_of(inner, text))),
            None => TypeShape::Other(written),
        },
        _ => TypeShape::Other(written),
    }
}

fn element_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("type").or_else(|| node.named_child(0))
}

fn find_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(|child| find_kind(child, kind))
}

/// Collapses whitespace runs so shapes compare by their written form.
fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
