//! Mapping of C# syntax nodes onto [`Declaration`]s.
//!
//! Scopes (the compilation unit, namespace bodies and type bodies) are walked
//! child by child. The text between the previous child and a declaration is
//! its leading-trivia region; `comment` siblings and directive lines found
//! there become [`Trivia`].

use tree_sitter::Node;

use super::types::shape_of;
use crate::model::{
    Container, Declaration, DeclarationKind, Modifiers, Parameter, TextSpan, Trivia, TypeShape,
    Visibility,
};

/// Conditional-compilation blocks whose contents are walked as part of the enclosing scope.
const CONDITIONAL_BLOCKS: &[&str] = &["preproc_if", "preproc_elif", "preproc_else"];

/// Facts read from a type or member node.
#[derive(Debug)]
struct Signature {
    kind: DeclarationKind,
    name: String,
    visibility: Visibility,
    modifiers: Modifiers,
    parameters: Vec<Parameter>,
    /// Return type of methods, declared type of properties and fields.
    value_type: Option<TypeShape>,
}

/// Collects declarations from a syntax tree in source order.
pub(crate) struct Collector<'t> {
    text: &'t str,
    declarations: Vec<Declaration>,
}

impl<'t> Collector<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        Self {
            text,
            declarations: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<Declaration> {
        self.declarations
    }

    /// Walks the children of `scope`, starting the first leading region at `from`.
    pub(crate) fn scan_scope(&mut self, scope: Node<'t>, from: usize, container: Option<&Container>) {
        let mut cursor = scope.walk();
        let children: Vec<Node<'t>> = scope.children(&mut cursor).collect();
        let comments: Vec<Node<'t>> = children
            .iter()
            .copied()
            .filter(|child| child.kind() == "comment")
            .collect();

        let mut leading_start = from;
        for child in children {
            if is_trivia_node(child) {
                continue;
            }
            self.visit(child, leading_start, &comments, container);
            leading_start = leading_start.max(child.end_byte());
        }
    }

    fn visit(
        &mut self,
        node: Node<'t>,
        leading_start: usize,
        comments: &[Node<'t>],
        container: Option<&Container>,
    ) {
        match node.kind() {
            "namespace_declaration" => {
                if let Some(body) = body_of(node) {
                    self.scan_scope(body, body.start_byte(), None);
                }
            }
            // Newer grammars leave the members of a file-scoped namespace as
            // siblings; older ones nest them.
            "file_scoped_namespace_declaration" => self.scan_scope(node, node.start_byte(), None),
            kind if CONDITIONAL_BLOCKS.contains(&kind) => {
                self.scan_scope(node, node.start_byte(), container);
            }
            _ => {
                let Some(signature) = self.signature(node, container) else {
                    return;
                };
                let span = TextSpan {
                    leading_start,
                    start: node.start_byte(),
                    end: node.end_byte(),
                };
                let trivia = self.leading_trivia(leading_start, span.start, comments);

                if signature.kind.is_type() {
                    let effective = match container {
                        Some(parent) if !parent.exposes_members() => Visibility::Private,
                        _ => signature.visibility,
                    };
                    let nested = Container::new(signature.kind, signature.name.clone(), effective);
                    let recurse = signature.kind != DeclarationKind::Enum;
                    let declaration = self.declaration(signature, container, trivia, span);
                    self.declarations.push(declaration);

                    if recurse {
                        if let Some(body) = body_of(node) {
                            self.scan_scope(body, body.start_byte(), Some(&nested));
                        }
                    }
                } else {
                    let has_setter = signature.kind == DeclarationKind::Property
                        && accessible_setter(node, self.text);
                    let mut declaration = self.declaration(signature, container, trivia, span);
                    if let Some(property) = declaration.property.as_mut() {
                        property.has_setter = has_setter;
                    }
                    self.declarations.push(declaration);
                }
            }
        }
    }

    /// Reads a documentable node. `None` for everything the engine does not
    /// document: usings, operators, indexers, events, delegates and destructors.
    fn signature(&self, node: Node<'t>, container: Option<&Container>) -> Option<Signature> {
        let kind = match node.kind() {
            "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "record_struct_declaration" => DeclarationKind::Class,
            "interface_declaration" => DeclarationKind::Interface,
            "enum_declaration" => DeclarationKind::Enum,
            // Members only count inside a type.
            _ if container.is_none() => return None,
            "method_declaration" => DeclarationKind::Method,
            "constructor_declaration" => DeclarationKind::Constructor,
            "property_declaration" => DeclarationKind::Property,
            "field_declaration" => DeclarationKind::Field,
            _ => return None,
        };

        let (explicit, modifiers) = read_modifiers(node, self.text);
        let visibility = resolve_visibility(&explicit, container);

        let (name, value_type) = match kind {
            DeclarationKind::Field => {
                let declaration = child_of_kind(node, "variable_declaration")?;
                let declarator = child_of_kind(declaration, "variable_declarator")?;
                let name = declarator
                    .child_by_field_name("name")
                    .or_else(|| child_of_kind(declarator, "identifier"))?;
                let value_type = declaration
                    .child_by_field_name("type")
                    .map(|shape| shape_of(shape, self.text));
                (name, value_type)
            }
            DeclarationKind::Method => {
                let value_type = node
                    .child_by_field_name("returns")
                    .or_else(|| node.child_by_field_name("type"))
                    .map(|shape| shape_of(shape, self.text));
                (node.child_by_field_name("name")?, value_type)
            }
            DeclarationKind::Property => {
                let value_type = node
                    .child_by_field_name("type")
                    .map(|shape| shape_of(shape, self.text));
                (node.child_by_field_name("name")?, value_type)
            }
            _ => (node.child_by_field_name("name")?, None),
        };

        let name = node_text(name, self.text).trim_start_matches('@');
        if name.is_empty() {
            return None;
        }

        let parameters = match kind {
            DeclarationKind::Method | DeclarationKind::Constructor => node
                .child_by_field_name("parameters")
                .or_else(|| child_of_kind(node, "parameter_list"))
                .map(|list| read_parameters(list, self.text))
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        Some(Signature {
            kind,
            name: name.to_string(),
            visibility,
            modifiers,
            parameters,
            value_type,
        })
    }

    fn declaration(
        &self,
        signature: Signature,
        container: Option<&Container>,
        trivia: Vec<Trivia>,
        span: TextSpan,
    ) -> Declaration {
        let text = self.text;
        let line_start = text[..span.start].rfind('\n').map_or(0, |index| index + 1);
        let prefix = &text[line_start..span.start];
        let indent = if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        };

        let mut declaration = Declaration::new(signature.kind, signature.name)
            .with_visibility(signature.visibility)
            .with_modifiers(signature.modifiers)
            .with_parameters(signature.parameters)
            .with_leading_trivia(trivia)
            .with_source_text(text.get(span.start..span.end).unwrap_or_default().trim_end())
            .with_indent(indent);

        if let Some(container) = container {
            declaration = declaration.with_container(container.clone());
        }
        if let Some(value_type) = signature.value_type {
            declaration = match signature.kind {
                DeclarationKind::Method => declaration.with_return_type(value_type),
                DeclarationKind::Property => declaration.with_property(value_type, false),
                DeclarationKind::Field => declaration.with_field_type(value_type),
                _ => declaration,
            };
        }

        declaration.span = span;
        declaration.line = text[..span.start].matches('\n').count() + 1;
        declaration.column = prefix.chars().count() + 1;
        declaration
    }

    /// Splits `from..to` into whitespace, line breaks, comments and directive lines.
    fn leading_trivia(&self, from: usize, to: usize, comments: &[Node<'t>]) -> Vec<Trivia> {
        let text = self.text;
        let mut gap_comments = comments
            .iter()
            .filter(|comment| comment.start_byte() >= from && comment.end_byte() <= to)
            .peekable();
        let mut trivia = Vec::new();
        let mut cursor = from;

        while cursor < to {
            while gap_comments.next_if(|c| c.start_byte() < cursor).is_some() {}
            if let Some(comment) = gap_comments.next_if(|c| c.start_byte() == cursor) {
                let body = node_text(*comment, text).trim_end_matches(['\r', '\n']);
                trivia.push(comment_trivia(body));
                cursor += body.len().max(1);
                continue;
            }

            let rest = &text[cursor..to];
            let Some(c) = rest.chars().next() else {
                break;
            };
            match c {
                ' ' | '\t' | '\u{feff}' => {
                    let run: usize = rest
                        .chars()
                        .take_while(|c| matches!(c, ' ' | '\t' | '\u{feff}'))
                        .map(char::len_utf8)
                        .sum();
                    trivia.push(Trivia::Whitespace(rest[..run].to_string()));
                    cursor += run;
                }
                '\r' | '\n' => {
                    let width = if rest.starts_with("\r\n") { 2 } else { 1 };
                    trivia.push(Trivia::EndOfLine(rest[..width].to_string()));
                    cursor += width;
                }
                _ => {
                    let next_comment = gap_comments
                        .peek()
                        .map_or(to, |comment| comment.start_byte());
                    let line_end = rest.find(['\r', '\n']).map_or(to, |index| cursor + index);
                    let stop = line_end.min(next_comment).max(cursor + c.len_utf8());
                    trivia.push(comment_trivia(&text[cursor..stop]));
                    cursor = stop;
                }
            }
        }

        trivia
    }
}

fn comment_trivia(body: &str) -> Trivia {
    if body.starts_with("///") && !body.starts_with("////") {
        Trivia::DocComment(body.to_string())
    } else {
        Trivia::Comment(body.to_string())
    }
}

/// Comments and directive lines belong to the next declaration's leading region.
fn is_trivia_node(node: Node<'_>) -> bool {
    let kind = node.kind();
    kind == "comment" || (kind.starts_with("preproc_") && !CONDITIONAL_BLOCKS.contains(&kind))
}

fn body_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("body")
        .filter(|body| body.kind() == "declaration_list")
        .or_else(|| child_of_kind(node, "declaration_list"))
}

/// Explicit accessibility words and the modifier flags of a declaration.
fn read_modifiers<'a>(node: Node<'_>, text: &'a str) -> (Vec<&'a str>, Modifiers) {
    let mut explicit = Vec::new();
    let mut modifiers = Modifiers::default();

    let mut cursor = node.walk();
    for modifier in node
        .children(&mut cursor)
        .filter(|child| child.kind() == "modifier")
    {
        match node_text(modifier, text) {
            word @ ("public" | "private" | "protected" | "internal") => explicit.push(word),
            "const" => modifiers.is_const = true,
            "static" => modifiers.is_static = true,
            "readonly" => modifiers.is_readonly = true,
            "abstract" => modifiers.is_abstract = true,
            _ => {}
        }
    }

    (explicit, modifiers)
}

fn resolve_visibility(explicit: &[&str], container: Option<&Container>) -> Visibility {
    let has = |word: &str| explicit.contains(&word);

    if has("public") {
        Visibility::Public
    } else if has("private") {
        // `private protected` narrows to the declaring assembly's subclasses.
        Visibility::Private
    } else if has("protected") {
        Visibility::Protected
    } else if has("internal") {
        Visibility::Internal
    } else {
        match container {
            None => Visibility::Internal,
            Some(container) if container.kind == DeclarationKind::Interface => Visibility::Public,
            Some(_) => Visibility::Private,
        }
    }
}

fn read_parameters(list: Node<'_>, text: &str) -> Vec<Parameter> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|parameter| parameter.kind().starts_with("parameter"))
        .filter_map(|parameter| {
            let name = parameter.child_by_field_name("name")?;
            let shape = parameter.child_by_field_name("type")?;
            Some(Parameter::new(
                node_text(name, text).trim_start_matches('@'),
                shape_of(shape, text),
            ))
        })
        .collect()
}

/// Whether a property declares a `set` accessor not restricted to `private` or `internal`.
fn accessible_setter(property: Node<'_>, text: &str) -> bool {
    let Some(accessors) = property
        .child_by_field_name("accessors")
        .or_else(|| child_of_kind(property, "accessor_list"))
    else {
        return false;
    };

    let mut cursor = accessors.walk();
    let declarations: Vec<Node<'_>> = accessors
        .named_children(&mut cursor)
        .filter(|accessor| accessor.kind() == "accessor_declaration")
        .collect();

    declarations.into_iter().any(|accessor| {
        let is_set = accessor
            .child_by_field_name("name")
            .or_else(|| child_of_kind(accessor, "set"))
            .is_some_and(|name| node_text(name, text) == "set");
        let (explicit, _) = read_modifiers(accessor, text);
        is_set && !explicit.iter().any(|word| matches!(*word, "private" | "internal"))
    })
}

/// First direct child of the given kind.
pub(crate) fn child_of_kind<'n>(node: Node<'n>, kind: &str) -> Option<Node<'n>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

pub(crate) fn node_text<'a>(node: Node<'_>, text: &'a str) -> &'a str {
    text.get(node.byte_range()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::model::{DeclarationKind, TypeShape, Visibility};
    use crate::source::SourceUnit;

    fn only(source: &str) -> crate::model::Declaration {
        let mut unit = SourceUnit::parse(source);
        assert_eq!(unit.declarations.len(), 1, "{:?}", unit.declarations);
        unit.declarations.remove(0)
    }

    fn member(body: &str) -> crate::model::Declaration {
        let mut unit = SourceUnit::parse(format!("public class Widget\n{{\n    {body}\n}}\n"));
        assert_eq!(unit.declarations.len(), 2, "{:?}", unit.declarations);
        unit.declarations.remove(1)
    }

    fn ignored(body: &str) {
        let unit = SourceUnit::parse(format!("public class Widget\n{{\n    {body}\n}}\n"));
        assert_eq!(unit.declarations.len(), 1, "{body} should be ignored");
    }

    #[test]
    fn type_declarations() {
        let widget = only("[Serializable]\npublic sealed class Widget<T> : Base where T : new()\n{\n}\n");
        assert_eq!(widget.kind, DeclarationKind::Class);
        assert_eq!(widget.name, "Widget");
        assert_eq!(widget.visibility, Visibility::Public);
        assert!(widget.source_text.starts_with("[Serializable]"));

        let point = only("public record struct Point(int X, int Y);\n");
        assert_eq!((point.kind, point.name.as_str()), (DeclarationKind::Class, "Point"));

        let hidden = only("class Hidden { }\n");
        assert_eq!(hidden.visibility, Visibility::Internal);

        let unit = SourceUnit::parse("public class Outer\n{\n    interface IShape { }\n}\n");
        assert_eq!(unit.declarations[1].visibility, Visibility::Private);
    }

    #[test]
    fn methods_and_constructors() {
        let method = member(
            "public static async Task<Dictionary<int, string>> LoadAsync<T>(this Widget w, [NotNull] ref int count, string name = \"a,b\") { return null; }",
        );
        assert_eq!(method.kind, DeclarationKind::Method);
        assert_eq!(method.name, "LoadAsync");
        assert!(method.modifiers.is_static);
        assert_eq!(
            method.return_type.map(|shape| shape.to_string()),
            Some("Task<Dictionary<int, string>>".to_string())
        );
        let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["w", "count", "name"]);

        let ctor = member("public Widget(int size) : base(size) { }");
        assert_eq!(ctor.kind, DeclarationKind::Constructor);
        assert_eq!(ctor.parameters.len(), 1);

        let tuple = member("public (int, string) Pair() => (1, \"a\");");
        assert_eq!(tuple.name, "Pair");
        assert_eq!(tuple.return_type, Some(TypeShape::Other("(int, string)".into())));

        ignored("~Widget() { }");
        ignored("public static Widget operator +(Widget a, Widget b) => a;");
        ignored("public static implicit operator int(Widget w) => 0;");
    }

    #[test]
    fn properties_and_fields() {
        let property = member("public string Name /* display */ { get; set; }");
        assert_eq!(property.kind, DeclarationKind::Property);
        assert_eq!(property.name, "Name");

        let constant = member("public const int MaxSize = 10;");
        assert_eq!(constant.kind, DeclarationKind::Field);
        assert!(constant.modifiers.is_const);
        assert_eq!(constant.field_type, Some(TypeShape::primitive("int")));

        let pair = member("internal int left, right;");
        assert_eq!(pair.name, "left");
        assert_eq!(pair.visibility, Visibility::Internal);

        let lambda = member("public Func<int, bool> Check = x => x > 0;");
        assert_eq!(lambda.kind, DeclarationKind::Field);
        assert!(lambda.source_text.ends_with("x > 0;"));

        ignored("public int this[int index] => index;");
        ignored("public event EventHandler Changed;");
        ignored("public delegate void Handler(int code);");
    }

    #[test]
    fn default_visibility() {
        let unit = SourceUnit::parse("public interface IShape\n{\n    double Area();\n}\n");
        assert_eq!(unit.declarations[1].visibility, Visibility::Public);

        assert_eq!(member("void Run() { }").visibility, Visibility::Private);
        assert_eq!(
            member("protected internal void Run() { }").visibility,
            Visibility::Protected
        );
        assert_eq!(
            member("private protected void Run() { }").visibility,
            Visibility::Private
        );
    }

    #[test]
    fn setters() {
        let has_setter = |accessors: &str| {
            member(&format!("public int Value {{ {accessors} }}"))
                .property
                .is_some_and(|property| property.has_setter)
        };

        assert!(has_setter("get; set;"));
        assert!(has_setter("get { return x; } protected set { x = value; }"));
        assert!(has_setter("get => x; set => x = value;"));
        assert!(!has_setter("get; private set;"));
        assert!(!has_setter("get; internal set;"));
        assert!(!has_setter("get; init;"));
        assert!(!has_setter("get { return settings; }"));
    }
}
