//! C# declaration scanner and source rewriter.
//!
//! Declarations are read from a `tree-sitter` syntax tree of the unit. The
//! text between one declaration and the previous token is kept as leading
//! trivia so patches can be spliced back without reformatting the file.

mod syntax;
mod types;

use std::path::Path;

use tracing::{debug, warn};
use tree_sitter::{Parser, Tree};

use crate::error::{DocsError, Result};
use crate::model::Declaration;
use crate::patch::PatchedDeclaration;
use syntax::Collector;

pub use types::parse_type;

/// A C# source file and the declarations found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// Full source text.
    pub text: String,
    /// Declarations in source order, containers before their members.
    pub declarations: Vec<Declaration>,
}

impl SourceUnit {
    /// Scans `text` for declarations.
    ///
    /// Syntax errors do not fail the scan; declarations the parser recovered
    /// are still reported.
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let declarations = match parse_tree(&text) {
            Some(tree) => {
                let root = tree.root_node();
                if root.has_error() {
                    debug!("source unit has syntax errors");
                }
                let mut collector = Collector::new(&text);
                collector.scan_scope(root, 0, None);
                collector.finish()
            }
            None => Vec::new(),
        };
        debug!(declarations = declarations.len(), "parsed source unit");
        Self { text, declarations }
    }

    /// Reads and scans a source file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| DocsError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(Self::parse(text))
    }

    /// Returns the source text with each patched declaration's leading trivia replaced.
    ///
    /// Patches are applied from the end of the file towards the start so earlier
    /// offsets stay valid. A patch whose span no longer matches this unit, or
    /// that overlaps one already applied, is skipped.
    pub fn apply(&self, patches: &[PatchedDeclaration]) -> String {
        let mut ordered: Vec<&PatchedDeclaration> = patches.iter().collect();
        ordered.sort_by(|a, b| {
            b.declaration
                .span
                .leading_start
                .cmp(&a.declaration.span.leading_start)
        });

        let mut text = self.text.clone();
        let mut applied_from = usize::MAX;

        for patched in ordered {
            let declaration = &patched.declaration;
            let span = declaration.span;
            let matches_unit = span.leading_start <= span.start
                && span.start <= applied_from
                && self
                    .text
                    .get(span.start..)
                    .is_some_and(|rest| rest.starts_with(&declaration.source_text));

            if !matches_unit || self.text.get(span.leading_start..span.start).is_none() {
                warn!(
                    name = %declaration.name,
                    line = declaration.line,
                    "patch does not match the source unit, skipping"
                );
                continue;
            }

            text.replace_range(span.leading_start..span.start, &patched.leading_text());
            applied_from = span.leading_start;
        }

        text
    }
}

/// Parses `text` with the C# grammar.
fn parse_tree(text: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(error) = parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into()) {
        warn!(%error, "failed to load the C# grammar");
        return None;
    }
    let tree = parser.parse(text, None);
    if tree.is_none() {
        warn!("C# parser returned no tree");
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::DocComment;
    use crate::model::{DeclarationKind, Trivia, TypeShape, Visibility};
    use crate::patch::patch;
    use crate::scan::{should_document, ScanOptions};

    const WIDGETS: &str = r#"using System;

namespace Acme.Widgets
{
    /// <summary>
    /// Existing.
    /// </summary>
    public class Widget
    {
        private int count;

        public const int MaxSize = 10;

        public Widget(int size)
        {
            count = size;
        }

        public string DisplayName { get; set; } = "widget";

        public bool IsEnabled { get; private set; }

        public List<string> GetNames(bool includeHidden)
        {
            var closing = "}";
            return new List<string>();
        }

        public int Count => count;

        public interface INested { } // nested
    }

    internal class Hidden
    {
        public void Run() { }
    }

    public enum Color { Red, Green }
}
"#;

    fn summary(unit: &SourceUnit) -> Vec<(DeclarationKind, &str)> {
        unit.declarations
            .iter()
            .map(|declaration| (declaration.kind, declaration.name.as_str()))
            .collect()
    }

    fn find<'u>(unit: &'u SourceUnit, name: &str) -> &'u Declaration {
        unit.declarations
            .iter()
            .find(|declaration| declaration.name == name)
            .unwrap_or_else(|| panic!("declaration {name} not found"))
    }

    #[test]
    fn finds_declarations_in_source_order() {
        let unit = SourceUnit::parse(WIDGETS);
        assert_eq!(
            summary(&unit),
            vec![
                (DeclarationKind::Class, "Widget"),
                (DeclarationKind::Field, "count"),
                (DeclarationKind::Field, "MaxSize"),
                (DeclarationKind::Constructor, "Widget"),
                (DeclarationKind::Property, "DisplayName"),
                (DeclarationKind::Property, "IsEnabled"),
                (DeclarationKind::Method, "GetNames"),
                (DeclarationKind::Property, "Count"),
                (DeclarationKind::Interface, "INested"),
                (DeclarationKind::Class, "Hidden"),
                (DeclarationKind::Method, "Run"),
                (DeclarationKind::Enum, "Color"),
            ]
        );
    }

    #[test]
    fn records_member_facts() {
        let unit = SourceUnit::parse(WIDGETS);

        let widget = find(&unit, "Widget");
        assert_eq!((widget.line, widget.column), (8, 5));
        assert_eq!(widget.indent, "    ");
        assert_eq!(widget.doc_comment_lines().len(), 3);

        let display = find(&unit, "DisplayName");
        assert_eq!(
            display.source_text,
            "public string DisplayName { get; set; } = \"widget\";"
        );
        assert!(display.property.as_ref().is_some_and(|p| p.has_setter));
        assert!(!find(&unit, "IsEnabled").property.as_ref().is_some_and(|p| p.has_setter));

        let names = find(&unit, "GetNames");
        assert_eq!(
            names.return_type,
            Some(TypeShape::generic("List", vec![TypeShape::primitive("string")]))
        );
        assert_eq!(names.parameters[0].name, "includeHidden");
        assert!(names.source_text.ends_with("return new List<string>();\n        }"));

        let constant = find(&unit, "MaxSize");
        assert!(constant.modifiers.is_const);
        assert_eq!(constant.source_text, "public const int MaxSize = 10;");

        let run = find(&unit, "Run");
        let container = run.container.as_ref().expect("container");
        assert_eq!(container.name, "Hidden");
        assert_eq!(container.visibility, Visibility::Internal);

        let nested = find(&unit, "INested");
        assert_eq!(nested.visibility, Visibility::Public);
        assert_eq!(nested.container.as_ref().map(|c| c.name.as_str()), Some("Widget"));
    }

    #[test]
    fn scan_candidates_follow_visibility() {
        let unit = SourceUnit::parse(WIDGETS);
        let options = ScanOptions::default();
        let candidates: Vec<&str> = unit
            .declarations
            .iter()
            .filter(|declaration| should_document(declaration, &options))
            .map(|declaration| declaration.name.as_str())
            .collect();

        assert_eq!(
            candidates,
            vec![
                "MaxSize",
                "Widget",
                "DisplayName",
                "IsEnabled",
                "GetNames",
                "Count",
                "INested",
                "Color"
            ]
        );
    }

    #[test]
    fn file_scoped_namespace_and_crlf_patch() {
        let text = "namespace Acme;\r\n\r\npublic class Gadget\r\n{\r\n    public void Spin() { }\r\n}\r\n";
        let unit = SourceUnit::parse(text);
        assert_eq!(
            summary(&unit),
            vec![(DeclarationKind::Class, "Gadget"), (DeclarationKind::Method, "Spin")]
        );

        let spin = find(&unit, "Spin");
        let patched = patch(spin, &DocComment::summary("Spins the.")).expect("patch");
        let rewritten = unit.apply(&[patched]);

        assert_eq!(
            rewritten,
            "namespace Acme;\r\n\r\npublic class Gadget\r\n{\r\n    /// <summary>\r\n    /// Spins the.\r\n    /// </summary>\r\n    public void Spin() { }\r\n}\r\n"
        );

        let reparsed = SourceUnit::parse(rewritten);
        assert!(!should_document(find(&reparsed, "Spin"), &ScanOptions::default()));
    }

    #[test]
    fn patches_apply_bottom_up() {
        let text = "public class A\n{\n    public int X;\n    public int Y;\n}\n";
        let unit = SourceUnit::parse(text);
        let patches: Vec<_> = ["A", "X", "Y"]
            .iter()
            .map(|name| {
                patch(find(&unit, name), &DocComment::summary(format!("The {name}.")))
                    .expect("patch")
            })
            .collect();

        assert_eq!(
            unit.apply(&patches),
            "/// <summary>\n/// The A.\n/// </summary>\npublic class A\n{\n    /// <summary>\n    /// The X.\n    /// </summary>\n    public int X;\n    /// <summary>\n    /// The Y.\n    /// </summary>\n    public int Y;\n}\n"
        );
    }

    #[test]
    fn mismatched_patches_are_skipped() {
        let unit = SourceUnit::parse("public class A { }\n");
        let other = SourceUnit::parse("\n\n\npublic class B { }\n");
        let foreign = patch(find(&other, "B"), &DocComment::summary("The b.")).expect("patch");
        assert_eq!(unit.apply(&[foreign]), unit.text);
    }

    #[test]
    fn attributes_and_interface_members() {
        let text = r#"public interface IShape
{
    [Obsolete("Use {Perimeter}")]
    double Area();

    string Name { get; }
}

public struct Point { public int X; }
"#;
        let unit = SourceUnit::parse(text);
        assert_eq!(
            summary(&unit),
            vec![
                (DeclarationKind::Interface, "IShape"),
                (DeclarationKind::Method, "Area"),
                (DeclarationKind::Property, "Name"),
                (DeclarationKind::Class, "Point"),
                (DeclarationKind::Field, "X"),
            ]
        );

        let area = find(&unit, "Area");
        assert!(area.source_text.starts_with("[Obsolete"));
        assert_eq!(area.visibility, Visibility::Public);
        assert_eq!((area.line, area.column), (3, 5));
    }

    #[test]
    fn comments_and_directives_become_trivia() {
        let text = "public class Gadget\n{\n    #region Api\n    // note\n    /* block */\n    /// <summary>Spins.</summary>\n    public void Spin() { }\n    #endregion\n}\n";
        let unit = SourceUnit::parse(text);
        let spin = find(&unit, "Spin");

        assert!(spin.leading_trivia.contains(&Trivia::Comment("#region Api".into())));
        assert!(spin.leading_trivia.contains(&Trivia::Comment("// note".into())));
        assert!(spin.leading_trivia.contains(&Trivia::Comment("/* block */".into())));
        assert_eq!(spin.doc_comment_lines(), vec!["/// <summary>Spins.</summary>"]);
        assert_eq!(spin.leading_trivia.last(), Some(&Trivia::Whitespace("    ".into())));
        assert_eq!(
            crate::patch::render_trivia(&spin.leading_trivia),
            &text[spin.span.leading_start..spin.span.start]
        );
        assert!(!should_document(spin, &ScanOptions::default()));
    }

    #[test]
    fn syntax_errors_do_not_fail_the_scan() {
        let text = "}}} public class {{{ void (";
        let unit = SourceUnit::parse(text);
        assert_eq!(unit.text, text);
        assert_eq!(unit.apply(&[]), text);
    }

    #[test]
    fn read_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("Missing.cs");
        assert!(matches!(
            SourceUnit::read(&missing),
            Err(DocsError::Io { .. })
        ));

        let present = dir.path().join("Widget.cs");
        std::fs::write(&present, "public class Widget { }").expect("write");
        let unit = SourceUnit::read(&present).expect("read");
        assert_eq!(unit.declarations.len(), 1);
    }
}
