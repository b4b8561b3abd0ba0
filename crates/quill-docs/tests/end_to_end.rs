use quill_docs::{
    scan_unit, DeclarationKind, Documentor, DocumentorOptions, GenerationSource, OutcomeStatus,
    ScanOptions, SourceUnit,
};

async fn fix(source: &str) -> String {
    let documentor = Documentor::new(DocumentorOptions::default());
    documentor
        .document_unit(&SourceUnit::parse(source))
        .await
        .text
}

#[tokio::test]
async fn documents_class_inside_namespace() {
    let source = "using System;\n\nnamespace ConsoleApp7\n{\n    public class SuperDuperClassTester\n    {\n    }\n}\n";

    let expected = "using System;\n\nnamespace ConsoleApp7\n{\n    /// <summary>\n    /// The super duper class tester.\n    /// </summary>\n    public class SuperDuperClassTester\n    {\n    }\n}\n";

    assert_eq!(fix(source).await, expected);
}

#[tokio::test]
async fn keeps_tab_indentation() {
    let source = "namespace ConsoleApp7\n{\n\tpublic class SuperDuperClassTester\n\t{\n\t}\n}\n";

    let expected = "namespace ConsoleApp7\n{\n\t/// <summary>\n\t/// The super duper class tester.\n\t/// </summary>\n\tpublic class SuperDuperClassTester\n\t{\n\t}\n}\n";

    assert_eq!(fix(source).await, expected);
}

#[tokio::test]
async fn documents_methods_with_parameters() {
    let source = r#"namespace ConsoleApp4
{
    /// <summary>
    /// The method tester.
    /// </summary>
    public class MethodTester
    {
        public void ShowBasicMethodTester()
        {
        }

        public MethodTester ShowMethodWithParameterTester(string param1, int param2, bool param3)
        {
            return null;
        }
    }
}
"#;

    let expected = r#"namespace ConsoleApp4
{
    /// <summary>
    /// The method tester.
    /// </summary>
    public class MethodTester
    {
        /// <summary>
        /// Shows the basic method tester.
        /// </summary>
        public void ShowBasicMethodTester()
        {
        }

        /// <summary>
        /// Shows the method with parameter tester.
        /// </summary>
        /// <param name="param1">The param1.</param>
        /// <param name="param2">The param2.</param>
        /// <param name="param3">If true, param3.</param>
        /// <returns>A MethodTester.</returns>
        public MethodTester ShowMethodWithParameterTester(string param1, int param2, bool param3)
        {
            return null;
        }
    }
}
"#;

    assert_eq!(fix(source).await, expected);
}

#[tokio::test]
async fn inheritdoc_and_private_members_are_left_alone() {
    let source = r#"public class Shape : IShape
{
    /// <inheritdoc/>
    public double Area() => 0;

    private int counter;
}
"#;

    let documentor = Documentor::new(DocumentorOptions::default());
    let report = documentor.document_unit(&SourceUnit::parse(source)).await;

    assert_eq!(report.documented, 1, "only the class needs a comment");
    assert_eq!(report.skipped, 2);
    assert!(report.text.starts_with("/// <summary>\n/// The shape.\n/// </summary>\npublic class Shape"));
    assert!(report.text.contains("    /// <inheritdoc/>\n    public double Area() => 0;"));
    assert!(report.text.contains("\n\n    private int counter;\n"));
}

#[tokio::test]
async fn documents_constructors_and_properties() {
    let source = r#"public class ConstructorTester
{
    public ConstructorTester(bool isRed)
    {
    }

    public bool IsTesterStarted { get; set; }

    public string PersonName { get; private set; }
}
"#;

    let text = fix(source).await;

    assert!(text.contains(
        "    /// <summary>\n    /// Initializes a new instance of the <see cref=\"ConstructorTester\"/> class.\n    /// </summary>\n    /// <param name=\"isRed\">If true, is red.</param>\n    public ConstructorTester(bool isRed)"
    ));
    assert!(text.contains(
        "    /// Gets or sets a value indicating whether tester is started.\n    /// </summary>\n    public bool IsTesterStarted"
    ));
    assert!(text.contains("    /// Gets the person name.\n"));
}

#[tokio::test]
async fn second_run_changes_nothing() {
    let source = "public class Widget\n{\n    public const int MaxSize = 10;\n\n    public int Count() => 0;\n}\n";

    let documentor = Documentor::new(DocumentorOptions::default());
    let first = documentor.document_unit(&SourceUnit::parse(source)).await;
    assert_eq!(first.documented, 3);
    assert!(first.changed());

    let second = documentor.document_unit(&SourceUnit::parse(first.text.as_str())).await;
    assert!(!second.changed());
    assert_eq!(second.skipped, 3);
    assert_eq!(second.text, first.text);
}

#[tokio::test]
async fn malformed_comments_are_documented_once() {
    let source = "public class Gadget\n{\n    /// </summary>\n    public void Spin() { }\n\n    /// <summary>\n    /// never closed\n    public int Count;\n}\n";

    let documentor = Documentor::new(DocumentorOptions::default());
    let first = documentor.document_unit(&SourceUnit::parse(source)).await;
    assert_eq!(first.documented, 3);
    assert!(first.text.contains(
        "    /// </summary>\n    /// <summary>\n    /// Spins the.\n    /// </summary>\n    public void Spin() { }"
    ));

    let second = documentor.document_unit(&SourceUnit::parse(first.text.as_str())).await;
    assert_eq!(second.documented, 0);
    assert_eq!(second.text, first.text);
    assert_eq!(second.text.matches("/// Spins the.").count(), 1);
    assert_eq!(second.text.matches("/// The count.").count(), 1);
}

#[tokio::test]
async fn outcomes_follow_source_order() {
    let source = "public enum Color { Red }\n\npublic interface IWidget\n{\n    void Spin();\n}\n";

    let documentor = Documentor::new(DocumentorOptions::default().with_concurrency(8));
    let report = documentor.document_unit(&SourceUnit::parse(source)).await;

    let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "IWidget", "Spin"]);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::Documented
            && o.source == Some(GenerationSource::Heuristic)));
    assert!(report.text.contains("/// The color.\n/// </summary>\npublic enum Color"));
    assert!(report.text.contains("/// The widget.\n/// </summary>\npublic interface IWidget"));
    assert!(report.text.contains("    /// Spins the.\n    /// </summary>\n    void Spin();"));
}

#[test]
fn scan_matches_what_fix_would_document() {
    let source = "public class Widget\n{\n    public int Size;\n    public const int MaxSize = 10;\n}\n";
    let unit = SourceUnit::parse(source);

    let all: Vec<_> = scan_unit(&unit, &ScanOptions::default())
        .into_iter()
        .map(|d| (d.kind, d.name))
        .collect();
    assert_eq!(
        all,
        vec![
            (DeclarationKind::Class, "Widget".to_string()),
            (DeclarationKind::Field, "Size".to_string()),
            (DeclarationKind::Field, "MaxSize".to_string()),
        ]
    );

    let consts = scan_unit(&unit, &ScanOptions::default().with_const_fields_only(true));
    assert_eq!(consts.len(), 2);
    assert!(consts.iter().all(|d| d.name != "Size"));
}
