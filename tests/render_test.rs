//! Integration tests for the template rendering engine.

use lessonkit::error::Error;
use lessonkit::render::CONTENT_TOKEN;
use lessonkit::{Context, Element, Scalar, TemplateEngine, TemplateSet, Value};

fn engine(unit: &str, frame: &str) -> TemplateEngine {
    TemplateEngine::new(
        TemplateSet::empty()
            .with_unit("concept", unit)
            .with_frame("L1", frame),
    )
}

#[test]
fn test_frame_wraps_list_block() {
    let engine = engine(
        "<ul>{{#items}}<li>{{.}}</li>{{/items}}</ul>",
        "<div>{{SLIDE_CONTENT}}</div>",
    );
    let ctx = Context::new().with("items", vec!["a", "b"]);

    let rendition = engine.render("concept", "L1", &ctx).unwrap();
    assert_eq!(rendition.text, "<div><ul><li>a</li><li>b</li></ul></div>");
    assert!(rendition.unit_fallback.is_none());
    assert!(rendition.frame_fallback.is_none());
    assert!(rendition.unresolved.is_empty());
}

#[test]
fn test_block_repeats_once_per_element_in_order() {
    let engine = engine("{{#n}}[{{.}}]{{/n}}", "{{SLIDE_CONTENT}}");
    for count in [0usize, 1, 7] {
        let items: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let ctx = Context::new().with("n", items.clone());
        let text = engine.render("concept", "L1", &ctx).unwrap().text;

        let expected: String = items.iter().map(|i| format!("[{}]", i)).collect();
        assert_eq!(text, expected);
    }
}

#[test]
fn test_record_elements_use_their_own_fields() {
    let engine = engine(
        "<table>{{#rows}}<tr><td>{{name}}</td><td>{{speed}}</td></tr>{{/rows}}</table>",
        "{{SLIDE_CONTENT}}",
    );
    let rows = vec![
        Context::new().with("name", "Rust").with("speed", 10i64),
        Context::new().with("name", "Python").with("speed", 2.5),
    ];
    let ctx = Context::new().with("rows", rows);

    let text = engine.render("concept", "L1", &ctx).unwrap().text;
    assert_eq!(
        text,
        "<table><tr><td>Rust</td><td>10</td></tr><tr><td>Python</td><td>2.5</td></tr></table>"
    );
}

#[test]
fn test_nested_record_lists() {
    let engine = engine(
        "{{#rows}}<tr>{{#cells}}<td>{{.}}</td>{{/cells}}</tr>{{/rows}}",
        "{{SLIDE_CONTENT}}",
    );
    let rows = vec![
        Context::new().with("cells", vec!["a", "b"]),
        Context::new().with("cells", vec!["c"]),
    ];
    let ctx = Context::new().with("rows", rows);

    let text = engine.render("concept", "L1", &ctx).unwrap().text;
    assert_eq!(text, "<tr><td>a</td><td>b</td></tr><tr><td>c</td></tr>");
}

#[test]
fn test_scalar_kinds_and_null() {
    let engine = engine("{{a}}|{{b}}|{{c}}|{{d}}|", "{{SLIDE_CONTENT}}");
    let ctx = Context::new()
        .with("a", true)
        .with("b", 42i64)
        .with("c", Value::Scalar(Scalar::Null))
        .with("d", None::<String>);

    let text = engine.render("concept", "L1", &ctx).unwrap().text;
    assert_eq!(text, "true|42|||");
}

#[test]
fn test_mixed_scalar_and_record_list() {
    let engine = engine("{{#xs}}({{.}}{{v}}){{/xs}}", "{{SLIDE_CONTENT}}");
    let items = vec![
        Element::Scalar(Scalar::Text("s".into())),
        Element::Record(Context::new().with("v", "r")),
    ];
    let ctx = Context::new().with("xs", items);

    let text = engine.render("concept", "L1", &ctx).unwrap().text;
    assert_eq!(text, "(s{{v}})({{.}}r)");
}

#[test]
fn test_unresolved_tokens_pass_through() {
    let engine = engine("<h2>{{title}}</h2>{{#missing}}x{{/missing}}", "{{SLIDE_CONTENT}}");
    let rendition = engine.render("concept", "L1", &Context::new()).unwrap();

    assert_eq!(rendition.text, "<h2>{{title}}</h2>{{#missing}}x{{/missing}}");
    assert_eq!(rendition.unresolved, vec!["title", "#missing", "/missing"]);
}

#[test]
fn test_fallbacks_to_default_templates() {
    let engine = engine("<p>{{x}}</p>", "<div>{{SLIDE_CONTENT}}</div>");
    let ctx = Context::new().with("x", "y");

    let rendition = engine.render("timeline", "L7", &ctx).unwrap();
    assert_eq!(rendition.text, "<div><p>y</p></div>");
    assert!(rendition.unit_fallback.unwrap().contains("timeline"));
    assert!(rendition.frame_fallback.unwrap().contains("L7"));
}

#[test]
fn test_missing_default_is_error() {
    let engine = TemplateEngine::new(TemplateSet::empty().with_frame("L1", "{{SLIDE_CONTENT}}"));
    let err = engine.render("concept", "L1", &Context::new()).unwrap_err();
    assert!(matches!(err, Error::MissingTemplate { kind: "unit", .. }));

    let engine = TemplateEngine::new(TemplateSet::empty().with_unit("concept", "x"));
    let err = engine.render("concept", "L1", &Context::new()).unwrap_err();
    assert!(matches!(err, Error::MissingTemplate { kind: "frame", .. }));
}

#[test]
fn test_frame_gets_palette_values() {
    let engine = engine("x", "<div style=\"color: {{accent_color}}\">{{SLIDE_CONTENT}}</div>");
    let l1 = engine.render("concept", "L1", &Context::new()).unwrap().text;
    let l3 = engine.render("concept", "L3", &Context::new()).unwrap().text;

    assert_eq!(l1, "<div style=\"color: #4472C4\">x</div>");
    // L3 has no frame of its own but keeps its palette
    assert_eq!(l3, "<div style=\"color: #9B59B6\">x</div>");
}

#[test]
fn test_rendering_is_idempotent() {
    let engine = TemplateEngine::default();
    let ctx = Context::new()
        .with("section_title", "Loops")
        .with("definition_text", "Repetition.")
        .with("key_points", vec!["one", "two"]);

    let first = engine.render("concept", "L2", &ctx).unwrap();
    let second = engine.render("concept", "L2", &ctx).unwrap();
    assert_eq!(first, second);
    assert!(first.text.contains("<li>one</li>"));
}

#[test]
fn test_custom_content_token() {
    let engine = TemplateEngine::new(
        TemplateSet::empty()
            .with_content_token("BODY")
            .with_unit("concept", "inner")
            .with_frame("L1", "[{{BODY}}]"),
    );
    assert_eq!(engine.render("concept", "L1", &Context::new()).unwrap().text, "[inner]");
    assert_eq!(CONTENT_TOKEN, "SLIDE_CONTENT");
}

#[test]
fn test_template_dir_overlays_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("units")).unwrap();
    std::fs::create_dir_all(dir.path().join("frames")).unwrap();
    std::fs::write(dir.path().join("units/03-concept.html"), "<p>{{section_title}}</p>").unwrap();
    std::fs::write(
        dir.path().join("frames/L2-green-master.html"),
        "<main>{{SLIDE_CONTENT}}</main>",
    )
    .unwrap();

    let set = TemplateSet::from_dir(dir.path()).unwrap();
    assert_eq!(set.unit("concept"), Some("<p>{{section_title}}</p>"));
    assert!(set.unit("title").is_some());

    let engine = TemplateEngine::new(set);
    let ctx = Context::new().with("section_title", "Custom");
    assert_eq!(
        engine.render("concept", "L2", &ctx).unwrap().text,
        "<main><p>Custom</p></main>"
    );
}
