mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use stache::{parse, run, Engine, Error, EvalError, Statement, Template, FORMAT_VERSION};

fn tree(version: i64, statements: serde_json::Value) -> Template {
    Template::from_json(
        &json!({ "kind": "TEMPLATE", "version": version, "statements": statements }).to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_unsupported_versions_are_rejected() {
    for version in [-1, 1_000_000_000] {
        let result = run(&tree(version, json!([])), ()).await;
        assert!(matches!(
            result,
            Err(Error::Eval(EvalError::UnsupportedVersion { found, expected: FORMAT_VERSION })) if found == version
        ));
    }
}

#[tokio::test]
async fn test_unknown_statements_are_skipped() {
    let template = tree(
        FORMAT_VERSION,
        json!([
            { "kind": "TEXT", "value": "foo" },
            { "kind": "ABLUEBLUE", "value": "noope" },
            { "kind": "TEXT", "value": "bar" },
        ]),
    );
    assert_eq!(template.statements[1], Statement::Unknown);
    assert_eq!(run(&template, ()).await.unwrap(), "foobar");
}

#[tokio::test]
async fn test_hand_built_tree() {
    let template = tree(
        FORMAT_VERSION,
        json!([
            { "kind": "TEXT", "value": "Hi " },
            {
                "kind": "SECTION",
                "expression": { "kind": "PATH", "segments": ["user"] },
                "body": [{ "kind": "MUSTACHE", "expression": { "kind": "PATH", "segments": ["name"] } }],
                "elseBody": [{ "kind": "TEXT", "value": "stranger" }]
            }
        ]),
    );
    assert_eq!(
        run(&template, json!({ "user": { "name": "Ada" } })).await.unwrap(),
        "Hi Ada"
    );
    assert_eq!(run(&template, ()).await.unwrap(), "Hi stranger");
}

#[tokio::test]
async fn test_tree_survives_json() {
    let source = "{{! c }}{{#a}}{{ upper b.c }}{{else}}-{{/a}}{{^d}}!{{/d}}";
    let parsed = parse(source).unwrap();
    let restored = Template::from_json(&parsed.to_json().unwrap()).unwrap();
    assert_eq!(restored, parsed);

    let engine = Engine::with_builtin_helpers();
    let context = json!({ "a": [{ "b": { "c": "q" } }], "d": false });
    let direct = engine.compile(source).unwrap().render(context.clone()).await.unwrap();
    let loaded = engine.compile_tree(restored).render(context).await.unwrap();
    assert_eq!(direct, "Q!");
    assert_eq!(loaded, direct);
}

#[test]
fn test_malformed_tree() {
    let error = Template::from_json(r#"{ "kind": "TEMPLATE", "version": 1 }"#).unwrap_err();
    assert!(matches!(error, Error::Serialization(_)));
}
