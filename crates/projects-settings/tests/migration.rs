use projects_settings::migrate::{migrate, migrate_from, migration_from};
use projects_settings::resolve;
use projects_settings::schema::SchemaVersion;
use serde_json::json;

fn legacy_document() -> serde_json::Value {
    json!({
        "projectViewLimit": 120,
        "frontmatter": { "quoteStrings": "QUOTE_DOUBLE" },
        "projects": [
            { "id": "books", "name": "Books", "dataSource": { "kind": "tag", "config": { "tag": "#book" } } }
        ],
        "commands": [{ "project": "books" }]
    })
}

#[test]
fn full_chain_equals_individual_steps() {
    let legacy = legacy_document();

    let mut stepped = legacy.clone();
    let mut version = SchemaVersion::Legacy;
    while let Some(step) = migration_from(version) {
        stepped = step.apply(stepped);
        version = step.to;
    }

    assert_eq!(migrate(legacy.clone()), stepped);
    assert_eq!(migrate_from(legacy, SchemaVersion::Legacy), stepped);
}

#[test]
fn legacy_document_resolves_with_customizations() {
    let doc = resolve(&legacy_document());

    assert_eq!(doc.version, 2);
    assert_eq!(doc.preferences.project_view_limit, 120);
    assert_eq!(doc.preferences.project_size_limit, 1000);
    assert_eq!(doc.preferences.frontmatter.quote_strings.as_str(), "QUOTE_DOUBLE");
    assert_eq!(doc.preferences.commands.len(), 1);
    assert_eq!(doc.projects[0].data_source.kind(), "tag");
}

#[test]
fn migrated_document_is_stable_under_another_resolve() {
    let once = resolve(&legacy_document());
    let again = resolve(&once.to_raw().unwrap());
    assert_eq!(once, again);
}
