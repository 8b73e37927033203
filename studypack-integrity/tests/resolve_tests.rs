use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use studypack_integrity::{ReferenceTarget, resolve};
use studypack_model::{FieldDefinition, ObjectId, ReferenceSpec, TypeSchema};

fn oid(n: u32) -> String {
    format!("{n:024x}")
}

fn record(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn specs(fields: Vec<FieldDefinition>) -> Vec<ReferenceSpec> {
    fields
        .into_iter()
        .fold(TypeSchema::new("a", "as", "c_key"), TypeSchema::with_field)
        .reference_specs()
}

fn target(n: u32, field: &str, required: bool) -> ReferenceTarget {
    ReferenceTarget {
        id: ObjectId::parse(&oid(n)).unwrap(),
        field_name: field.into(),
        required,
    }
}

// ── Single references ────────────────────────────────────────────

#[test]
fn reference_object_yields_its_id() {
    let specs = specs(vec![FieldDefinition::reference("ref", "b").required()]);
    let resolved = resolve(&record(json!({ "ref": { "_id": oid(1), "object": "b" } })), &specs);

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].field_name, "ref");
    assert!(resolved[0].required);
    assert_eq!(resolved[0].targets, vec![target(1, "ref", true)]);
}

#[test]
fn raw_identifier_yields_itself() {
    let specs = specs(vec![FieldDefinition::identifier("c_flag", Some("c_patient_flag"))]);
    let resolved = resolve(&record(json!({ "c_flag": oid(7) })), &specs);
    assert_eq!(resolved[0].targets, vec![target(7, "c_flag", false)]);
}

#[test]
fn absent_field_still_produces_an_entry() {
    let specs = specs(vec![
        FieldDefinition::reference("first", "b").required(),
        FieldDefinition::reference("second", "b"),
    ]);
    let resolved = resolve(&record(json!({ "second": { "_id": oid(2) } })), &specs);

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].field_name, "first");
    assert!(resolved[0].targets.is_empty());
    assert!(resolved[0].required);
    assert_eq!(resolved[1].targets.len(), 1);
}

#[test]
fn null_reference_has_no_target() {
    let specs = specs(vec![FieldDefinition::reference("ref", "b")]);
    let resolved = resolve(&record(json!({ "ref": null })), &specs);
    assert!(resolved[0].targets.is_empty());
}

// ── Arrays ───────────────────────────────────────────────────────

#[test]
fn identifier_array_yields_one_target_per_element() {
    let specs = specs(vec![FieldDefinition::identifier("c_parents", Some("c_step")).array()]);
    let resolved = resolve(&record(json!({ "c_parents": [oid(1), oid(2), oid(1)] })), &specs);
    assert_eq!(
        resolved[0].targets,
        vec![target(1, "c_parents", false), target(2, "c_parents", false), target(1, "c_parents", false)]
    );
}

#[test]
fn reference_array_reads_each_object() {
    let specs = specs(vec![FieldDefinition::reference("c_groups", "c_group").array()]);
    let resolved = resolve(
        &record(json!({ "c_groups": [{ "_id": oid(3) }, { "_id": oid(4) }, "junk"] })),
        &specs,
    );
    assert_eq!(
        resolved[0].targets,
        vec![target(3, "c_groups", false), target(4, "c_groups", false)]
    );
}

#[test]
fn empty_array_has_no_targets() {
    let specs = specs(vec![FieldDefinition::identifier("ids", Some("b")).array().required()]);
    let resolved = resolve(&record(json!({ "ids": [] })), &specs);
    assert!(resolved[0].targets.is_empty());
}

// ── Documents ────────────────────────────────────────────────────

#[test]
fn single_document_flattens_nested_targets() {
    let specs = specs(vec![FieldDefinition::document(
        "c_menu_config",
        vec![
            FieldDefinition::identifier("c_group_id", Some("c_group")).required(),
            FieldDefinition::reference("c_site", "c_site"),
        ],
    )]);
    let resolved = resolve(
        &record(json!({
            "c_menu_config": { "c_group_id": oid(5), "c_site": { "_id": oid(6) } }
        })),
        &specs,
    );

    assert_eq!(resolved[0].field_name, "c_menu_config");
    assert!(!resolved[0].required);
    assert_eq!(
        resolved[0].targets,
        vec![target(5, "c_group_id", true), target(6, "c_site", false)]
    );
}

#[test]
fn single_document_deduplicates_by_id() {
    let specs = specs(vec![FieldDefinition::document(
        "doc",
        vec![
            FieldDefinition::reference("x", "b"),
            FieldDefinition::reference("y", "b"),
        ],
    )]);
    let resolved = resolve(
        &record(json!({ "doc": { "x": { "_id": oid(1) }, "y": { "_id": oid(1) } } })),
        &specs,
    );
    assert_eq!(resolved[0].targets, vec![target(1, "x", false)]);
}

#[test]
fn document_array_merges_and_deduplicates() {
    let specs = specs(vec![FieldDefinition::document(
        "c_rules",
        vec![
            FieldDefinition::reference("c_step", "c_step").required(),
            FieldDefinition::identifier("c_flag", Some("c_patient_flag")),
        ],
    )
    .array()]);

    let resolved = resolve(
        &record(json!({
            "c_rules": [
                { "c_step": { "_id": oid(1) } },
                { "c_step": { "_id": oid(2) }, "c_flag": oid(9) },
                { "c_step": { "_id": oid(1) } },
                "not a document"
            ]
        })),
        &specs,
    );

    assert_eq!(
        resolved[0].targets,
        vec![target(1, "c_step", true), target(2, "c_step", true), target(9, "c_flag", false)]
    );
}

#[test]
fn document_that_is_not_an_object_has_no_targets() {
    let specs = specs(vec![FieldDefinition::document(
        "doc",
        vec![FieldDefinition::reference("x", "b").required()],
    )]);
    let resolved = resolve(&record(json!({ "doc": "oops" })), &specs);
    assert!(resolved[0].targets.is_empty());
}

#[test]
fn nested_documents_resolve_recursively() {
    let specs = specs(vec![FieldDefinition::document(
        "outer",
        vec![FieldDefinition::document(
            "inner",
            vec![FieldDefinition::reference("leaf", "b").required()],
        )
        .array()],
    )]);
    let resolved = resolve(
        &record(json!({
            "outer": { "inner": [{ "leaf": { "_id": oid(8) } }, { "leaf": { "_id": oid(9) } }] }
        })),
        &specs,
    );
    assert_eq!(
        resolved[0].targets,
        vec![target(8, "leaf", true), target(9, "leaf", true)]
    );
}
