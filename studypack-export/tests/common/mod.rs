//! Shared fixture: a small org with one study and a bit of everything.

#![allow(dead_code)]

use serde_json::{Value, json};
use studypack_export::{MemorySource, Snapshot};
use studypack_model::{FieldDefinition, TypeSchema};

pub const STUDY: u32 = 1;
pub const TASK_A: u32 = 10;
pub const TASK_B: u32 = 11;
pub const STEP_A: u32 = 20;
/// Points at a parent step that does not exist.
pub const STEP_B: u32 = 21;
pub const BRANCH_A: u32 = 30;
/// Targets `STEP_B`, so it falls with it.
pub const BRANCH_B: u32 = 31;
pub const TEMPLATE: u32 = 40;
pub const KNOWLEDGE_CHECK: u32 = 41;
pub const CSS: u32 = 42;
pub const VISIT_SCHEDULE: u32 = 50;
pub const VISIT: u32 = 51;
pub const GROUP: u32 = 60;
/// Assigns `TASK_A` to `GROUP`.
pub const GROUP_TASK: u32 = 61;
pub const SITE: u32 = 70;
pub const MISSING: u32 = 99;

pub fn oid(n: u32) -> String {
    format!("{n:024x}")
}

pub fn reference(n: u32) -> Value {
    json!({ "_id": oid(n), "object": "ref" })
}

pub fn schemas() -> Vec<TypeSchema> {
    vec![
        TypeSchema::new("c_study", "c_studies", "c_key")
            .with_field(FieldDefinition::reference("c_public_group", "c_group")),
        TypeSchema::new("c_task", "c_tasks", "c_key")
            .with_field(FieldDefinition::reference("c_study", "c_study")),
        TypeSchema::new("c_step", "c_steps", "c_key")
            .with_field(FieldDefinition::reference("c_task", "c_task").required())
            .with_field(FieldDefinition::reference("c_parent_step", "c_step")),
        TypeSchema::new("c_branch", "c_branches", "c_key")
            .with_field(FieldDefinition::reference("c_task", "c_task").required())
            .with_field(FieldDefinition::reference("c_default_destination", "c_step")),
        TypeSchema::new("ec__document_template", "ec__document_templates", "ec__key")
            .with_field(FieldDefinition::reference("ec__study", "c_study")),
        TypeSchema::new("ec__knowledge_check", "ec__knowledge_checks", "ec__key").with_field(
            FieldDefinition::reference("ec__document_template", "ec__document_template").required(),
        ),
        TypeSchema::new("ec__default_document_css", "ec__default_document_csses", "ec__key"),
        TypeSchema::new("c_visit_schedule", "c_visit_schedules", "c_key")
            .with_field(FieldDefinition::reference("c_study", "c_study")),
        TypeSchema::new("c_visit", "c_visits", "c_key").with_field(
            FieldDefinition::reference("c_visit_schedules", "c_visit_schedule").array(),
        ),
        TypeSchema::new("c_group", "c_groups", "c_key")
            .with_field(FieldDefinition::reference("c_study", "c_study")),
        TypeSchema::new("c_group_task", "c_group_tasks", "c_key")
            .with_field(FieldDefinition::reference("c_group", "c_group").required())
            .with_field(FieldDefinition::reference("c_assignment", "c_task").required()),
        TypeSchema::new("c_site", "c_sites", "c_key")
            .with_field(FieldDefinition::reference("c_study", "c_study")),
    ]
}

fn record(n: u32, object: &str, fields: Value) -> Value {
    let mut value = fields;
    value["_id"] = json!(oid(n));
    value["object"] = json!(object);
    value
}

pub fn records() -> Vec<Value> {
    vec![
        record(STUDY, "c_study", json!({ "c_key": "study", "c_name": "Demo", "c_public_group": reference(GROUP) })),
        record(TASK_A, "c_task", json!({ "c_key": "task-a", "c_study": reference(STUDY) })),
        record(TASK_B, "c_task", json!({ "c_key": "task-b", "c_study": reference(STUDY) })),
        record(STEP_A, "c_step", json!({ "c_key": "step-a", "c_task": reference(TASK_A) })),
        record(
            STEP_B,
            "c_step",
            json!({ "c_key": "step-b", "c_task": reference(TASK_B), "c_parent_step": reference(MISSING) }),
        ),
        record(
            BRANCH_A,
            "c_branch",
            json!({ "c_key": "branch-a", "c_task": reference(TASK_A), "c_default_destination": reference(STEP_A) }),
        ),
        record(
            BRANCH_B,
            "c_branch",
            json!({ "c_key": "branch-b", "c_task": reference(TASK_B), "c_default_destination": reference(STEP_B) }),
        ),
        record(TEMPLATE, "ec__document_template", json!({ "ec__key": "consent", "ec__study": reference(STUDY) })),
        record(
            KNOWLEDGE_CHECK,
            "ec__knowledge_check",
            json!({ "ec__key": "kc", "ec__document_template": reference(TEMPLATE) }),
        ),
        record(CSS, "ec__default_document_css", json!({ "ec__key": "css" })),
        record(VISIT_SCHEDULE, "c_visit_schedule", json!({ "c_key": "schedule", "c_study": reference(STUDY) })),
        record(VISIT, "c_visit", json!({ "c_key": "visit", "c_visit_schedules": [reference(VISIT_SCHEDULE)] })),
        record(GROUP, "c_group", json!({ "c_key": "group", "c_study": reference(STUDY) })),
        record(
            GROUP_TASK,
            "c_group_task",
            json!({ "c_key": "group-task", "c_group": reference(GROUP), "c_assignment": reference(TASK_A) }),
        ),
        record(SITE, "c_site", json!({ "c_key": "site", "c_study": reference(STUDY) })),
    ]
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        schemas: schemas(),
        records: records(),
    }
}

/// The fixture with records of `object` removed.
pub fn snapshot_without(object: &str) -> Snapshot {
    let mut snapshot = snapshot();
    snapshot
        .records
        .retain(|r| r.get("object").and_then(Value::as_str) != Some(object));
    snapshot
}

pub fn source() -> MemorySource {
    MemorySource::new(snapshot())
}

pub fn ids(ns: &[u32]) -> Vec<String> {
    ns.iter().map(|n| oid(*n)).collect()
}
