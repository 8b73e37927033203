use pretty_assertions::assert_eq;
use serde_json::json;
use studypack_manifest::{AVAILABLE_OBJECTS, ManifestError, ManifestRequest};

// ── Rejection ────────────────────────────────────────────────────

#[test]
fn non_manifest_object_is_rejected() {
    let err = ManifestRequest::parse(&json!({ "object": "c_task" })).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidArgument(msg) if msg == "The argument is not a valid manifest"));
}

#[test]
fn missing_object_key_is_rejected() {
    assert!(ManifestRequest::parse(&json!({ "c_task": { "includes": [] } })).is_err());
}

#[test]
fn non_object_is_rejected() {
    assert!(ManifestRequest::parse(&json!(["manifest"])).is_err());
    assert!(ManifestRequest::parse(&json!("manifest")).is_err());
}

#[test]
fn selected_type_without_includes_is_rejected() {
    let err = ManifestRequest::parse(&json!({ "object": "manifest", "c_task": {} })).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidArgument(_)));
}

#[test]
fn non_string_key_is_rejected() {
    let err = ManifestRequest::parse(&json!({
        "object": "manifest",
        "c_task": { "includes": ["ok", 7] }
    }))
    .unwrap_err();
    assert!(matches!(err, ManifestError::InvalidArgument(_)));
}

// ── Cleaning ─────────────────────────────────────────────────────

#[test]
fn unavailable_keys_are_dropped() {
    let request = ManifestRequest::parse(&json!({
        "object": "manifest",
        "dependencies": true,
        "c_task": { "includes": ["t1", "t2"] },
        "c_step": { "includes": ["s1"] },
        "ec__document_template": { "includes": ["consent"] }
    }))
    .unwrap();

    let types: Vec<&str> = request.types().collect();
    assert_eq!(types, vec!["c_task", "ec__document_template"]);
    assert_eq!(request.includes("c_task"), ["t1", "t2"]);
    assert!(request.includes("c_step").is_empty());
}

#[test]
fn custom_availability_list() {
    let request = ManifestRequest::parse_with(
        &json!({ "object": "manifest", "c_step": { "includes": ["s1"] } }),
        &["c_step"],
    )
    .unwrap();
    assert_eq!(request.includes("c_step"), ["s1"]);
}

#[test]
fn types_are_ordered_by_name() {
    let request = ManifestRequest::parse(&json!({
        "object": "manifest",
        "ec__document_template": { "includes": ["consent"] },
        "c_task": { "includes": ["t1"] },
        "c_group": { "includes": ["g1"] }
    }))
    .unwrap();

    assert_eq!(
        request.types().collect::<Vec<_>>(),
        vec!["c_group", "c_task", "ec__document_template"]
    );
}

#[test]
fn keys_outside_the_availability_list_are_not_checked() {
    let request = ManifestRequest::parse_with(
        &json!({
            "object": "manifest",
            "c_task": { "includes": ["t1"] },
            "c_site": { "note": "no includes here" }
        }),
        &["c_task"],
    )
    .unwrap();

    assert_eq!(request.types().collect::<Vec<_>>(), vec!["c_task"]);
}

#[test]
fn manifest_only_header_is_an_empty_request() {
    let request = ManifestRequest::parse(&json!({ "object": "manifest" })).unwrap();
    assert!(request.is_empty());
}

#[test]
fn available_objects_include_study_and_tasks() {
    assert!(AVAILABLE_OBJECTS.contains(&"c_study"));
    assert!(AVAILABLE_OBJECTS.contains(&"c_task"));
    assert!(!AVAILABLE_OBJECTS.contains(&"c_step"));
}
