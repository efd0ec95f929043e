//! Integration tests for the JSON command protocol against a live server.

mod common;

use meshlab_client::command::{execute_json, execute_json_batch};
use meshlab_client::fixtures;
use shared::ply;

#[tokio::test]
async fn test_batch_pipeline() {
    let s = common::session_with_server().await;
    let dir = std::env::temp_dir().join(format!("meshlab-commands-{}", uuid::Uuid::new_v4()));
    let out = dir.join("dirty.ply");

    let reference = serde_json::to_value(fixtures::cube(1.0)).unwrap();
    let dirty = serde_json::to_value(fixtures::translated(
        &fixtures::with_degenerate_faces(),
        [2.0, 0.0, 0.0],
    ))
    .unwrap();
    let batch = serde_json::json!([
        { "command": "load_scene", "id": "ref", "scene": {
            "type": "leaf", "vertices": reference["vertices"], "indices": reference["faces"] } },
        { "command": "load_scene", "id": "dirty", "scene": {
            "type": "leaf", "vertices": dirty["vertices"], "indices": dirty["faces"] } },
        { "command": "align" },
        { "command": "deform", "id": "ref" },
        { "command": "clean", "id": "dirty" },
        { "command": "inspect" },
        { "command": "export", "id": "dirty", "path": out },
    ]);

    let responses = execute_json_batch(&s, &batch.to_string()).await.unwrap();
    assert_eq!(responses.len(), 7);
    for (i, r) in responses.iter().enumerate() {
        assert!(r.success, "command {i} failed: {:?}", r.error);
    }

    let align = responses[2].data.as_ref().unwrap();
    assert_eq!(align["transformations"].as_object().unwrap().len(), 2);
    assert_eq!(responses[3].data.as_ref().unwrap()["version"], 1);
    assert_eq!(responses[4].data.as_ref().unwrap()["version"], 1);

    let inspect = responses[5].data.as_ref().unwrap();
    assert_eq!(inspect["mesh_count"], 2);
    let dirty = &inspect["meshes"][0];
    assert_eq!(dirty["id"], "dirty");
    assert_eq!(dirty["face_count"], 4);
    assert_eq!(dirty["degenerate_faces"], 0);

    let exported = ply::decode(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(exported.vertex_count(), 4);
    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_failures_do_not_stop_batch() {
    let s = common::session_with_server().await;
    let batch = r#"[
        {"command": "deform", "id": "ghost"},
        {"command": "load_scene", "id": "t", "scene": {"type": "leaf", "vertices": [0,0,0, 1,0,0, 0,1,0]}},
        {"command": "clean", "id": "t"}
    ]"#;

    let responses = execute_json_batch(&s, batch).await.unwrap();
    assert!(!responses[0].success);
    assert!(responses[0].error.as_ref().unwrap().contains("ghost"));
    assert!(responses[1].success);
    assert!(responses[2].success, "{:?}", responses[2].error);
}

#[tokio::test]
async fn test_server_error_is_reported() {
    // Nothing is listening on the discard port.
    let s = meshlab_client::Session::new(meshlab_client::state::AppSettings::with_server_url(
        "http://127.0.0.1:9",
    ))
    .unwrap();
    s.register("m", fixtures::triangle()).unwrap();

    let resp = execute_json(&s, r#"{"command": "clean", "id": "m"}"#)
        .await
        .unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().starts_with("HTTP error"));
    assert_eq!(s.registry().version("m"), 0);
}
