//! JSON command protocol for scripted sessions.
//!
//! Each command maps onto one `Session` operation. Failures are reported in
//! the response (`success: false` plus the error text), never dropped.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shared::MeshId;

use crate::build::SceneNode;
use crate::session::Session;

/// A command the session can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MeshCommand {
    /// Load one or more PLY files as a single merged mesh.
    Load {
        #[serde(default)]
        id: Option<MeshId>,
        paths: Vec<PathBuf>,
    },
    /// Load an inline scene tree as a single merged mesh.
    LoadScene {
        #[serde(default)]
        id: Option<MeshId>,
        scene: SceneNode,
    },
    /// Remove a mesh.
    Remove { id: MeshId },
    /// Remove every mesh.
    Clear,
    /// List meshes with counts, versions and transforms.
    Inspect,
    /// Align meshes on the server (all meshes when `ids` is empty).
    Align {
        #[serde(default)]
        ids: Vec<MeshId>,
    },
    /// Deform a mesh on the server.
    Deform { id: MeshId },
    /// Clean a mesh on the server.
    Clean { id: MeshId },
    /// Apply the stored alignment transform to the vertices.
    BakeTransform { id: MeshId },
    /// Write a mesh to a PLY file.
    Export { id: MeshId, path: PathBuf },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn new_id(id: Option<MeshId>) -> MeshId {
    id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Execute a single command on the session.
pub async fn execute_command(session: &Session, cmd: MeshCommand) -> CommandResponse {
    let result = match cmd {
        MeshCommand::Load { id, paths } => {
            let id = new_id(id);
            session
                .load_ply_files(&id, &paths)
                .map(|()| serde_json::json!({ "id": id }))
        }

        MeshCommand::LoadScene { id, scene } => {
            let id = new_id(id);
            session
                .load_source(&id, &scene)
                .map(|()| serde_json::json!({ "id": id }))
        }

        MeshCommand::Remove { id } => {
            let removed = session.remove(&id);
            Ok(serde_json::json!({ "removed": removed }))
        }

        MeshCommand::Clear => {
            session.clear();
            return CommandResponse::ok();
        }

        MeshCommand::Inspect => {
            let meshes = session.inspect();
            Ok(serde_json::json!({
                "mesh_count": meshes.len(),
                "meshes": meshes,
            }))
        }

        MeshCommand::Align { ids } => session
            .align(&ids)
            .await
            .map(|transforms| serde_json::json!({ "transformations": transforms })),

        MeshCommand::Deform { id } => session.deform(&id).await.map(|applied| {
            serde_json::json!({ "applied": applied, "version": session.registry().version(&id) })
        }),

        MeshCommand::Clean { id } => session.clean(&id).await.map(|applied| {
            serde_json::json!({ "applied": applied, "version": session.registry().version(&id) })
        }),

        MeshCommand::BakeTransform { id } => session
            .bake_transform(&id)
            .map(|applied| serde_json::json!({ "applied": applied })),

        MeshCommand::Export { id, path } => session
            .export_ply(&id, &path)
            .map(|()| serde_json::json!({ "path": path })),
    };

    match result {
        Ok(data) => CommandResponse::ok_with_data(data),
        Err(e) => {
            tracing::error!("command failed: {e}");
            CommandResponse::err(e.to_string())
        }
    }
}

/// Parse and execute a single JSON command string.
pub async fn execute_json(session: &Session, json: &str) -> Result<CommandResponse, String> {
    let cmd: MeshCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(session, cmd).await)
}

/// Parse and execute multiple JSON commands (array), in order.
pub async fn execute_json_batch(
    session: &Session,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<MeshCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    let mut responses = Vec::with_capacity(cmds.len());
    for cmd in cmds {
        responses.push(execute_command(session, cmd).await);
    }
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppSettings;

    fn session() -> Session {
        // Nothing listens here; remote commands are not exercised in these tests.
        Session::new(AppSettings::with_server_url("http://127.0.0.1:9")).unwrap()
    }

    #[test]
    fn test_command_serde_load() {
        let json = r#"{"command": "load", "id": "a", "paths": ["a.ply", "b.ply"]}"#;
        let cmd: MeshCommand = serde_json::from_str(json).unwrap();
        match cmd {
            MeshCommand::Load { id, paths } => {
                assert_eq!(id.as_deref(), Some("a"));
                assert_eq!(paths.len(), 2);
            }
            _ => panic!("Expected Load"),
        }
    }

    #[test]
    fn test_command_serde_align_default_ids() {
        let cmd: MeshCommand = serde_json::from_str(r#"{"command": "align"}"#).unwrap();
        assert!(matches!(cmd, MeshCommand::Align { ids } if ids.is_empty()));
    }

    #[test]
    fn test_command_serde_bake_transform() {
        let cmd: MeshCommand =
            serde_json::from_str(r#"{"command": "bake_transform", "id": "m"}"#).unwrap();
        assert!(matches!(cmd, MeshCommand::BakeTransform { id } if id == "m"));
    }

    #[tokio::test]
    async fn test_execute_load_scene_and_inspect() {
        let s = session();
        let json = r#"{"command": "load_scene", "id": "m", "scene": {"type": "group", "children": [
            {"type": "leaf", "vertices": [0,0,0, 1,0,0, 0,1,0], "indices": [0,1,2]},
            {"type": "leaf", "vertices": [0,0,1, 1,0,1, 0,1,1]}
        ]}}"#;
        let resp = execute_json(&s, json).await.unwrap();
        assert!(resp.success, "{:?}", resp.error);
        assert_eq!(resp.data.unwrap()["id"], "m");

        let resp = execute_json(&s, r#"{"command": "inspect"}"#).await.unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["mesh_count"], 1);
        assert_eq!(data["meshes"][0]["vertex_count"], 6);
        assert_eq!(data["meshes"][0]["face_count"], 2);
        assert_eq!(data["meshes"][0]["version"], 0);
    }

    #[tokio::test]
    async fn test_execute_load_generates_id() {
        let s = session();
        let json = r#"{"command": "load_scene", "scene": {"type": "leaf", "vertices": [0,0,0, 1,0,0, 0,1,0]}}"#;
        let resp = execute_json(&s, json).await.unwrap();
        let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();
        assert_eq!(s.mesh_ids(), vec![id]);
    }

    #[tokio::test]
    async fn test_execute_failure_is_reported() {
        let s = session();
        let resp = execute_json(&s, r#"{"command": "bake_transform", "id": "ghost"}"#)
            .await
            .unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_execute_remove_and_clear() {
        let s = session();
        s.register("a", crate::fixtures::triangle()).unwrap();
        s.register("b", crate::fixtures::triangle()).unwrap();

        let resp = execute_json(&s, r#"{"command": "remove", "id": "a"}"#).await.unwrap();
        assert_eq!(resp.data.unwrap()["removed"], true);

        let resp = execute_json(&s, r#"{"command": "clear"}"#).await.unwrap();
        assert!(resp.success);
        assert!(s.mesh_ids().is_empty());
    }

    #[tokio::test]
    async fn test_execute_invalid_json() {
        let s = session();
        let result = execute_json(&s, "not valid json").await;
        assert!(result.unwrap_err().contains("Invalid command JSON"));
    }
}
