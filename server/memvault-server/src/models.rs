//! Wire and domain models for memory records

use auth_acl::PermissionLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A memory record owned by an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    pub memory_type: String,
    pub metadata: Map<String, Value>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new memory.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMemoryRequest {
    #[schema(example = "Quarterly planning notes")]
    pub title: String,
    pub content: String,
    #[serde(default = "default_memory_type", rename = "type")]
    #[schema(example = "text")]
    pub memory_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

fn default_memory_type() -> String {
    "text".to_string()
}

/// Request to update a memory. All fields optional; absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateMemoryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: Option<Map<String, Value>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl UpdateMemoryRequest {
    /// True when no field carries a change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.metadata.is_none()
            && self.tags.is_none()
            && self.is_public.is_none()
    }
}

/// Request to search memories.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SearchMemoriesRequest {
    #[schema(example = "planning")]
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    #[serde(rename = "type")]
    pub memory_type: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_include_public")]
    pub include_public: bool,
}

fn default_search_limit() -> u32 {
    10
}

fn default_include_public() -> bool {
    true
}

/// Request to share a memory with a grantee.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShareMemoryRequest {
    pub grantee_id: Uuid,
    #[schema(value_type = String, example = "user")]
    pub grantee_type: auth_acl::GranteeType,
    #[serde(default = "default_share_level")]
    #[schema(value_type = String, example = "viewer")]
    pub permission_level: PermissionLevel,
}

fn default_share_level() -> PermissionLevel {
    PermissionLevel::Viewer
}

/// Memory payload returned to callers, annotated with the caller's
/// effective permission level when known.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemoryResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub memory_type: String,
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "viewer")]
    pub permission_level: Option<PermissionLevel>,
}

impl MemoryResponse {
    pub fn from_memory(memory: Memory, permission_level: Option<PermissionLevel>) -> Self {
        Self {
            id: memory.id,
            organization_id: memory.organization_id,
            title: memory.title,
            content: memory.content,
            memory_type: memory.memory_type,
            metadata: memory.metadata,
            tags: memory.tags,
            is_public: memory.is_public,
            created_by: memory.created_by,
            created_at: memory.created_at,
            updated_at: memory.updated_at,
            permission_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateMemoryRequest =
            serde_json::from_str(r#"{"title": "t", "content": "c"}"#).unwrap();
        assert_eq!(request.memory_type, "text");
        assert!(request.metadata.is_empty());
        assert!(request.tags.is_empty());
        assert!(!request.is_public);
    }

    #[test]
    fn test_share_request_defaults_to_viewer() {
        let request: ShareMemoryRequest = serde_json::from_str(
            r#"{"grantee_id": "7b3d9c68-91f1-4a8e-a5cd-0f83275c9a01", "grantee_type": "user"}"#,
        )
        .unwrap();
        assert_eq!(request.permission_level, PermissionLevel::Viewer);
    }

    #[test]
    fn test_share_request_rejects_unknown_grantee_type() {
        let result = serde_json::from_str::<ShareMemoryRequest>(
            r#"{"grantee_id": "7b3d9c68-91f1-4a8e-a5cd-0f83275c9a01", "grantee_type": "robot"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateMemoryRequest::default().is_empty());
        let request = UpdateMemoryRequest {
            title: Some("new".to_string()),
            ..Default::default()
        };
        assert!(!request.is_empty());
    }

    #[test]
    fn test_memory_type_uses_wire_name() {
        let request: SearchMemoriesRequest =
            serde_json::from_str(r#"{"query": "q", "type": "note"}"#).unwrap();
        assert_eq!(request.memory_type.as_deref(), Some("note"));
        assert!(request.include_public);
        assert_eq!(request.limit, 10);
    }
}
