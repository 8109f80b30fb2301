//! OpenAPI Specification for TaskHub API
//!
//! This module defines the OpenAPI document for the TaskHub REST API.
//! It uses utoipa to generate the OpenAPI specification from Rust types
//! and route annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::types::{
    ChatbotQueryRequest, ChatbotResult, ContextSnapshot, CreateCommentRequest, CreateTaskRequest,
    ResponseKind, UpdateCommentRequest, UpdateTaskRequest,
};

// Import route modules for path references
use crate::routes::{chatbot, comment, task};

// Import domain types from taskhub-core
use taskhub_core::{Comment, Task, TaskBrief, TaskStatus};

/// OpenAPI document for the TaskHub API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskHub API",
        version = "0.1.0",
        description = "Task management backend with an LLM-assisted chatbot",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Tasks", description = "Task CRUD scoped to an account"),
        (name = "Comments", description = "Comments attached to tasks"),
        (name = "Chatbot", description = "Natural-language queries over an account's tasks")
    ),
    paths(
        // === Task Routes ===
        task::create_task,
        task::list_tasks,
        task::get_task,
        task::update_task,
        task::delete_task,

        // === Comment Routes ===
        comment::create_comment,
        comment::list_comments,
        comment::update_comment,
        comment::delete_comment,

        // === Chatbot Routes ===
        chatbot::query,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Task Types ===
            CreateTaskRequest, UpdateTaskRequest,

            // === Comment Types ===
            CreateCommentRequest, UpdateCommentRequest,

            // === Chatbot Types ===
            ChatbotQueryRequest, ChatbotResult, ResponseKind, ContextSnapshot,

            // === Core Domain Types (from taskhub-core) ===
            Task, TaskBrief, TaskStatus, Comment
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Bearer token authentication (JWT)
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "TaskHub API");
        assert_eq!(openapi.info.version, "0.1.0");

        let components = openapi.components.as_ref().unwrap();
        assert!(components.schemas.contains_key("Task"));
        assert!(components.schemas.contains_key("ChatbotResult"));
        assert!(components
            .security_schemes
            .contains_key("bearer_auth"));
    }

    #[test]
    fn test_openapi_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        assert!(paths.contains_key("/accounts/{account_id}/tasks"));
        assert!(paths.contains_key("/accounts/{account_id}/tasks/{task_id}"));
        assert!(paths
            .contains_key("/accounts/{account_id}/tasks/{task_id}/comments/{comment_id}"));
        assert!(paths.contains_key("/chatbot/query"));
    }

    #[test]
    fn test_openapi_path_parameters_are_uuids() {
        // Path extractors in the annotated handlers must resolve to
        // concrete Uuid parameters in the generated document.
        let json = ApiDoc::to_json().unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

        let params = doc["paths"]["/accounts/{account_id}/tasks/{task_id}"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"account_id"));
        assert!(names.contains(&"task_id"));
        for p in params {
            assert_eq!(p["schema"]["format"].as_str(), Some("uuid"));
        }
    }

    #[test]
    fn test_openapi_json_serializes() {
        let json = ApiDoc::to_json().unwrap();
        assert!(json.contains("\"openapi\""));
        assert!(json.contains("TaskHub API"));
    }
}
