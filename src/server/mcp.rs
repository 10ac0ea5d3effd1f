//! MCP protocol implementation for JSON-RPC 2.0 communication.
//!
//! This module provides the core MCP server implementation including:
//! - JSON-RPC 2.0 request/response handling
//! - Tool definitions and schemas
//! - Stdio-based server communication

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::{handle_tool_call, SharedState};

#[cfg(test)]
#[path = "mcp_tests.rs"]
mod mcp_tests;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "controvlearn";

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request identifier (None for notifications).
    pub id: Option<Value>,
    /// The method name to invoke.
    pub method: String,
    /// Optional parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Request identifier (null if notification, must always be present per spec).
    pub id: Value,
    /// The result on success (mutually exclusive with error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error on failure (mutually exclusive with result).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code (negative for predefined errors).
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP server information returned during initialization.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// The server name identifier.
    pub name: String,
    /// The server version string.
    pub version: String,
}

/// MCP server capabilities advertised to clients.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
#[derive(Debug, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change dynamically.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Result of the MCP initialize handshake.
#[derive(Debug, Serialize)]
pub struct InitializeResult {
    /// The MCP protocol version supported.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: Capabilities,
    /// Server identification information.
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// MCP tool definition with JSON Schema.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    /// Unique tool name (used in tool calls).
    pub name: String,
    /// Human-readable description of the tool.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for a tools/call request.
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// The name of the tool to invoke.
    pub name: String,
    /// Optional arguments for the tool.
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Content item within a tool result.
#[derive(Debug, Serialize)]
pub struct ToolResultContent {
    /// The content type (e.g., "text").
    #[serde(rename = "type")]
    pub content_type: String,
    /// The text content of the result.
    pub text: String,
}

/// Result of a tool invocation.
#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    /// The result content items.
    pub content: Vec<ToolResultContent>,
    /// Whether the result represents an error.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server running over stdio.
///
/// Handles JSON-RPC 2.0 messages over stdin/stdout for MCP protocol
/// communication with clients.
pub struct McpServer {
    /// Shared application state.
    state: SharedState,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Run the server using async stdio
    pub async fn run(&self) -> std::io::Result<()> {
        info!("ControvLearn MCP server starting...");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited requests from `reader`, writing responses to `writer`.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            // EOF reached
            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!(request = %trimmed, "Received request");

            // Only send response if not a notification (per JSON-RPC 2.0 spec)
            if let Some(response) = self.handle_line(trimmed).await {
                let response_json = serde_json::to_string(&response)?;
                debug!(response = %response_json, "Sending response");

                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Parse and dispatch one raw request line.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                error!(error = %e, "Failed to parse request");
                Some(JsonRpcResponse::error(
                    None,
                    -32700,
                    format!("Parse error: {}", e),
                ))
            }
        }
    }

    /// Handle a single JSON-RPC request
    /// Returns None for notifications (requests without id) per JSON-RPC 2.0 spec
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        // Check if this is a notification (no id = no response required)
        let is_notification = request.id.is_none();

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(request.id)),
            "initialized" | "notifications/initialized" => {
                debug!("Received initialized notification");
                None
            }
            "notifications/cancelled" => {
                debug!("Received cancelled notification");
                None
            }
            "tools/list" => Some(self.handle_tools_list(request.id)),
            "tools/call" => Some(self.handle_tool_call(request.id, request.params).await),
            "ping" => Some(JsonRpcResponse::success(
                request.id,
                Value::Object(Default::default()),
            )),
            method => {
                // For unknown methods, only respond if it's a request (has id)
                if is_notification {
                    debug!(method = %method, "Unknown notification, ignoring");
                    None
                } else {
                    error!(method = %method, "Unknown method");
                    Some(JsonRpcResponse::error(
                        request.id,
                        -32601,
                        format!("Method not found: {}", method),
                    ))
                }
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Handling initialize request");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: Capabilities {
                tools: ToolCapabilities {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                error!(error = %e, "Failed to serialize initialize result");
                JsonRpcResponse::error(id, -32603, format!("Internal error: {}", e))
            }
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Handling tools/list request");

        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "tools": all_tools()
            }),
        )
    }

    /// Handle tools/call request
    async fn handle_tool_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, format!("Invalid params: {}", e));
                }
            },
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing params");
            }
        };

        info!(tool = %params.name, "Handling tool call");

        let (content, is_error) =
            match handle_tool_call(&self.state, &params.name, params.arguments).await {
                Ok(result) => {
                    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                        error!(error = %e, "Failed to serialize tool result");
                        format!("{{\"error\": \"Serialization failed: {}\"}}", e)
                    });
                    (
                        ToolResultContent {
                            content_type: "text".to_string(),
                            text,
                        },
                        None,
                    )
                }
                Err(e) => (
                    ToolResultContent {
                        content_type: "text".to_string(),
                        text: format!("Error: {}", e),
                    },
                    Some(true),
                ),
            };

        let tool_result = ToolCallResult {
            content: vec![content],
            is_error,
        };

        match serde_json::to_value(tool_result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                error!(error = %e, "Failed to serialize tool call result");
                JsonRpcResponse::error(id.clone(), -32603, format!("Internal error: {}", e))
            }
        }
    }
}

/// Every tool the server exposes, grouped by workflow area.
pub fn all_tools() -> Vec<Tool> {
    vec![
        // Topic catalog
        get_topic_list_tool(),
        get_topic_get_tool(),
        get_topic_generate_tool(),
        get_topic_add_generated_tool(),
        get_topic_delete_tool(),
        get_learning_stats_tool(),
        // Step workflow
        get_step_enter_tool(),
        get_step_status_tool(),
        get_route_resolve_tool(),
        get_last_visited_tool(),
        get_content_get_tool(),
        // Argument analysis
        get_claim_add_tool(),
        get_claim_remove_tool(),
        get_evidence_add_tool(),
        get_evidence_remove_tool(),
        get_bridge_add_tool(),
        get_annotations_clear_tool(),
        get_argument_map_tool(),
        // Initial intuition
        get_intuition_save_tool(),
        get_intuition_get_tool(),
        get_stance_label_tool(),
        // Perspective puzzle
        get_perspective_place_tool(),
        get_perspective_unplace_tool(),
        get_perspective_toggle_tag_tool(),
        get_perspective_reset_tool(),
        get_perspective_get_tool(),
        // Dialogue simulation
        get_dialogue_start_tool(),
        get_dialogue_send_tool(),
        get_dialogue_feedback_tool(),
        get_dialogue_save_tool(),
        // Reflection and review
        get_reflection_save_tool(),
        get_reflection_get_tool(),
        get_review_draft_tool(),
        get_review_save_tool(),
        get_topic_complete_tool(),
    ]
}

/// Schema fragment for the `topic_id` argument shared by most tools.
fn topic_id_property() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "Topic id, e.g. \"1\""
    })
}

/// Schema for a tool whose only argument is the topic id.
fn topic_only_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "topic_id": topic_id_property()
        },
        "required": ["topic_id"],
        "additionalProperties": false
    })
}

fn empty_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

// ============================================================================
// Topic catalog
// ============================================================================

fn get_topic_list_tool() -> Tool {
    Tool {
        name: "topic_list".to_string(),
        description: "List the controversy topics in catalog order. Optionally filter by difficulty (入门 or 进阶).".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "difficulty": {
                    "type": "string",
                    "enum": ["入门", "进阶"],
                    "description": "Only return topics of this difficulty"
                }
            },
            "additionalProperties": false
        }),
    }
}

fn get_topic_get_tool() -> Tool {
    Tool {
        name: "topic_get".to_string(),
        description: "Get one topic. Unknown ids fail with a notice and the redirect delay.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_topic_generate_tool() -> Tool {
    Tool {
        name: "topic_generate".to_string(),
        description: "Generate a topic draft for an interest area. The draft is not added to the catalog.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "interest": {
                    "type": "string",
                    "description": "Interest area, e.g. 医学伦理"
                },
                "difficulty": {
                    "type": "string",
                    "enum": ["入门", "进阶"],
                    "description": "Difficulty of the generated topic (default 入门)"
                }
            },
            "required": ["interest"],
            "additionalProperties": false
        }),
    }
}

fn get_topic_add_generated_tool() -> Tool {
    Tool {
        name: "topic_add_generated".to_string(),
        description: "Add a generated draft to the front of the catalog. Returns the updated topic list.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "description": { "type": "string" },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "difficulty": {
                    "type": "string",
                    "enum": ["入门", "进阶"]
                },
                "duration": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Estimated duration in minutes"
                }
            },
            "required": ["title", "description", "tags", "difficulty", "duration"],
            "additionalProperties": false
        }),
    }
}

fn get_topic_delete_tool() -> Tool {
    Tool {
        name: "topic_delete".to_string(),
        description: "Delete a generated topic and all of its stored learning data. Built-in topics cannot be deleted.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_learning_stats_tool() -> Tool {
    Tool {
        name: "learning_stats".to_string(),
        description: "Statistics card: goal, completed, participated and in-progress topic counts with the completion percentage.".to_string(),
        input_schema: empty_schema(),
    }
}

// ============================================================================
// Step workflow
// ============================================================================

fn get_step_enter_tool() -> Tool {
    Tool {
        name: "step_enter".to_string(),
        description: "Open step 1-8 of a topic. Fails with StepLocked unless the previous step is complete; otherwise marks steps 1-7 complete and records the last visited page.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "step": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 8,
                    "description": "Step number"
                }
            },
            "required": ["topic_id", "step"],
            "additionalProperties": false
        }),
    }
}

fn get_step_status_tool() -> Tool {
    Tool {
        name: "step_status".to_string(),
        description: "Completion and unlock state of all eight steps for a topic.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_route_resolve_tool() -> Tool {
    Tool {
        name: "route_resolve".to_string(),
        description: "Parse an application path such as /topic/1/argument-analysis into a typed route, reporting whether the step is reachable.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Application path"
                }
            },
            "required": ["path"],
            "additionalProperties": false
        }),
    }
}

fn get_last_visited_tool() -> Tool {
    Tool {
        name: "last_visited".to_string(),
        description: "The learning page most recently opened, if any.".to_string(),
        input_schema: empty_schema(),
    }
}

fn get_content_get_tool() -> Tool {
    Tool {
        name: "content_get".to_string(),
        description: "Static material for a topic: background reading, guiding questions, viewpoint passages, perspective roles, role tags and step list.".to_string(),
        input_schema: topic_only_schema(),
    }
}

// ============================================================================
// Argument analysis
// ============================================================================

fn get_claim_add_tool() -> Tool {
    Tool {
        name: "claim_add".to_string(),
        description: "Annotate a viewpoint sentence as a claim with a stance. Ids are assigned as C1, C2, ...".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "sentence_id": {
                    "type": "string",
                    "description": "Sentence id from content_get, e.g. s1"
                },
                "stance": {
                    "type": "string",
                    "enum": ["pro", "con", "conditional", "neutral"]
                }
            },
            "required": ["topic_id", "sentence_id", "stance"],
            "additionalProperties": false
        }),
    }
}

fn get_claim_remove_tool() -> Tool {
    Tool {
        name: "claim_remove".to_string(),
        description: "Remove a claim together with its evidence and reasoning bridges.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "claim_id": { "type": "string" }
            },
            "required": ["topic_id", "claim_id"],
            "additionalProperties": false
        }),
    }
}

fn get_evidence_add_tool() -> Tool {
    Tool {
        name: "evidence_add".to_string(),
        description: "Annotate a viewpoint sentence as evidence for an existing claim. Ids are assigned as E1, E2, ...".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "sentence_id": { "type": "string" },
                "claim_id": { "type": "string" },
                "evidence_type": {
                    "type": "string",
                    "enum": ["data", "expert", "experience", "analogy", "other"]
                }
            },
            "required": ["topic_id", "sentence_id", "claim_id", "evidence_type"],
            "additionalProperties": false
        }),
    }
}

fn get_evidence_remove_tool() -> Tool {
    Tool {
        name: "evidence_remove".to_string(),
        description: "Remove an evidence together with its reasoning bridges.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "evidence_id": { "type": "string" }
            },
            "required": ["topic_id", "evidence_id"],
            "additionalProperties": false
        }),
    }
}

fn get_bridge_add_tool() -> Tool {
    Tool {
        name: "bridge_add".to_string(),
        description: "Explain why an evidence supports its claim. Writing a bridge for the same pair again replaces the text.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "claim_id": { "type": "string" },
                "evidence_id": { "type": "string" },
                "text": {
                    "type": "string",
                    "description": "Reasoning bridge text"
                }
            },
            "required": ["topic_id", "claim_id", "evidence_id", "text"],
            "additionalProperties": false
        }),
    }
}

fn get_annotations_clear_tool() -> Tool {
    Tool {
        name: "annotations_clear".to_string(),
        description: "Remove every claim, evidence and bridge of a topic and hide the argument map.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_argument_map_tool() -> Tool {
    Tool {
        name: "argument_map".to_string(),
        description: "Build the argument map: ordered records, stance groups, per-stance summaries, bridge coverage, a diagnosis, the annotation phase prompts and a combined explanation per record. Optionally set the panel visibility and include a plain-text rendering.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "show": {
                    "type": "boolean",
                    "description": "Set the argument map panel visibility"
                },
                "as_text": {
                    "type": "boolean",
                    "description": "Also return the map rendered as copyable text"
                }
            },
            "required": ["topic_id"],
            "additionalProperties": false
        }),
    }
}

// ============================================================================
// Initial intuition
// ============================================================================

fn get_intuition_save_tool() -> Tool {
    Tool {
        name: "intuition_save".to_string(),
        description: "Record the first reaction to a topic: a 0-100 slider value or \"undecided\", with an optional note.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "value": {
                    "oneOf": [
                        { "type": "integer", "minimum": 0, "maximum": 100 },
                        { "type": "string", "enum": ["undecided"] }
                    ]
                },
                "note": { "type": "string" }
            },
            "required": ["topic_id", "value"],
            "additionalProperties": false
        }),
    }
}

fn get_intuition_get_tool() -> Tool {
    Tool {
        name: "intuition_get".to_string(),
        description: "The recorded intuition of a topic, or the default slider state (50).".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_stance_label_tool() -> Tool {
    Tool {
        name: "stance_label".to_string(),
        description: "Map a stance value to its six-bin label and the intuition description.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "value": {
                    "oneOf": [
                        { "type": "integer", "minimum": 0, "maximum": 100 },
                        { "type": "string", "enum": ["undecided"] }
                    ]
                }
            },
            "required": ["value"],
            "additionalProperties": false
        }),
    }
}

// ============================================================================
// Perspective puzzle
// ============================================================================

fn get_perspective_place_tool() -> Tool {
    Tool {
        name: "perspective_place".to_string(),
        description: "Place a stakeholder role on the risk spectrum. A placed role is moved.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "role_id": { "type": "string" },
                "position": {
                    "type": "string",
                    "enum": ["left", "left-center", "center", "right-center", "right"]
                }
            },
            "required": ["topic_id", "role_id", "position"],
            "additionalProperties": false
        }),
    }
}

fn get_perspective_unplace_tool() -> Tool {
    Tool {
        name: "perspective_unplace".to_string(),
        description: "Return a role to the unplaced pool. Its tags are kept.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "role_id": { "type": "string" }
            },
            "required": ["topic_id", "role_id"],
            "additionalProperties": false
        }),
    }
}

fn get_perspective_toggle_tag_tool() -> Tool {
    Tool {
        name: "perspective_toggle_tag".to_string(),
        description: "Toggle a concern or information-source tag on a role.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "role_id": { "type": "string" },
                "tag_id": {
                    "type": "string",
                    "enum": ["economic", "environment", "health", "technology", "official", "scientific", "experience", "media"]
                }
            },
            "required": ["topic_id", "role_id", "tag_id"],
            "additionalProperties": false
        }),
    }
}

fn get_perspective_reset_tool() -> Tool {
    Tool {
        name: "perspective_reset".to_string(),
        description: "Clear every placement and tag of a topic.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_perspective_get_tool() -> Tool {
    Tool {
        name: "perspective_get".to_string(),
        description: "The perspective board: five slots with their roles and the unplaced pool.".to_string(),
        input_schema: topic_only_schema(),
    }
}

// ============================================================================
// Dialogue simulation
// ============================================================================

fn get_dialogue_start_tool() -> Tool {
    Tool {
        name: "dialogue_start".to_string(),
        description: "Start a three-round dialogue with a scripted partner. The partner opens with a statement for its role.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "user_role": {
                    "type": "string",
                    "enum": ["student", "fisher", "company", "gov", "ngo", "scientist"],
                    "description": "Learner role (default student)"
                },
                "system_role": {
                    "type": "string",
                    "enum": ["student", "fisher", "company", "gov", "ngo", "scientist"],
                    "description": "Partner role (default fisher)"
                },
                "user_opinion": { "type": "string" },
                "system_opinion": {
                    "type": "string",
                    "description": "Custom opening for the partner"
                }
            },
            "required": ["topic_id"],
            "additionalProperties": false
        }),
    }
}

fn get_dialogue_send_tool() -> Tool {
    Tool {
        name: "dialogue_send".to_string(),
        description: "Send a learner message. Cite evidence as [E1]. Rounds 1 and 2 get a scripted reply; the third message ends the dialogue.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "text": { "type": "string" }
            },
            "required": ["topic_id", "text"],
            "additionalProperties": false
        }),
    }
}

fn get_dialogue_feedback_tool() -> Tool {
    Tool {
        name: "dialogue_feedback".to_string(),
        description: "Hints on the learner's latest message: missing connectives, missing evidence, or a partner on the same side.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn get_dialogue_save_tool() -> Tool {
    Tool {
        name: "dialogue_save".to_string(),
        description: "Persist the dialogue transcript of a topic.".to_string(),
        input_schema: topic_only_schema(),
    }
}

// ============================================================================
// Reflection and review
// ============================================================================

fn get_reflection_save_tool() -> Tool {
    Tool {
        name: "reflection_save".to_string(),
        description: "Save the metacognitive reflection: a highlighted evidence, four open answers and five 1-5 self-evaluation ratings.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "topic_id": topic_id_property(),
                "highlight_evidence_id": {
                    "type": "string",
                    "description": "An annotated evidence id, e.g. E1"
                },
                "highlight_evidence_comment": { "type": "string" },
                "reflection": {
                    "type": "object",
                    "properties": {
                        "q1IdentityPerspective": { "type": "string" },
                        "q2InitialBasis": { "type": "string" },
                        "q3StanceChange": { "type": "string" },
                        "q4RemainingQuestions": { "type": "string" }
                    }
                },
                "self_eval": {
                    "type": "object",
                    "properties": {
                        "q1": { "type": "number" },
                        "q2": { "type": "number" },
                        "q3": { "type": "number" },
                        "q4": { "type": "number" },
                        "q5": { "type": "number" }
                    },
                    "description": "Ratings are clamped to 1-5; missing ones default to 3"
                }
            },
            "required": ["topic_id"],
            "additionalProperties": false
        }),
    }
}

fn get_reflection_get_tool() -> Tool {
    Tool {
        name: "reflection_get".to_string(),
        description: "The stored reflection with a recap of the earlier steps and the prompt texts.".to_string(),
        input_schema: topic_only_schema(),
    }
}

fn review_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "topic_id": topic_id_property(),
            "final_value": {
                "type": "integer",
                "minimum": 0,
                "maximum": 100,
                "description": "Final stance value"
            },
            "final_comment": { "type": "string" },
            "summary_text": {
                "type": "string",
                "description": "Edited summary; empty uses the generated draft"
            }
        },
        "required": ["topic_id"],
        "additionalProperties": false
    })
}

fn get_review_draft_tool() -> Tool {
    Tool {
        name: "review_draft".to_string(),
        description: "Preview the stance review: initial and final stance, trajectory and a five-paragraph summary draft. Starts from a neutral initial stance when nothing was recorded.".to_string(),
        input_schema: review_schema(),
    }
}

fn get_review_save_tool() -> Tool {
    Tool {
        name: "review_save".to_string(),
        description: "Save the stance review.".to_string(),
        input_schema: review_schema(),
    }
}

fn get_topic_complete_tool() -> Tool {
    Tool {
        name: "topic_complete".to_string(),
        description: "Save the stance review and complete step 8. Requires step 7 to be complete.".to_string(),
        input_schema: review_schema(),
    }
}
