//! Integration tests for MCP protocol handling
//!
//! Feeds newline-delimited JSON-RPC sessions through the stdio loop and
//! checks the responses written back.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::BufReader;

use controvlearn::config::{Config, DatabaseConfig, LearningConfig, LoggingConfig};
use controvlearn::storage::MemoryStorage;
use controvlearn::{AppState, McpServer};

fn create_server() -> McpServer {
    let config = Config {
        database: DatabaseConfig {
            path: PathBuf::from(":memory:"),
            max_connections: 1,
        },
        logging: LoggingConfig::default(),
        learning: LearningConfig {
            simulated_latency_ms: 0,
            redirect_delay_ms: 2000,
            dialogue_reply_delay_ms: 0,
        },
    };
    let state = AppState::new(config, Arc::new(MemoryStorage::new()));
    McpServer::new(Arc::new(state))
}

/// Run one session and return every response line, parsed.
async fn run_session(server: &McpServer, lines: &[String]) -> Vec<Value> {
    let mut input = lines.join("\n");
    input.push('\n');

    let mut output: Vec<u8> = Vec::new();
    server
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .expect("session failed");

    String::from_utf8(output)
        .expect("responses are utf-8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("Failed to parse JSON-RPC response"))
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}

/// Decode the JSON payload a tool result carries in its text content.
fn payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("tool result has text content");
    serde_json::from_str(text).expect("tool text is JSON")
}

/// Verify JSON-RPC 2.0 response structure
fn assert_valid_jsonrpc_response(response: &Value) {
    assert_eq!(response["jsonrpc"], "2.0", "Invalid JSON-RPC version");
    assert!(
        response.get("result").is_some() || response.get("error").is_some(),
        "Response must have result or error"
    );
}

#[cfg(test)]
mod initialize_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_handshake() {
        let server = create_server();
        let lines = vec![
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "1.0.0" }
                }
            })
            .to_string(),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
        ];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses.len(), 1);

        let response = &responses[0];
        assert_valid_jsonrpc_response(response);
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "controvlearn");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }
}

#[cfg(test)]
mod tools_list_tests {
    use super::*;

    #[tokio::test]
    async fn test_tools_list_response_structure() {
        let server = create_server();
        let lines = vec![json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }).to_string()];

        let responses = run_session(&server, &lines).await;
        let tools = responses[0]["result"]["tools"]
            .as_array()
            .expect("tools array");
        assert_eq!(tools.len(), 35);

        for tool in tools {
            assert!(tool["name"].is_string());
            assert!(tool["description"].is_string());
            assert_eq!(tool["inputSchema"]["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_claim_add_schema() {
        let server = create_server();
        let lines = vec![json!({ "jsonrpc": "2.0", "id": 3, "method": "tools/list" }).to_string()];

        let responses = run_session(&server, &lines).await;
        let claim_add = responses[0]["result"]["tools"]
            .as_array()
            .and_then(|tools| tools.iter().find(|t| t["name"] == "claim_add"))
            .expect("claim_add tool listed");

        let schema = &claim_add["inputSchema"];
        let required = schema["required"].as_array().expect("required list");
        assert!(required.contains(&json!("topic_id")));
        assert!(required.contains(&json!("sentence_id")));
        assert!(required.contains(&json!("stance")));
    }
}

#[cfg(test)]
mod tools_call_tests {
    use super::*;

    #[tokio::test]
    async fn test_annotation_session() {
        let server = create_server();
        let lines = vec![
            call(1, "claim_add", json!({ "topic_id": "1", "sentence_id": "s1", "stance": "pro" })),
            call(
                2,
                "evidence_add",
                json!({ "topic_id": "1", "sentence_id": "s1", "claim_id": "C1", "evidence_type": "data" }),
            ),
            call(3, "argument_map", json!({ "topic_id": "1", "as_text": true })),
        ];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses.len(), 3);
        for (i, response) in responses.iter().enumerate() {
            assert_valid_jsonrpc_response(response);
            assert_eq!(response["id"], (i + 1) as u64);
            assert!(response["result"].get("isError").is_none());
        }

        assert_eq!(payload(&responses[0])["id"], "C1");
        assert_eq!(payload(&responses[1])["id"], "E1");

        let map = payload(&responses[2]);
        assert_eq!(map["diagnosis"]["kind"], "one_sided");
        assert!(map["text"]
            .as_str()
            .unwrap()
            .starts_with("支持方：主张：1 条 · 证据：1 条"));
    }

    #[tokio::test]
    async fn test_learning_error_is_tool_error() {
        let server = create_server();
        let lines = vec![call(1, "step_enter", json!({ "topic_id": "1", "step": 5 }))];

        let responses = run_session(&server, &lines).await;
        let result = &responses[0]["result"];
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("请先完成前一步"));
    }

    #[tokio::test]
    async fn test_unknown_tool_error() {
        let server = create_server();
        let lines = vec![call(1, "nonexistent_tool", json!({}))];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses[0]["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_state_persists_across_sessions() {
        let server = create_server();
        run_session(
            &server,
            &[call(1, "step_enter", json!({ "topic_id": "2", "step": 1 }))],
        )
        .await;

        let responses = run_session(&server, &[call(2, "last_visited", json!({}))]).await;
        let page = payload(&responses[0]);
        assert_eq!(page["topicId"], "2");
        assert_eq!(page["stepId"], 1);
    }
}

#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_error_response() {
        let server = create_server();
        let responses = run_session(&server, &["{not json".to_string()]).await;

        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
    }

    #[tokio::test]
    async fn test_method_not_found_error() {
        let server = create_server();
        let lines = vec![json!({ "jsonrpc": "2.0", "id": 9, "method": "resources/list" }).to_string()];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses[0]["error"]["code"], -32601);
        assert_eq!(responses[0]["id"], 9);
    }

    #[tokio::test]
    async fn test_invalid_params_error() {
        let server = create_server();
        let lines = vec![json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call" }).to_string()];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses[0]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_session_continues_after_error() {
        let server = create_server();
        let lines = vec![
            "garbage".to_string(),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "ping" }).to_string(),
        ];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1]["id"], 2);
        assert!(responses[1]["result"].is_object());
    }
}

#[cfg(test)]
mod jsonrpc_compliance_tests {
    use super::*;

    #[tokio::test]
    async fn test_notification_no_response() {
        let server = create_server();
        let lines = vec![
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
            String::new(),
            json!({ "jsonrpc": "2.0", "method": "notifications/cancelled", "params": {} })
                .to_string(),
        ];

        let responses = run_session(&server, &lines).await;
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_string_id_support() {
        let server = create_server();
        let lines =
            vec![json!({ "jsonrpc": "2.0", "id": "request-abc", "method": "ping" }).to_string()];

        let responses = run_session(&server, &lines).await;
        assert_eq!(responses[0]["id"], "request-abc");
    }
}
