use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::SharedState;
use crate::argument::{render_text, EvidenceType, Stance};
use crate::catalog::{Difficulty, TopicCatalog, TopicDraft};
use crate::content::TopicMaterial;
use crate::dialogue::{DialogueSetup, SAVED_NOTICE};
use crate::error::{AppResult, McpError, McpResult};
use crate::intuition::{intuition_description, stance_label, IntuitionValue};
use crate::perspective::Position;
use crate::progress::{Route, StepInfo};
use crate::reflection::{
    ReflectionAnswers, ReflectionInput, ReviewInput, SelfEvaluation, REFLECTION_SAVED_NOTICE,
    REVIEW_SAVED_NOTICE,
};

/// Route tool calls to appropriate handlers
pub async fn handle_tool_call(
    state: &SharedState,
    tool_name: &str,
    arguments: Option<Value>,
) -> McpResult<Value> {
    info!(tool = %tool_name, "Routing tool call");

    match tool_name {
        // Topic catalog
        "topic_list" => handle_topic_list(state, arguments).await,
        "topic_get" => handle_topic_get(state, arguments).await,
        "topic_generate" => handle_topic_generate(state, arguments).await,
        "topic_add_generated" => handle_topic_add_generated(state, arguments).await,
        "topic_delete" => handle_topic_delete(state, arguments).await,
        "learning_stats" => handle_learning_stats(state).await,
        // Step workflow
        "step_enter" => handle_step_enter(state, arguments).await,
        "step_status" => handle_step_status(state, arguments).await,
        "route_resolve" => handle_route_resolve(state, arguments).await,
        "last_visited" => handle_last_visited(state).await,
        "content_get" => handle_content_get(state, arguments).await,
        // Argument analysis
        "claim_add" => handle_claim_add(state, arguments).await,
        "claim_remove" => handle_claim_remove(state, arguments).await,
        "evidence_add" => handle_evidence_add(state, arguments).await,
        "evidence_remove" => handle_evidence_remove(state, arguments).await,
        "bridge_add" => handle_bridge_add(state, arguments).await,
        "annotations_clear" => handle_annotations_clear(state, arguments).await,
        "argument_map" => handle_argument_map(state, arguments).await,
        // Initial intuition
        "intuition_save" => handle_intuition_save(state, arguments).await,
        "intuition_get" => handle_intuition_get(state, arguments).await,
        "stance_label" => handle_stance_label(arguments),
        // Perspective puzzle
        "perspective_place" => handle_perspective_place(state, arguments).await,
        "perspective_unplace" => handle_perspective_unplace(state, arguments).await,
        "perspective_toggle_tag" => handle_perspective_toggle_tag(state, arguments).await,
        "perspective_reset" => handle_perspective_reset(state, arguments).await,
        "perspective_get" => handle_perspective_get(state, arguments).await,
        // Dialogue simulation
        "dialogue_start" => handle_dialogue_start(state, arguments).await,
        "dialogue_send" => handle_dialogue_send(state, arguments).await,
        "dialogue_feedback" => handle_dialogue_feedback(state, arguments).await,
        "dialogue_save" => handle_dialogue_save(state, arguments).await,
        // Reflection and review
        "reflection_save" => handle_reflection_save(state, arguments).await,
        "reflection_get" => handle_reflection_get(state, arguments).await,
        "review_draft" => handle_review_draft(state, arguments).await,
        "review_save" => handle_review_save(state, arguments).await,
        "topic_complete" => handle_topic_complete(state, arguments).await,
        _ => Err(McpError::UnknownTool {
            tool_name: tool_name.to_string(),
        }),
    }
}

// ============================================================================
// Parameter types
// ============================================================================

/// Arguments of every tool that only needs a topic.
#[derive(Debug, Deserialize)]
pub struct TopicParams {
    pub topic_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicListParams {
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct TopicGenerateParams {
    pub interest: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Deserialize)]
pub struct StepEnterParams {
    pub topic_id: String,
    pub step: u8,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ClaimAddParams {
    pub topic_id: String,
    pub sentence_id: String,
    pub stance: Stance,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRemoveParams {
    pub topic_id: String,
    pub claim_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EvidenceAddParams {
    pub topic_id: String,
    pub sentence_id: String,
    pub claim_id: String,
    pub evidence_type: EvidenceType,
}

#[derive(Debug, Deserialize)]
pub struct EvidenceRemoveParams {
    pub topic_id: String,
    pub evidence_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BridgeAddParams {
    pub topic_id: String,
    pub claim_id: String,
    pub evidence_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ArgumentMapParams {
    pub topic_id: String,
    #[serde(default)]
    pub show: Option<bool>,
    #[serde(default)]
    pub as_text: bool,
}

#[derive(Debug, Deserialize)]
pub struct IntuitionSaveParams {
    pub topic_id: String,
    pub value: IntuitionValue,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct StanceLabelParams {
    pub value: IntuitionValue,
}

#[derive(Debug, Deserialize)]
pub struct PlaceParams {
    pub topic_id: String,
    pub role_id: String,
    pub position: Position,
}

#[derive(Debug, Deserialize)]
pub struct RoleParams {
    pub topic_id: String,
    pub role_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleTagParams {
    pub topic_id: String,
    pub role_id: String,
    pub tag_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DialogueStartParams {
    pub topic_id: String,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub system_role: Option<String>,
    #[serde(default)]
    pub user_opinion: String,
    #[serde(default)]
    pub system_opinion: String,
}

#[derive(Debug, Deserialize)]
pub struct DialogueSendParams {
    pub topic_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReflectionSaveParams {
    pub topic_id: String,
    #[serde(default)]
    pub highlight_evidence_id: Option<String>,
    #[serde(default)]
    pub highlight_evidence_comment: String,
    #[serde(default)]
    pub reflection: ReflectionAnswers,
    #[serde(default)]
    pub self_eval: SelfEvaluation,
}

#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    pub topic_id: String,
    #[serde(default)]
    pub final_value: Option<u8>,
    #[serde(default)]
    pub final_comment: Option<String>,
    #[serde(default)]
    pub summary_text: Option<String>,
}

impl ReviewParams {
    fn into_parts(self) -> (String, ReviewInput) {
        (
            self.topic_id,
            ReviewInput {
                final_value: self.final_value,
                final_comment: self.final_comment,
                summary_text: self.summary_text,
            },
        )
    }
}

// ============================================================================
// Response types
// ============================================================================

/// A parsed path and whether a learner may open it now.
#[derive(Debug, Serialize)]
pub struct RouteResolution {
    pub kind: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_exists: Option<bool>,
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
pub struct StanceLabelResult {
    pub value: IntuitionValue,
    pub label: &'static str,
    pub description: &'static str,
}

/// A saved record with the notice shown to the learner.
#[derive(Debug, Serialize)]
pub struct Saved<T: Serialize> {
    pub notice: &'static str,
    #[serde(flatten)]
    pub data: T,
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    arguments: Option<Value>,
) -> McpResult<T> {
    match arguments {
        Some(args) => serde_json::from_value(args).map_err(|e| McpError::InvalidParameters {
            tool_name: tool_name.to_string(),
            message: e.to_string(),
        }),
        None => Err(McpError::InvalidParameters {
            tool_name: tool_name.to_string(),
            message: "Missing arguments".to_string(),
        }),
    }
}

/// Generic handler that runs a service operation with consistent error handling.
///
/// Parses the typed parameters, converts the service error into an
/// `McpError` (learning errors keep their learner notice) and serializes
/// the result.
async fn execute_handler<P, R, E, F, Fut>(
    tool_name: &str,
    arguments: Option<Value>,
    operation: F,
) -> McpResult<Value>
where
    P: serde::de::DeserializeOwned,
    R: Serialize,
    E: Into<McpError>,
    F: FnOnce(P) -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
{
    let params: P = parse_arguments(tool_name, arguments)?;

    let result = match operation(params).await {
        Ok(result) => result,
        Err(e) => return Err(e.into()),
    };

    serde_json::to_value(result).map_err(McpError::Json)
}

fn to_value<T: Serialize>(result: AppResult<T>) -> McpResult<Value> {
    serde_json::to_value(result?).map_err(McpError::Json)
}

// ============================================================================
// Topic catalog
// ============================================================================

async fn handle_topic_list(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let arguments = arguments.or_else(|| Some(Value::Object(Default::default())));
    execute_handler("topic_list", arguments, |p: TopicListParams| async move {
        match p.difficulty {
            Some(difficulty) => state.topics.by_difficulty(difficulty).await,
            None => state.topics.list().await,
        }
    })
    .await
}

async fn handle_topic_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("topic_get", arguments, |p: TopicParams| async move {
        state.topics.require(&p.topic_id).await
    })
    .await
}

async fn handle_topic_generate(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("topic_generate", arguments, |p: TopicGenerateParams| async move {
        state
            .topics
            .generate(&p.interest, p.difficulty.unwrap_or(Difficulty::Beginner))
            .await
    })
    .await
}

async fn handle_topic_add_generated(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("topic_add_generated", arguments, |draft: TopicDraft| {
        state.topics.add_generated(draft)
    })
    .await
}

async fn handle_topic_delete(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("topic_delete", arguments, |p: TopicParams| async move {
        state.topics.delete(&p.topic_id).await
    })
    .await
}

async fn handle_learning_stats(state: &SharedState) -> McpResult<Value> {
    to_value(state.topics.stats().await)
}

// ============================================================================
// Step workflow
// ============================================================================

async fn handle_step_enter(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("step_enter", arguments, |p: StepEnterParams| async move {
        state.progress.enter_step(&p.topic_id, p.step).await
    })
    .await
}

async fn handle_step_status(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("step_status", arguments, |p: TopicParams| async move {
        state.progress.step_status(&p.topic_id).await
    })
    .await
}

async fn handle_route_resolve(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("route_resolve", arguments, |p: RouteParams| async move {
        resolve_route(state, &p.path).await
    })
    .await
}

/// Resolve a path against the catalog and the current progress.
pub async fn resolve_route(state: &SharedState, path: &str) -> AppResult<RouteResolution> {
    let route = Route::parse(path);
    let kind = match &route {
        Route::Home => "home",
        Route::Topics => "topics",
        Route::MyLearning => "my-learning",
        Route::Help => "help",
        Route::Profile => "profile",
        Route::TopicStep { .. } => "topic-step",
        Route::NotFound => "not-found",
    };

    let resolution = match &route {
        Route::TopicStep { topic_id, step } => {
            let topic_exists = state.topics.get(topic_id).await?.is_some();
            let unlocked = state.progress.is_unlocked(*step).await?;
            RouteResolution {
                kind,
                path: route.path(),
                topic_id: Some(topic_id.clone()),
                step: Some(step.info(topic_id)),
                topic_exists: Some(topic_exists),
                reachable: topic_exists && unlocked,
            }
        }
        Route::NotFound => RouteResolution {
            kind,
            path: route.path(),
            topic_id: None,
            step: None,
            topic_exists: None,
            reachable: false,
        },
        _ => RouteResolution {
            kind,
            path: route.path(),
            topic_id: None,
            step: None,
            topic_exists: None,
            reachable: true,
        },
    };
    Ok(resolution)
}

async fn handle_last_visited(state: &SharedState) -> McpResult<Value> {
    to_value(state.progress.last_visited().await)
}

async fn handle_content_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("content_get", arguments, |p: TopicParams| async move {
        state
            .topics
            .require(&p.topic_id)
            .await
            .map(TopicMaterial::for_topic)
    })
    .await
}

// ============================================================================
// Argument analysis
// ============================================================================

async fn handle_claim_add(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("claim_add", arguments, |p: ClaimAddParams| async move {
        state
            .arguments
            .add_claim(&p.topic_id, &p.sentence_id, p.stance)
            .await
    })
    .await
}

async fn handle_claim_remove(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("claim_remove", arguments, |p: ClaimRemoveParams| async move {
        state.arguments.remove_claim(&p.topic_id, &p.claim_id).await
    })
    .await
}

async fn handle_evidence_add(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("evidence_add", arguments, |p: EvidenceAddParams| async move {
        state
            .arguments
            .add_evidence(&p.topic_id, &p.sentence_id, &p.claim_id, p.evidence_type)
            .await
    })
    .await
}

async fn handle_evidence_remove(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("evidence_remove", arguments, |p: EvidenceRemoveParams| async move {
        state
            .arguments
            .remove_evidence(&p.topic_id, &p.evidence_id)
            .await
    })
    .await
}

async fn handle_bridge_add(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("bridge_add", arguments, |p: BridgeAddParams| async move {
        state
            .arguments
            .add_bridge(&p.topic_id, &p.claim_id, &p.evidence_id, &p.text)
            .await
    })
    .await
}

async fn handle_annotations_clear(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("annotations_clear", arguments, |p: TopicParams| async move {
        state.arguments.clear(&p.topic_id).await?;
        state.arguments.argument_map(&p.topic_id, None).await
    })
    .await
}

async fn handle_argument_map(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ArgumentMapParams = parse_arguments("argument_map", arguments)?;
    let view = state
        .arguments
        .argument_map(&params.topic_id, params.show)
        .await?;

    let mut value = serde_json::to_value(&view)?;
    if params.as_text {
        if let Value::Object(map) = &mut value {
            map.insert("text".to_string(), Value::String(render_text(&view.map)));
        }
    }
    Ok(value)
}

// ============================================================================
// Initial intuition
// ============================================================================

async fn handle_intuition_save(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("intuition_save", arguments, |p: IntuitionSaveParams| async move {
        state.intuition.save(&p.topic_id, p.value, &p.note).await
    })
    .await
}

async fn handle_intuition_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("intuition_get", arguments, |p: TopicParams| async move {
        state.intuition.get(&p.topic_id).await
    })
    .await
}

fn handle_stance_label(arguments: Option<Value>) -> McpResult<Value> {
    let params: StanceLabelParams = parse_arguments("stance_label", arguments)?;
    let result = StanceLabelResult {
        value: params.value,
        label: stance_label(params.value),
        description: intuition_description(params.value),
    };
    serde_json::to_value(result).map_err(McpError::Json)
}

// ============================================================================
// Perspective puzzle
// ============================================================================

async fn handle_perspective_place(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("perspective_place", arguments, |p: PlaceParams| async move {
        state
            .perspective
            .place(&p.topic_id, &p.role_id, p.position)
            .await
    })
    .await
}

async fn handle_perspective_unplace(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("perspective_unplace", arguments, |p: RoleParams| async move {
        state.perspective.unplace(&p.topic_id, &p.role_id).await
    })
    .await
}

async fn handle_perspective_toggle_tag(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("perspective_toggle_tag", arguments, |p: ToggleTagParams| async move {
        state
            .perspective
            .toggle_tag(&p.topic_id, &p.role_id, &p.tag_id)
            .await
    })
    .await
}

async fn handle_perspective_reset(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("perspective_reset", arguments, |p: TopicParams| async move {
        state.perspective.reset(&p.topic_id).await
    })
    .await
}

async fn handle_perspective_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("perspective_get", arguments, |p: TopicParams| async move {
        state.perspective.get(&p.topic_id).await
    })
    .await
}

// ============================================================================
// Dialogue simulation
// ============================================================================

async fn handle_dialogue_start(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("dialogue_start", arguments, |p: DialogueStartParams| async move {
        let setup = DialogueSetup {
            user_role: p.user_role,
            system_role: p.system_role,
            user_opinion: p.user_opinion,
            system_opinion: p.system_opinion,
        };
        state.dialogue.start(&p.topic_id, setup).await
    })
    .await
}

async fn handle_dialogue_send(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("dialogue_send", arguments, |p: DialogueSendParams| async move {
        state.dialogue.send(&p.topic_id, &p.text).await
    })
    .await
}

async fn handle_dialogue_feedback(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("dialogue_feedback", arguments, |p: TopicParams| async move {
        state.dialogue.feedback(&p.topic_id).await
    })
    .await
}

async fn handle_dialogue_save(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("dialogue_save", arguments, |p: TopicParams| async move {
        state.dialogue.save(&p.topic_id).await.map(|data| Saved {
            notice: SAVED_NOTICE,
            data,
        })
    })
    .await
}

// ============================================================================
// Reflection and review
// ============================================================================

async fn handle_reflection_save(
    state: &SharedState,
    arguments: Option<Value>,
) -> McpResult<Value> {
    execute_handler("reflection_save", arguments, |p: ReflectionSaveParams| async move {
        let input = ReflectionInput {
            highlight_evidence_id: p.highlight_evidence_id,
            highlight_evidence_comment: p.highlight_evidence_comment,
            reflection: p.reflection,
            self_eval: p.self_eval,
        };
        state
            .reflection
            .save_reflection(&p.topic_id, input)
            .await
            .map(|data| Saved {
                notice: REFLECTION_SAVED_NOTICE,
                data,
            })
    })
    .await
}

async fn handle_reflection_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("reflection_get", arguments, |p: TopicParams| async move {
        state.reflection.get_reflection(&p.topic_id).await
    })
    .await
}

async fn handle_review_draft(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("review_draft", arguments, |p: ReviewParams| async move {
        let (topic_id, input) = p.into_parts();
        state.reflection.review_draft(&topic_id, &input).await
    })
    .await
}

async fn handle_review_save(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("review_save", arguments, |p: ReviewParams| async move {
        let (topic_id, input) = p.into_parts();
        state
            .reflection
            .save_review(&topic_id, input)
            .await
            .map(|data| Saved {
                notice: REVIEW_SAVED_NOTICE,
                data,
            })
    })
    .await
}

async fn handle_topic_complete(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("topic_complete", arguments, |p: ReviewParams| async move {
        let (topic_id, input) = p.into_parts();
        state.reflection.complete_topic(&topic_id, input).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, LearningError};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestParams {
        content: String,
        value: i32,
    }

    #[test]
    fn test_parse_arguments_success() {
        let args = Some(json!({
            "content": "test content",
            "value": 42
        }));

        let result: McpResult<TestParams> = parse_arguments("test.tool", args);
        let params = result.unwrap();
        assert_eq!(params.content, "test content");
        assert_eq!(params.value, 42);
    }

    #[test]
    fn test_parse_arguments_missing_arguments() {
        let result: McpResult<TestParams> = parse_arguments("test.tool", None);

        let err = result.unwrap_err();
        assert!(matches!(err, McpError::InvalidParameters { .. }));
        assert!(err.to_string().contains("Missing arguments"));
        assert!(err.to_string().contains("test.tool"));
    }

    #[test]
    fn test_parse_arguments_wrong_type() {
        let args = Some(json!({
            "content": "test",
            "value": "not a number"
        }));

        let result: McpResult<TestParams> = parse_arguments("claim_add", args);
        let err = result.unwrap_err();
        assert!(matches!(err, McpError::InvalidParameters { .. }));
        assert!(err.to_string().contains("claim_add"));
    }

    #[test]
    fn test_parse_claim_params_rejects_unknown_stance() {
        let args = Some(json!({
            "topic_id": "1",
            "sentence_id": "s1",
            "stance": "maybe"
        }));
        let result: McpResult<ClaimAddParams> = parse_arguments("claim_add", args);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_intuition_params_accepts_undecided() {
        let args = Some(json!({ "topic_id": "1", "value": "undecided" }));
        let params: IntuitionSaveParams = parse_arguments("intuition_save", args).unwrap();
        assert_eq!(params.value, IntuitionValue::Undecided);
        assert_eq!(params.note, "");
    }

    #[test]
    fn test_parse_review_params_into_input() {
        let args = Some(json!({ "topic_id": "2", "final_value": 70 }));
        let params: ReviewParams = parse_arguments("review_draft", args).unwrap();
        let (topic_id, input) = params.into_parts();
        assert_eq!(topic_id, "2");
        assert_eq!(input.final_value, Some(70));
        assert!(input.final_comment.is_none());
    }

    #[tokio::test]
    async fn test_execute_handler_success() {
        let args = Some(json!({ "content": "x", "value": 2 }));
        let result = execute_handler("test.tool", args, |p: TestParams| async move {
            Ok::<_, AppError>(p.value * 2)
        })
        .await
        .unwrap();
        assert_eq!(result, json!(4));
    }

    #[tokio::test]
    async fn test_execute_handler_keeps_learning_notice() {
        let args = Some(json!({ "content": "x", "value": 2 }));
        let err = execute_handler("test.tool", args, |_p: TestParams| async move {
            Err::<i32, AppError>(LearningError::NoClaims.into())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, McpError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("请先添加至少一个主张"));
    }

    #[test]
    fn test_stance_label_handler() {
        let value = handle_stance_label(Some(json!({ "value": 40 }))).unwrap();
        assert_eq!(value["label"], "模棱两可");
        assert_eq!(value["value"], 40);

        let value = handle_stance_label(Some(json!({ "value": "undecided" }))).unwrap();
        assert_eq!(value["label"], "未决定");
    }
}
