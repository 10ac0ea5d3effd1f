use super::*;
use crate::argument::{ArgumentService, EvidenceType, Stance};
use crate::catalog::TopicService;
use crate::storage::MemoryStorage;
use pretty_assertions::assert_eq;

fn quick_config() -> LearningConfig {
    LearningConfig {
        simulated_latency_ms: 0,
        redirect_delay_ms: 0,
        dialogue_reply_delay_ms: 0,
    }
}

fn services() -> (DialogueService, ArgumentService) {
    let store = Arc::new(MemoryStorage::new());
    let catalog = Arc::new(TopicService::new(store.clone(), quick_config()));
    (
        DialogueService::new(store.clone(), catalog.clone(), quick_config()),
        ArgumentService::new(store, catalog),
    )
}

#[tokio::test]
async fn test_start_uses_stance_template() {
    let (dialogue, _) = services();
    let session = dialogue.start("1", DialogueSetup::default()).await.unwrap();

    assert_eq!(session.current_round, 1);
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].sender, Sender::System);
    assert!(session.messages[0]
        .text
        .starts_with("当地渔民：我对\"核污染水排海是否可接受？\"这个问题持有保留意见"));
}

#[tokio::test]
async fn test_start_rejects_unknown_role() {
    let (dialogue, _) = services();
    let setup = DialogueSetup {
        system_role: Some("pirate".to_string()),
        ..Default::default()
    };
    let err = dialogue.start("1", setup).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::RoleNotFound { .. })
    ));
}

#[tokio::test]
async fn test_send_before_start() {
    let (dialogue, _) = services();
    let err = dialogue.send("1", "你好").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::DialogueNotStarted)
    ));
}

#[tokio::test]
async fn test_three_rounds_then_finished() {
    let (dialogue, _) = services();
    dialogue.start("1", DialogueSetup::default()).await.unwrap();

    let session = dialogue.send("1", "我觉得还行").await.unwrap();
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.messages[1].text, "普通学生：我觉得还行");
    assert!(session.messages[2].text.contains("具体说明一下"));
    assert_eq!(session.messages[2].round, 2);

    let session = dialogue.send("1", "因为有研究支持").await.unwrap();
    assert!(session.messages[4].text.contains("替代方案"));
    assert_eq!(session.current_round, 3);

    let session = dialogue.send("1", "好的").await.unwrap();
    assert_eq!(session.messages.len(), 6);
    assert!(session.finished);

    let err = dialogue.send("1", "还有一句").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::DialogueFinished { max_rounds: 3 })
    ));
}

#[tokio::test]
async fn test_overlapping_sends_keep_every_turn() {
    let store = Arc::new(MemoryStorage::new());
    let catalog = Arc::new(TopicService::new(store.clone(), quick_config()));
    let config = LearningConfig {
        dialogue_reply_delay_ms: 20,
        ..quick_config()
    };
    let dialogue = DialogueService::new(store, catalog, config);
    dialogue.start("1", DialogueSetup::default()).await.unwrap();

    let (first, second) = tokio::join!(
        dialogue.send("1", "第一句"),
        dialogue.send("1", "第二句")
    );
    first.unwrap();
    second.unwrap();

    let session = dialogue.session("1").await.unwrap();
    assert_eq!(session.messages.len(), 5);
    assert_eq!(session.current_round, 3);
    let user_lines: Vec<&str> = session
        .messages
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(user_lines, vec!["普通学生：第一句", "普通学生：第二句"]);
}

#[tokio::test]
async fn test_known_evidence_tag_counts_as_support() {
    let (dialogue, arguments) = services();
    arguments.add_claim("1", "s1", Stance::Pro).await.unwrap();
    arguments
        .add_evidence("1", "s2", "C1", EvidenceType::Data)
        .await
        .unwrap();
    dialogue.start("1", DialogueSetup::default()).await.unwrap();

    let session = dialogue.send("1", "请看 [E1]").await.unwrap();
    assert_eq!(session.messages[1].evidence_tags, vec!["E1"]);
    assert!(session.messages[2].text.contains("我注意到你用了一些理由和证据"));
}

#[tokio::test]
async fn test_unknown_evidence_tag_is_not_support() {
    let (dialogue, _) = services();
    dialogue.start("1", DialogueSetup::default()).await.unwrap();

    let session = dialogue.send("1", "请看 [E9]").await.unwrap();
    assert_eq!(session.messages[1].evidence_tags, vec!["E9"]);
    assert!(session.messages[2].text.contains("具体说明一下"));
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let (dialogue, _) = services();
    dialogue.start("1", DialogueSetup::default()).await.unwrap();
    let err = dialogue.send("1", "   ").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_feedback_hints() {
    let (dialogue, _) = services();
    let setup = DialogueSetup {
        user_role: Some("gov".to_string()),
        system_role: Some("scientist".to_string()),
        ..Default::default()
    };
    dialogue.start("1", setup).await.unwrap();

    let feedback = dialogue.feedback("1").await.unwrap();
    assert_eq!(
        feedback.hints,
        vec![NO_CONNECTIVES_HINT, NO_EVIDENCE_HINT, SAME_STANCE_HINT]
    );
    assert!(feedback.praise.is_none());
}

#[tokio::test]
async fn test_feedback_praise() {
    let (dialogue, _) = services();
    dialogue.start("1", DialogueSetup::default()).await.unwrap();
    dialogue.send("1", "因为 [E1] 所以可行").await.unwrap();

    let feedback = dialogue.feedback("1").await.unwrap();
    assert!(feedback.hints.is_empty());
    assert_eq!(feedback.praise, Some(WELL_REASONED));
}

#[tokio::test]
async fn test_feedback_without_dialogue_is_empty() {
    let (dialogue, _) = services();
    let feedback = dialogue.feedback("2").await.unwrap();
    assert!(feedback.hints.is_empty());
    assert!(feedback.praise.is_none());
}

#[tokio::test]
async fn test_save_and_resume() {
    let store = Arc::new(MemoryStorage::new());
    let catalog = Arc::new(TopicService::new(store.clone(), quick_config()));
    let first = DialogueService::new(store.clone(), catalog.clone(), quick_config());
    first.start("2", DialogueSetup::default()).await.unwrap();
    first.send("2", "我担心失业").await.unwrap();
    let data = first.save("2").await.unwrap();
    assert_eq!(data.roles.system, "fisher");
    assert_eq!(data.messages.len(), 3);

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["topicTitle"], "人工智能是否会取代人类工作？");
    assert_eq!(json["messages"][1]["sender"], "user");
    assert!(json["messages"][0]["id"].as_str().unwrap().starts_with("msg-"));

    let second = DialogueService::new(store, catalog, quick_config());
    let session = second.session("2").await.unwrap();
    assert_eq!(session.current_round, 2);
    assert_eq!(session.messages, data.messages);
}
