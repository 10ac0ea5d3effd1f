use super::*;
use crate::argument::{EvidenceType, Stance};
use crate::catalog::TopicService;
use crate::config::LearningConfig;
use crate::error::AppError;
use crate::storage::MemoryStorage;
use pretty_assertions::assert_eq;

struct Fixture {
    arguments: ArgumentService,
    intuition: IntuitionService,
    progress: ProgressService,
    reflection: ReflectionService,
}

fn fixture() -> Fixture {
    let store: SharedStore = Arc::new(MemoryStorage::new());
    let config = LearningConfig {
        simulated_latency_ms: 0,
        redirect_delay_ms: 0,
        dialogue_reply_delay_ms: 0,
    };
    let catalog: Arc<dyn TopicCatalog> = Arc::new(TopicService::new(store.clone(), config));
    let arguments = ArgumentService::new(store.clone(), catalog.clone());
    let intuition = IntuitionService::new(store.clone(), catalog.clone());
    let progress = ProgressService::new(store.clone(), catalog.clone());
    let reflection = ReflectionService::new(
        store,
        catalog,
        arguments.clone(),
        intuition.clone(),
        progress.clone(),
    );
    Fixture {
        arguments,
        intuition,
        progress,
        reflection,
    }
}

#[tokio::test]
async fn test_reflection_round_trip() {
    let f = fixture();
    let input = ReflectionInput {
        reflection: ReflectionAnswers {
            q1_identity_perspective: "学生".to_string(),
            ..Default::default()
        },
        self_eval: SelfEvaluation::from_ratings([5.0, 1.0, 3.0, 2.0, 4.0]),
        ..Default::default()
    };
    let saved = f.reflection.save_reflection("1", input).await.unwrap();
    assert!(saved.timestamp > 0);

    let view = f.reflection.get_reflection("1").await.unwrap();
    assert!(view.stored);
    assert_eq!(view.reflection, saved);
    assert_eq!(view.recap.evidence_count, 0);
}

#[tokio::test]
async fn test_highlight_must_exist() {
    let f = fixture();
    let input = ReflectionInput {
        highlight_evidence_id: Some("E3".to_string()),
        ..Default::default()
    };
    let err = f.reflection.save_reflection("1", input).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::EvidenceNotFound { .. })
    ));

    f.arguments.add_claim("1", "s1", Stance::Pro).await.unwrap();
    f.arguments
        .add_evidence("1", "s2", "C1", EvidenceType::Data)
        .await
        .unwrap();
    let input = ReflectionInput {
        highlight_evidence_id: Some("E1".to_string()),
        highlight_evidence_comment: "数据可靠".to_string(),
        ..Default::default()
    };
    let saved = f.reflection.save_reflection("1", input).await.unwrap();
    assert_eq!(saved.highlight_evidence_id.as_deref(), Some("E1"));

    let view = f.reflection.get_reflection("1").await.unwrap();
    assert_eq!(view.recap.evidence_count, 1);
    assert_eq!(view.recap.bridged_count, 0);
}

#[tokio::test]
async fn test_draft_without_records_uses_defaults() {
    let f = fixture();
    let draft = f
        .reflection
        .review_draft("1", &ReviewInput::default())
        .await
        .unwrap();

    assert_eq!(draft.initial.value, IntuitionValue::Score(50));
    assert_eq!(draft.initial.comment, "");
    assert_eq!(draft.final_stance.value, 50);
    assert_eq!(draft.trajectory_summary.diff, 0);
    assert!(draft
        .summary_text
        .contains("我一开始是以一个普通学习者的身份来思考问题，当时的立场大致是\"模棱两可\""));
}

#[tokio::test]
async fn test_complete_topic_with_nothing_recorded() {
    let f = fixture();
    for step in 1..=7 {
        f.progress.enter_step("1", step).await.unwrap();
    }

    let completion = f
        .reflection
        .complete_topic("1", ReviewInput::default())
        .await
        .unwrap();
    let stored = f.reflection.load_review("1").await.unwrap().unwrap();

    assert_eq!(stored, completion.review);
    assert_eq!(stored.initial.value, IntuitionValue::Score(50));
    assert_eq!(stored.initial.comment, "");
    assert_eq!(stored.final_stance.value, 50);
    assert!(!stored.summary_text.contains("核污染水排海的长期影响"));
    assert!(stored.summary_text.contains("一些零散的新闻、他人的看法和自己的直觉"));
}

#[tokio::test]
async fn test_draft_from_recorded_intuition() {
    let f = fixture();
    f.intuition
        .save("1", IntuitionValue::Score(20), "担心渔业")
        .await
        .unwrap();

    let input = ReviewInput {
        final_value: Some(70),
        ..Default::default()
    };
    let draft = f.reflection.review_draft("1", &input).await.unwrap();
    assert_eq!(draft.initial.comment, "担心渔业");
    assert_eq!(draft.trajectory_summary.diff, 50);
    assert_eq!(draft.trajectory_summary.label_initial, "比较反对");
    assert!(draft.summary_text.contains("一个普通学习者"));
}

#[tokio::test]
async fn test_draft_rejects_out_of_range() {
    let f = fixture();
    let input = ReviewInput {
        final_value: Some(101),
        ..Default::default()
    };
    let err = f.reflection.review_draft("1", &input).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_save_review_keeps_edited_summary() {
    let f = fixture();
    f.intuition
        .save("2", IntuitionValue::Undecided, "")
        .await
        .unwrap();

    let input = ReviewInput {
        final_value: Some(90),
        final_comment: Some("AI会创造新岗位".to_string()),
        summary_text: Some("我自己的总结".to_string()),
    };
    let saved = f.reflection.save_review("2", input).await.unwrap();
    assert_eq!(saved.summary_text, "我自己的总结");
    assert_eq!(saved.trajectory_summary.diff, 0);
    assert_eq!(saved.initial.value, IntuitionValue::Undecided);

    let draft = f
        .reflection
        .review_draft("2", &ReviewInput::default())
        .await
        .unwrap();
    assert_eq!(draft.final_stance.value, 90);
    assert_eq!(draft.summary_text, "我自己的总结");
    assert_eq!(draft.saved, Some(saved));
}

#[tokio::test]
async fn test_complete_topic_requires_reflection_step() {
    let f = fixture();
    let err = f
        .reflection
        .complete_topic("1", ReviewInput::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Learning(LearningError::StepLocked { step: 8, required: 7 })
    ));
    assert!(f.reflection.load_review("1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_complete_topic() {
    let f = fixture();
    f.progress
        .mark_completed(LearningStep::MetaCognition)
        .await
        .unwrap();

    let completion = f
        .reflection
        .complete_topic("1", ReviewInput::default())
        .await
        .unwrap();
    assert_eq!(completion.notice, TOPIC_COMPLETED_NOTICE);
    assert!(completion.completed_steps.contains(&8));
    assert!(f.reflection.load_review("1").await.unwrap().is_some());
}
