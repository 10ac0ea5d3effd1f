//! Dialogue simulation.
//!
//! The learner argues with a scripted partner for three rounds. Live
//! sessions are held in memory per topic; `save` writes the transcript to
//! the store, and a stored transcript is resumed when no live session
//! exists.

mod script;

pub use script::{
    cites_known_evidence, extract_evidence_tags, find_role, has_connectives, has_reasoning,
    opening_statement, scripted_reply, DialogueRole, DEFAULT_SYSTEM_ROLE, DEFAULT_USER_ROLE,
    DIALOGUE_ROLES, MAX_ROUNDS, NO_CONNECTIVES_HINT, NO_EVIDENCE_HINT, SAME_STANCE_HINT,
    WELL_REASONED,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::argument::Evidence;
use crate::catalog::TopicCatalog;
use crate::config::LearningConfig;
use crate::error::{AppError, AppResult, LearningError};
use crate::storage::{load_json, load_json_or_default, save_json, topic_key, SharedStore, TopicDataKind};

/// Notice returned after a transcript is saved.
pub const SAVED_NOTICE: &str = "对话已保存";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub evidence_tags: Vec<String>,
}

impl Message {
    fn new(text: String, sender: Sender, round: u32, evidence_tags: Vec<String>) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            text,
            sender,
            round,
            timestamp: Utc::now(),
            evidence_tags,
        }
    }
}

/// Role ids chosen for each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueRoles {
    pub user: String,
    pub system: String,
}

/// Stored transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueData {
    pub topic_id: String,
    pub topic_title: String,
    pub roles: DialogueRoles,
    #[serde(default)]
    pub user_opinion: String,
    #[serde(default)]
    pub system_opinion: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub saved_at: DateTime<Utc>,
}

/// Parameters for opening a dialogue.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSetup {
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub system_role: Option<String>,
    #[serde(default)]
    pub user_opinion: String,
    #[serde(default)]
    pub system_opinion: String,
}

/// A dialogue in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSession {
    pub topic_id: String,
    pub topic_title: String,
    pub user_role: DialogueRole,
    pub system_role: DialogueRole,
    pub user_opinion: String,
    pub system_opinion: String,
    pub messages: Vec<Message>,
    /// Round the next learner message belongs to; past `MAX_ROUNDS` the
    /// dialogue is over.
    pub current_round: u32,
    pub finished: bool,
}

impl DialogueSession {
    fn open(
        topic_id: &str,
        topic_title: &str,
        user_role: DialogueRole,
        system_role: DialogueRole,
        user_opinion: String,
        system_opinion: String,
    ) -> Self {
        let opening = opening_statement(&system_role, topic_title, &system_opinion);
        Self {
            topic_id: topic_id.to_string(),
            topic_title: topic_title.to_string(),
            user_role,
            system_role,
            user_opinion,
            system_opinion,
            messages: vec![Message::new(opening, Sender::System, 1, Vec::new())],
            current_round: 1,
            finished: false,
        }
    }

    /// Rebuild a session from a stored transcript.
    ///
    /// The round continues from the last message: a partner line opens its
    /// round, a learner line closes it.
    fn resume(data: DialogueData) -> AppResult<Self> {
        let user_role = role(&data.roles.user)?;
        let system_role = role(&data.roles.system)?;
        let current_round = match data.messages.last() {
            Some(m) if m.sender == Sender::System => m.round,
            Some(m) => m.round + 1,
            None => 1,
        };
        Ok(Self {
            topic_id: data.topic_id,
            topic_title: data.topic_title,
            user_role: *user_role,
            system_role: *system_role,
            user_opinion: data.user_opinion,
            system_opinion: data.system_opinion,
            messages: data.messages,
            finished: current_round > MAX_ROUNDS,
            current_round,
        })
    }

    fn to_data(&self) -> DialogueData {
        DialogueData {
            topic_id: self.topic_id.clone(),
            topic_title: self.topic_title.clone(),
            roles: DialogueRoles {
                user: self.user_role.id.to_string(),
                system: self.system_role.id.to_string(),
            },
            user_opinion: self.user_opinion.clone(),
            system_opinion: self.system_opinion.clone(),
            messages: self.messages.clone(),
            saved_at: Utc::now(),
        }
    }

    /// Record a learner message. Returns the round it was sent in, and
    /// whether the partner should answer.
    fn push_user(&mut self, text: &str) -> AppResult<(u32, bool)> {
        if self.current_round > MAX_ROUNDS {
            return Err(LearningError::DialogueFinished {
                max_rounds: MAX_ROUNDS,
            }
            .into());
        }

        let round = self.current_round;
        let tags = extract_evidence_tags(text);
        let line = format!("{}：{}", self.user_role.label, text);
        self.messages.push(Message::new(line, Sender::User, round, tags));

        let answers = round < MAX_ROUNDS;
        if !answers {
            self.current_round += 1;
            self.finished = true;
        }
        Ok((round, answers))
    }

    fn push_reply(&mut self, round: u32, supported: bool) {
        let reply = scripted_reply(round, supported, self.system_role.label);
        self.messages
            .push(Message::new(reply, Sender::System, round + 1, Vec::new()));
        self.current_round = round + 1;
    }

    /// Coaching hints about the learner's messages so far.
    pub fn feedback(&self) -> DialogueFeedback {
        let user_lines = || self.messages.iter().filter(|m| m.sender == Sender::User);

        let mut hints = Vec::new();
        if !user_lines().any(|m| has_connectives(&m.text)) {
            hints.push(NO_CONNECTIVES_HINT);
        }
        if !user_lines().any(|m| !m.evidence_tags.is_empty()) {
            hints.push(NO_EVIDENCE_HINT);
        }
        if self.user_role.default_stance == self.system_role.default_stance {
            hints.push(SAME_STANCE_HINT);
        }

        let praise = (hints.is_empty() && !self.messages.is_empty()).then_some(WELL_REASONED);
        DialogueFeedback { hints, praise }
    }
}

/// Feedback shown next to the dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueFeedback {
    pub hints: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub praise: Option<&'static str>,
}

fn role(role_id: &str) -> AppResult<&'static DialogueRole> {
    find_role(role_id).ok_or_else(|| {
        LearningError::RoleNotFound {
            role_id: role_id.to_string(),
        }
        .into()
    })
}

/// Runs dialogue sessions and stores their transcripts.
#[derive(Clone)]
pub struct DialogueService {
    store: SharedStore,
    catalog: Arc<dyn TopicCatalog>,
    config: LearningConfig,
    sessions: Arc<Mutex<HashMap<String, DialogueSession>>>,
}

impl DialogueService {
    pub fn new(store: SharedStore, catalog: Arc<dyn TopicCatalog>, config: LearningConfig) -> Self {
        Self {
            store,
            catalog,
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a fresh dialogue, replacing any live one for the topic.
    pub async fn start(&self, topic_id: &str, setup: DialogueSetup) -> AppResult<DialogueSession> {
        let topic = self.catalog.require(topic_id).await?;
        let user_role = role(setup.user_role.as_deref().unwrap_or(DEFAULT_USER_ROLE))?;
        let system_role = role(setup.system_role.as_deref().unwrap_or(DEFAULT_SYSTEM_ROLE))?;

        let session = DialogueSession::open(
            topic_id,
            &topic.title,
            *user_role,
            *system_role,
            setup.user_opinion,
            setup.system_opinion,
        );
        self.sessions
            .lock()
            .await
            .insert(topic_id.to_string(), session.clone());

        info!(
            topic_id = %topic_id,
            user_role = user_role.id,
            system_role = system_role.id,
            "Dialogue started"
        );
        Ok(session)
    }

    /// The live session, or the stored transcript resumed.
    pub async fn session(&self, topic_id: &str) -> AppResult<DialogueSession> {
        let mut sessions = self.sessions.lock().await;
        Ok(self.live_session(&mut sessions, topic_id).await?.clone())
    }

    async fn live_session<'a>(
        &self,
        sessions: &'a mut HashMap<String, DialogueSession>,
        topic_id: &str,
    ) -> AppResult<&'a mut DialogueSession> {
        self.catalog.require(topic_id).await?;
        if !sessions.contains_key(topic_id) {
            let stored: Option<DialogueData> =
                load_json(self.store.as_ref(), &topic_key(topic_id, TopicDataKind::Dialogue))
                    .await?;
            let session =
                DialogueSession::resume(stored.ok_or(LearningError::DialogueNotStarted)?)?;
            sessions.insert(topic_id.to_string(), session);
        }
        sessions
            .get_mut(topic_id)
            .ok_or_else(|| LearningError::DialogueNotStarted.into())
    }

    /// Send a learner message and, before the last round, wait for the reply.
    ///
    /// The session lock is held for the whole turn, so turns on one topic
    /// never interleave.
    pub async fn send(&self, topic_id: &str, text: &str) -> AppResult<DialogueSession> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LearningError::Validation {
                field: "text".to_string(),
                reason: "请输入消息内容".to_string(),
            }
            .into());
        }

        let mut sessions = self.sessions.lock().await;
        let session = self.live_session(&mut sessions, topic_id).await?;
        let evidences: Vec<Evidence> = load_json_or_default(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::Evidences),
        )
        .await?;

        let (round, answers) = session.push_user(text)?;
        if answers {
            let supported = has_reasoning(text)
                || cites_known_evidence(text, evidences.iter().map(|e| e.id.as_str()));

            if self.config.dialogue_reply_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.dialogue_reply_delay_ms))
                    .await;
            }
            session.push_reply(round, supported);
        }

        debug!(
            topic_id = %topic_id,
            round,
            finished = session.finished,
            "Dialogue turn recorded"
        );
        Ok(session.clone())
    }

    /// Feedback on the current session. An unstarted dialogue gets none.
    pub async fn feedback(&self, topic_id: &str) -> AppResult<DialogueFeedback> {
        match self.session(topic_id).await {
            Ok(session) => Ok(session.feedback()),
            Err(AppError::Learning(LearningError::DialogueNotStarted)) => {
                Ok(DialogueFeedback {
                    hints: Vec::new(),
                    praise: None,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Write the live transcript to the store.
    pub async fn save(&self, topic_id: &str) -> AppResult<DialogueData> {
        let session = self.session(topic_id).await?;
        let data = session.to_data();
        save_json(
            self.store.as_ref(),
            &topic_key(topic_id, TopicDataKind::Dialogue),
            &data,
        )
        .await?;

        info!(topic_id = %topic_id, messages = data.messages.len(), "Dialogue saved");
        Ok(data)
    }

    /// The stored transcript, if any.
    pub async fn load(&self, topic_id: &str) -> AppResult<Option<DialogueData>> {
        Ok(load_json(self.store.as_ref(), &topic_key(topic_id, TopicDataKind::Dialogue)).await?)
    }
}

#[cfg(test)]
#[path = "dialogue_tests.rs"]
mod dialogue_tests;
