use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Learning error: {0}")]
    Learning(#[from] LearningError),

    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("Serialization failed for {key}: {message}")]
    Serialization { key: String, message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Errors raised by the learning workflow.
///
/// None of these are fatal: each carries a learner-facing notice
/// (see [`LearningError::notice`]) and leaves stored state untouched.
#[derive(Debug, Error)]
pub enum LearningError {
    #[error("Topic not found: {topic_id}")]
    TopicNotFound {
        topic_id: String,
        redirect_after_ms: u64,
    },

    #[error("Step {step} is locked until step {required} is completed")]
    StepLocked { step: u8, required: u8 },

    #[error("Unknown learning step: {step}")]
    UnknownStep { step: u8 },

    #[error("Sentence not found: {sentence_id}")]
    SentenceNotFound { sentence_id: String },

    #[error("Sentence {sentence_id} is already annotated as {kind}")]
    AlreadyAnnotated { sentence_id: String, kind: String },

    #[error("At least one claim is required before adding evidence")]
    NoClaims,

    #[error("Claim not found: {claim_id}")]
    ClaimNotFound { claim_id: String },

    #[error("Evidence not found: {evidence_id}")]
    EvidenceNotFound { evidence_id: String },

    #[error("Evidence {evidence_id} does not belong to claim {claim_id}")]
    EvidenceClaimMismatch {
        evidence_id: String,
        claim_id: String,
    },

    #[error("Role not found: {role_id}")]
    RoleNotFound { role_id: String },

    #[error("Tag not found: {tag_id}")]
    TagNotFound { tag_id: String },

    #[error("Dialogue has not been started")]
    DialogueNotStarted,

    #[error("Dialogue already reached {max_rounds} rounds")]
    DialogueFinished { max_rounds: u32 },

    #[error("Only AI-generated topics can be deleted: {topic_id}")]
    TopicNotDeletable { topic_id: String },

    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },
}

impl LearningError {
    /// Learner-facing notice shown instead of an error dialog.
    pub fn notice(&self) -> &'static str {
        match self {
            LearningError::TopicNotFound { .. } => "未找到该议题，请返回议题广场重新选择",
            LearningError::StepLocked { .. } => "请先完成前一步",
            LearningError::UnknownStep { .. } => "未知的学习步骤",
            LearningError::SentenceNotFound { .. } => "未找到该句子",
            LearningError::AlreadyAnnotated { .. } => "该句子已经被标注",
            LearningError::NoClaims => "请先添加至少一个主张",
            LearningError::ClaimNotFound { .. } => "未找到该主张",
            LearningError::EvidenceNotFound { .. } => "未找到该证据",
            LearningError::EvidenceClaimMismatch { .. } => "该证据不属于所选主张",
            LearningError::RoleNotFound { .. } => "未找到该角色",
            LearningError::TagNotFound { .. } => "未找到该标签",
            LearningError::DialogueNotStarted => "请先选择角色并开始对话",
            LearningError::DialogueFinished { .. } => "对话已达到设定轮次，可以进入下一步反思",
            LearningError::TopicNotDeletable { .. } => "只能删除 AI 生成的议题",
            LearningError::Validation { .. } => "输入内容不完整",
        }
    }
}

/// MCP protocol errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid parameters for {tool_name}: {message}")]
    InvalidParameters { tool_name: String, message: String },

    #[error("Tool execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        let message = match &err {
            AppError::Learning(learning) => format!("{} ({})", learning.notice(), learning),
            other => other.to_string(),
        };
        McpError::ExecutionFailed { message }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;
