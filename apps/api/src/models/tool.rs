use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the tools whose results this service knows how to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolName {
    GenerateContext,
    UpdateResume,
    #[serde(other)]
    Other,
}

/// Lifecycle of a tool invocation as reported by the chat stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationState {
    PartialCall,
    Call,
    Result,
    #[serde(other)]
    Unknown,
}

/// Identity of one tool invocation within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationIdentity {
    pub message_id: String,
    pub tool_call_id: String,
}

impl InvocationIdentity {
    pub fn new(message_id: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            tool_call_id: tool_call_id.into(),
        }
    }
}

/// A tool invocation event delivered from the chat stream. `result` is kept as
/// raw JSON: it is produced by a generative process and decoded leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultEvent {
    pub message_id: String,
    pub tool_call_id: String,
    pub tool_name: ToolName,
    #[serde(default)]
    pub result: Option<Value>,
    pub state: InvocationState,
}

impl ToolResultEvent {
    pub fn identity(&self) -> InvocationIdentity {
        InvocationIdentity::new(&self.message_id, &self.tool_call_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.state == InvocationState::Result
    }
}
