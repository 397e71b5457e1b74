//! Typed tool-calling contract.
//!
//! The orchestration layer registers engine capabilities by name with a
//! JSON-schema input contract, rather than introspecting signatures at
//! runtime. Only the contract shapes live here; transport and session
//! wiring belong to the external layer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A tool the orchestration layer can offer to the model: a name, a
/// human-readable description, and a JSON schema for the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Descriptor for the knowledge-base lookup tool backed by
/// [`Engine::answer`](crate::Engine::answer).
pub fn knowledge_base_tool() -> ToolDescriptor {
    ToolDescriptor {
        name: "lookup_knowledge_base".to_string(),
        description: "Look up company and product information in the knowledge base. \
                      Takes a natural-language question and returns the most relevant \
                      passage."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The user's question, in natural language"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Navigation side-channel message emitted by the external tool layer.
///
/// The engine never sends these; the shape is declared here so both sides
/// of the boundary agree on the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
}
