//! Prompt templates for the roundtable flow

use crate::chat::entities::{ChatMessage, Role};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the speaking self-evaluation call
    pub fn speak_evaluation_system() -> &'static str {
        r#"You are one of several AI assistants in a group conversation with a human.
Before anyone responds, each assistant privately decides whether it has something worth saying.
Your task is to judge whether YOU should respond to the latest message.
Decline when another participant is better placed, when you would only repeat what was said,
or when the message is not addressed to you. Respond when you can add genuine value.

Reply with ONLY a JSON object in this exact form:
{"should_speak": true or false, "confidence": 0.0 to 1.0, "reason": "one short sentence"}"#
    }

    /// User prompt for the speaking self-evaluation call
    pub fn speak_evaluation(history: &[ChatMessage], user_message: &str) -> String {
        let mut prompt = String::from("Recent conversation:\n");

        if history.is_empty() {
            prompt.push_str("(no prior messages)\n");
        }
        for message in history {
            let speaker = match (&message.role, &message.model) {
                (Role::User, _) => "Human".to_string(),
                (Role::Assistant, Some(model)) => model.to_string(),
                (Role::Assistant, None) => "Assistant".to_string(),
                (Role::System, _) | (Role::Tool, _) => continue,
            };
            prompt.push_str(&format!("[{}]: {}\n", speaker, message.content));
        }

        prompt.push_str(&format!(
            r#"
New message from the human:
{}

Should you respond to this message? Answer with the JSON object only."#,
            user_message
        ));

        prompt
    }

    /// System prompt for a model generating its reply in the group chat
    pub fn group_chat_system(display_name: &str, participants: &[String]) -> String {
        format!(
            r#"You are {} in a group conversation with a human and other AI assistants: {}.
Messages from other assistants are attributed by name in the history.
Speak in your own voice and do not impersonate other participants.
Build on what was already said rather than repeating it.
Be concise. If you have nothing to add beyond prior responses, say so briefly."#,
            display_name,
            participants.join(", ")
        )
    }
}
