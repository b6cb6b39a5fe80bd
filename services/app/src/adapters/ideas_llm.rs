//! services/app/src/adapters/ideas_llm.rs
//!
//! This module contains the adapter for the reuse-idea brainstorming LLM.
//! It implements the `ReuseIdeaService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are an expert in creative DIY and upcycling. For each idea, provide a short, catchy title and a one-sentence description. Respond ONLY with a valid JSON array of objects, where each object has 'title' and 'description' keys. No prose, no markdown.";

const USER_INPUT_TEMPLATE: &str =
    "Brainstorm 2-3 innovative and practical reuse ideas for an item made of {plastic_type} plastic.";

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use plastivize_core::{
    domain::ReuseIdea,
    ports::{PortError, PortResult, ReuseIdeaService},
};
use regex::Regex;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReuseIdeaService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiReuseIdeasAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiReuseIdeasAdapter {
    /// Creates a new `OpenAiReuseIdeasAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Strips a markdown fence if the model wrapped its JSON in one.
    fn extract_json(raw: &str) -> &str {
        let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
        match fence.captures(raw) {
            Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
            None => raw.trim(),
        }
    }
}

//=========================================================================================
// `ReuseIdeaService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReuseIdeaService for OpenAiReuseIdeasAdapter {
    /// Brainstorms a handful of upcycling ideas for the given plastic type.
    async fn suggest_reuse_ideas(&self, plastic_type: &str) -> PortResult<Vec<ReuseIdea>> {
        let user_input = USER_INPUT_TEMPLATE.replace("{plastic_type}", plastic_type);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        // The reply is a bare JSON array, so JSON mode (top-level objects only)
        // cannot be requested here.
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                serde_json::from_str(Self::extract_json(&content)).map_err(|e| {
                    PortError::Unexpected(format!("Reuse-idea reply was not valid JSON: {e}"))
                })
            } else {
                Err(PortError::Unexpected(
                    "Reuse-idea LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Reuse-idea LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_array_parses() {
        let reply = r#"[{"title":"Bottle Bird Feeder","description":"Cut a window into the bottle and hang it with twine."},{"title":"Herb Garden","description":"Halve the bottle and use the base as a windowsill planter."}]"#;
        let ideas: Vec<ReuseIdea> =
            serde_json::from_str(OpenAiReuseIdeasAdapter::extract_json(reply)).unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "Bottle Bird Feeder");
    }

    #[test]
    fn fenced_array_is_unwrapped() {
        let reply = "```json\n[{\"title\":\"Scoop\",\"description\":\"Cut the jug diagonally to make a scoop.\"}]\n```";
        let ideas: Vec<ReuseIdea> =
            serde_json::from_str(OpenAiReuseIdeasAdapter::extract_json(reply)).unwrap();
        assert_eq!(ideas.len(), 1);
    }
}
