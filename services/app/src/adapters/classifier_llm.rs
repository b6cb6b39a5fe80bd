//! services/app/src/adapters/classifier_llm.rs
//!
//! This module contains the adapter for the plastic-classification LLM.
//! It implements the `ClassificationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are a plastic identification expert. Analyze the image of a plastic item. Identify the plastic type (e.g., PET, HDPE), its general recyclability, estimated decomposition time, and carbon impact. Provide a confidence score between 0 and 1. Respond ONLY with a valid JSON object with exactly these keys: plasticType (string), recyclability (string), decompositionTime (string), carbonImpact (string), confidenceScore (number). No prose, no markdown.";

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ImageUrlArgs,
        ResponseFormat,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plastivize_core::{
    domain::PlasticClassification,
    ports::{ClassificationService, PortError, PortResult},
};
use regex::Regex;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ClassificationService` using an OpenAI-compatible
/// vision model.
#[derive(Clone)]
pub struct OpenAiClassifierAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClassifierAdapter {
    /// Creates a new `OpenAiClassifierAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Models occasionally wrap their JSON in a markdown fence even when told
    /// not to; pull out the fenced body if one is present.
    fn extract_json(raw: &str) -> &str {
        let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
        match fence.captures(raw) {
            Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
            None => raw.trim(),
        }
    }
}

//=========================================================================================
// `ClassificationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ClassificationService for OpenAiClassifierAdapter {
    /// Identifies the plastic in a scanned image by sending it to the vision
    /// model as a base64 data URL and parsing the structured JSON reply.
    async fn classify_item(
        &self,
        image_data: &[u8],
        mime_type: &str,
    ) -> PortResult<PlasticClassification> {
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(image_data));

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(vec![
                    ChatCompletionRequestMessageContentPartTextArgs::default()
                        .text("Classify the plastic item in this image.")
                        .build()
                        .map_err(|e| PortError::Unexpected(e.to_string()))?
                        .into(),
                    ChatCompletionRequestMessageContentPartImageArgs::default()
                        .image_url(
                            ImageUrlArgs::default()
                                .url(data_url)
                                .build()
                                .map_err(|e| PortError::Unexpected(e.to_string()))?,
                        )
                        .build()
                        .map_err(|e| PortError::Unexpected(e.to_string()))?
                        .into(),
                ])
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
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
                    PortError::Unexpected(format!("Classification reply was not valid JSON: {e}"))
                })
            } else {
                Err(PortError::Unexpected(
                    "Classification LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Classification LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{"plasticType":"PET (Polyethylene terephthalate)","recyclability":"Widely recyclable","decompositionTime":"450 years","carbonImpact":"High","confidenceScore":0.93}"#;

    #[test]
    fn bare_json_parses() {
        let parsed: PlasticClassification =
            serde_json::from_str(OpenAiClassifierAdapter::extract_json(REPLY)).unwrap();
        assert_eq!(parsed.plastic_type, "PET (Polyethylene terephthalate)");
        assert!((parsed.confidence_score - 0.93).abs() < 1e-9);
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let fenced = format!("```json\n{REPLY}\n```");
        let parsed: PlasticClassification =
            serde_json::from_str(OpenAiClassifierAdapter::extract_json(&fenced)).unwrap();
        assert_eq!(parsed.recyclability, "Widely recyclable");
    }

    #[test]
    fn unfenced_reply_is_trimmed() {
        let padded = format!("  {REPLY}\n");
        assert_eq!(OpenAiClassifierAdapter::extract_json(&padded), REPLY);
    }
}
