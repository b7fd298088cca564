// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sophie assistant.
//!
//! Foundational trait definitions, error types and common types shared by
//! every crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::SophieError;
pub use types::{
    AdapterType, ChatMessage, CompletionRequest, CompletionResponse, EmbeddingInput,
    EmbeddingOutput, HealthStatus, Mood, Role,
};

pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!(Mood::parse("neutral").unwrap(), Mood::Neutral);
        assert_eq!(Mood::parse("Cheerful").unwrap(), Mood::Cheerful);
        assert_eq!(Mood::parse(" THOUGHTFUL ").unwrap(), Mood::Thoughtful);
        assert_eq!(Mood::parse("serious").unwrap(), Mood::Serious);
    }

    #[test]
    fn unknown_mood_is_rejected() {
        let err = Mood::parse("grumpy").unwrap_err();
        assert!(matches!(err, SophieError::InvalidMood(ref m) if m == "grumpy"));
    }

    #[test]
    fn mood_default_is_neutral() {
        assert_eq!(Mood::default(), Mood::Neutral);
    }

    #[test]
    fn mood_names_match_display() {
        let names = Mood::names();
        assert_eq!(names, vec!["neutral", "cheerful", "thoughtful", "serious"]);
        assert_eq!(Mood::Thoughtful.to_string(), "thoughtful");
    }

    #[test]
    fn every_mood_has_distinct_guidance() {
        let guidance: std::collections::HashSet<_> =
            [Mood::Neutral, Mood::Cheerful, Mood::Thoughtful, Mood::Serious]
                .iter()
                .map(|m| m.guidance())
                .collect();
        assert_eq!(guidance.len(), 4);
    }

    #[test]
    fn chat_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
    }

    proptest! {
        #[test]
        fn only_the_four_moods_parse(name in "[a-z]{1,12}") {
            let known = ["neutral", "cheerful", "thoughtful", "serious"];
            prop_assert_eq!(Mood::parse(&name).is_ok(), known.contains(&name.as_str()));
        }
    }
}
