// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifies a user utterance into the path the session takes.

const REMEMBER_PREFIX: &str = "remember ";
const RECALL_PREFIX: &str = "recall ";
const NEWS_TRIGGER: &str = "tech news";

/// What a user turn asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Store the (trimmed) remainder as a memory.
    Remember(&'a str),
    /// Look up memories similar to the (trimmed) remainder.
    Recall(&'a str),
    /// Summarize technology headlines.
    News,
    /// Anything else goes to the model.
    Chat,
}

/// Classifies `input`, ignoring leading whitespace.
///
/// Matching is case-insensitive and ordered: a `remember ` prefix wins over
/// `recall `, which wins over a `tech news` substring. The remainder after a
/// prefix keeps its original case.
pub fn classify(input: &str) -> Command<'_> {
    let input = input.trim_start();
    if let Some(rest) = strip_prefix_ignore_case(input, REMEMBER_PREFIX) {
        Command::Remember(rest.trim())
    } else if let Some(rest) = strip_prefix_ignore_case(input, RECALL_PREFIX) {
        Command::Recall(rest.trim())
    } else if input.to_lowercase().contains(NEWS_TRIGGER) {
        Command::News
    } else {
        Command::Chat
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefixes_are_case_insensitive() {
        assert_eq!(classify("Remember I like tea"), Command::Remember("I like tea"));
        assert_eq!(classify("RECALL tea"), Command::Recall("tea"));
        assert_eq!(classify("any TECH NEWS today?"), Command::News);
        assert_eq!(classify("hello there"), Command::Chat);
    }

    #[test]
    fn remember_takes_precedence() {
        assert_eq!(classify("remember recall cats"), Command::Remember("recall cats"));
        assert_eq!(
            classify("remember to read the tech news"),
            Command::Remember("to read the tech news")
        );
        assert_eq!(classify("recall tech news"), Command::Recall("tech news"));
    }

    #[test]
    fn prefix_needs_the_space() {
        assert_eq!(classify("remembering things"), Command::Chat);
        assert_eq!(classify("recalled"), Command::Chat);
        assert_eq!(classify("remember"), Command::Chat);
    }

    #[test]
    fn remainder_is_trimmed() {
        assert_eq!(classify("  remember   My Sister  "), Command::Remember("My Sister"));
        assert_eq!(classify("remember "), Command::Remember(""));
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert_eq!(classify("réméṁber this"), Command::Chat);
        assert_eq!(classify("🙂🙂🙂🙂🙂"), Command::Chat);
    }

    proptest! {
        #[test]
        fn remember_prefix_always_stores_the_rest(rest in "[a-zA-Z0-9 ]{0,30}") {
            let input = format!("remember {rest}");
            prop_assert_eq!(classify(&input), Command::Remember(rest.trim()));
        }

        #[test]
        fn arbitrary_text_never_panics(input in "\\PC{0,40}") {
            let _ = classify(&input);
        }
    }
}
