//! Prompt templates for summaries and follow-up questions.

use crate::summary::SummaryStyle;

/// Default number of characters of page text embedded in a prompt
pub const DEFAULT_MAX_CHARS: usize = 5000;

const LONG_TEMPLATE: &str = "Summarize the following webpage in detail:\n{text}";
const SHORT_TEMPLATE: &str = "Summarize the following webpage in 100 words:\n{text}";
const CREATIVE_TEMPLATE: &str = "Provide a creative summary of the following webpage:\n{text}";
const BULLET_TEMPLATE: &str = "Summarize the following webpage in 3 bullet points:\n{text}";
const QUESTION_TEMPLATE: &str =
    "Based on the following webpage content, answer the question:\n\n{text}\n\nQuestion: {question}";

/// Template for a summary style
pub fn template(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Long => LONG_TEMPLATE,
        SummaryStyle::Short => SHORT_TEMPLATE,
        SummaryStyle::Creative => CREATIVE_TEMPLATE,
        SummaryStyle::BulletPoints => BULLET_TEMPLATE,
    }
}

/// Keep at most `cap` characters of `text`. `None` leaves the text whole.
pub fn clip(text: &str, cap: Option<usize>) -> &str {
    let Some(cap) = cap else {
        return text;
    };
    match text.char_indices().nth(cap) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the summary prompt for the given style
pub fn summary_prompt(text: &str, style: SummaryStyle, cap: Option<usize>) -> String {
    template(style).replace("{text}", clip(text, cap))
}

/// Build the question-answering prompt. The page text goes in whole; only
/// summary prompts are clipped.
pub fn question_prompt(text: &str, question: &str) -> String {
    // Substitute the question first so a literal "{text}" inside it survives.
    QUESTION_TEMPLATE
        .replacen("{question}", question, 1)
        .replacen("{text}", text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_style_has_its_own_template() {
        let templates: HashSet<_> = SummaryStyle::ALL.into_iter().map(template).collect();
        assert_eq!(templates.len(), SummaryStyle::ALL.len());
    }

    #[test]
    fn short_summary_prompt() {
        let prompt =
            summary_prompt("Example article body...", SummaryStyle::Short, Some(5000));
        assert_eq!(
            prompt,
            "Summarize the following webpage in 100 words:\nExample article body..."
        );
    }

    #[test]
    fn summary_prompt_is_deterministic() {
        for style in SummaryStyle::ALL {
            assert_eq!(
                summary_prompt("same text", style, None),
                summary_prompt("same text", style, None)
            );
        }
    }

    #[test]
    fn clip_cuts_to_exact_character_count() {
        let text = "a".repeat(6000);
        assert_eq!(clip(&text, Some(DEFAULT_MAX_CHARS)).chars().count(), 5000);
        assert_eq!(clip("short", Some(5000)), "short");
        assert_eq!(clip("whole", None), "whole");
        assert_eq!(clip("abc", Some(0)), "");
    }

    #[test]
    fn clip_never_splits_a_character() {
        let text = "héllo wörld";
        assert_eq!(clip(text, Some(2)), "hé");
        assert_eq!(clip(text, Some(8)), "héllo wö");
    }

    #[test]
    fn summary_prompt_embeds_clipped_text() {
        let text = "x".repeat(5001);
        let prompt = summary_prompt(&text, SummaryStyle::Long, Some(5000));
        let body = prompt
            .strip_prefix("Summarize the following webpage in detail:\n")
            .unwrap();
        assert_eq!(body.len(), 5000);
    }

    #[test]
    fn question_prompt_substitutes_both_verbatim() {
        let prompt = question_prompt("Page about X", "What is X?");
        assert_eq!(
            prompt,
            "Based on the following webpage content, answer the question:\n\nPage about X\n\nQuestion: What is X?"
        );
    }

    #[test]
    fn question_prompt_keeps_the_whole_page() {
        let text = "y".repeat(DEFAULT_MAX_CHARS + 1000);
        let prompt = question_prompt(&text, "Q?");
        assert_eq!(prompt.matches('y').count(), 6000);
    }

    #[test]
    fn question_prompt_leaves_braces_in_page_text_alone() {
        let prompt = question_prompt("uses {question} literally", "why?");
        assert!(prompt.contains("uses {question} literally"));
        assert!(prompt.ends_with("Question: why?"));
    }
}
