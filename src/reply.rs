//! Static suggested-reply templates.
//!
//! Pure, deterministic, always non-empty. The external model may draft a
//! richer reply; these templates are the floor the pipeline falls back to.

use crate::pipeline::types::Category;

/// Longest excerpt quoted back when personalizing a productive reply.
const MAX_EXCERPT_CHARS: usize = 120;

/// Static suggested reply for a category.
///
/// Productive replies quote the first sentence of the email when one can be
/// found, so the sender sees what is being acknowledged.
pub fn template_reply(category: Category, text: &str) -> String {
    match category {
        Category::Productive => match first_sentence(text) {
            Some(excerpt) => format!(
                "Hello, we have received your message regarding \"{excerpt}\". \
                 We are looking into it and will get back to you within one \
                 business day. Please share any additional details or \
                 attachments that could help."
            ),
            None => "Hello, we have received your message. We are looking into \
                     your request and will get back to you within one business \
                     day. Please share any additional details or attachments \
                     that could help."
                .to_string(),
        },
        Category::Unproductive => "Thank you for your message! No action is needed \
                                   on your side, and we appreciate you reaching out."
            .to_string(),
    }
}

/// First sentence of `text`, bounded to `MAX_EXCERPT_CHARS`.
fn first_sentence(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut sentence = trimmed;
    for (idx, ch) in trimmed.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\n') {
            sentence = &trimmed[..idx];
            break;
        }
    }

    let sentence = sentence.trim();
    if sentence.is_empty() {
        return None;
    }
    Some(sentence.chars().take(MAX_EXCERPT_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn productive_reply_quotes_first_sentence() {
        let reply = template_reply(
            Category::Productive,
            "The export crashes on large files. It worked last week.",
        );
        assert!(reply.contains("The export crashes on large files"));
        assert!(!reply.contains("It worked last week"));
    }

    #[test]
    fn productive_reply_without_sentence_uses_generic_template() {
        let reply = template_reply(Category::Productive, "");
        assert!(!reply.is_empty());
        assert!(reply.contains("received your message"));
    }

    #[test]
    fn unproductive_reply_is_short_acknowledgment() {
        let reply = template_reply(Category::Unproductive, "Happy holidays!");
        assert!(!reply.is_empty());
        assert!(reply.contains("No action is needed"));
    }

    #[test]
    fn excerpt_is_bounded() {
        let long = "word ".repeat(100);
        let reply = template_reply(Category::Productive, &long);
        // The quoted excerpt stays within the cap even with no sentence break.
        let quoted = reply.split('"').nth(1).unwrap();
        assert!(quoted.chars().count() <= MAX_EXCERPT_CHARS);
    }

    #[test]
    fn first_sentence_stops_at_newline() {
        assert_eq!(
            first_sentence("subject line\nmore body").as_deref(),
            Some("subject line")
        );
    }

    #[test]
    fn replies_are_never_empty() {
        for category in [Category::Productive, Category::Unproductive] {
            for text in ["", "hi", "A question? Yes."] {
                assert!(!template_reply(category, text).is_empty());
            }
        }
    }
}
