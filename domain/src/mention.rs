//! `@mention` extraction from user input.
//!
//! Mentions steer who must speak on the next turn: `@claude` forces the
//! Claude models, `@all` forces everyone. Parsing is pure domain logic, the
//! mapping from mention identifiers to concrete models happens later via
//! [`Model::matches_mention`](crate::core::model::Model::matches_mention).

/// Result of scanning a raw user message for mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionScan {
    /// Lowercased mention identifiers, deduplicated, in first-occurrence order.
    /// `@all` is reported through [`force_all`](Self::force_all) instead.
    pub mentions: Vec<String>,
    /// True when the message contains `@all`.
    pub force_all: bool,
    /// The message with mention tokens removed.
    pub clean_message: String,
}

impl MentionScan {
    pub fn has_mentions(&self) -> bool {
        self.force_all || !self.mentions.is_empty()
    }
}

/// True for characters allowed inside a mention identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// True for characters that may NOT directly precede the `@` of a mention.
///
/// This keeps addresses like `user@example.com` from being read as
/// mentions: the `@` only counts at the start of the message or after
/// whitespace and punctuation.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scan `raw` for `@mention` tokens.
///
/// A mention is `@` followed by one or more ASCII alphanumerics, `_` or `-`,
/// where the `@` sits at the start of the string or after a non-word
/// character. Identifiers are lowercased and deduplicated preserving first
/// occurrence. When no mentions are found the clean message is the trimmed
/// input; otherwise mention spans are removed and the remaining whitespace
/// collapsed.
pub fn parse_mentions(raw: &str) -> MentionScan {
    let mut mentions: Vec<String> = Vec::new();
    let mut force_all = false;
    let mut spans: Vec<(usize, usize)> = Vec::new();

    let mut prev_char: Option<char> = None;
    let mut chars = raw.char_indices().peekable();

    while let Some((at_pos, c)) = chars.next() {
        if c != '@' || prev_char.is_some_and(is_word_char) {
            prev_char = Some(c);
            continue;
        }

        let ident_start = at_pos + c.len_utf8();
        let mut ident_end = ident_start;
        while let Some(&(pos, ic)) = chars.peek() {
            if !is_identifier_char(ic) {
                break;
            }
            ident_end = pos + ic.len_utf8();
            chars.next();
        }

        if ident_end == ident_start {
            // Bare '@' with no identifier, leave it in the message.
            prev_char = Some(c);
            continue;
        }

        let ident = raw[ident_start..ident_end].to_lowercase();
        if ident == "all" {
            force_all = true;
        } else if !mentions.contains(&ident) {
            mentions.push(ident);
        }
        spans.push((at_pos, ident_end));
        prev_char = raw[ident_start..ident_end].chars().last();
    }

    let clean_message = if spans.is_empty() {
        raw.trim().to_string()
    } else {
        let mut remainder = String::with_capacity(raw.len());
        let mut cursor = 0;
        for &(start, end) in &spans {
            remainder.push_str(&raw[cursor..start]);
            cursor = end;
        }
        remainder.push_str(&raw[cursor..]);
        remainder.split_whitespace().collect::<Vec<_>>().join(" ")
    };

    MentionScan {
        mentions,
        force_all,
        clean_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_mentions_returns_trimmed_input() {
        let scan = parse_mentions("  what do you all think?  ");
        assert!(scan.mentions.is_empty());
        assert!(!scan.force_all);
        assert!(!scan.has_mentions());
        assert_eq!(scan.clean_message, "what do you all think?");
    }

    #[test]
    fn test_single_mention_at_start() {
        let scan = parse_mentions("@claude what do you think?");
        assert_eq!(scan.mentions, vec!["claude"]);
        assert_eq!(scan.clean_message, "what do you think?");
    }

    #[test]
    fn test_mention_mid_sentence() {
        let scan = parse_mentions("I want @gpt to answer this");
        assert_eq!(scan.mentions, vec!["gpt"]);
        assert_eq!(scan.clean_message, "I want to answer this");
    }

    #[test]
    fn test_multiple_mentions_dedup_preserves_order() {
        let scan = parse_mentions("@gemini @Claude compare notes, @claude goes second");
        assert_eq!(scan.mentions, vec!["gemini", "claude"]);
        assert_eq!(scan.clean_message, "compare notes, goes second");
    }

    #[test]
    fn test_all_sets_force_flag() {
        let scan = parse_mentions("@all sound off");
        assert!(scan.force_all);
        assert!(scan.mentions.is_empty());
        assert!(scan.has_mentions());
        assert_eq!(scan.clean_message, "sound off");
    }

    #[test]
    fn test_email_is_not_a_mention() {
        let scan = parse_mentions("mail me at user@example.com please");
        assert!(scan.mentions.is_empty());
        assert_eq!(scan.clean_message, "mail me at user@example.com please");
    }

    #[test]
    fn test_bare_at_sign_is_left_alone() {
        let scan = parse_mentions("meet @ noon");
        assert!(scan.mentions.is_empty());
        assert_eq!(scan.clean_message, "meet @ noon");
    }

    #[test]
    fn test_hyphenated_identifier() {
        let scan = parse_mentions("@claude-sonnet-4-5 your turn");
        assert_eq!(scan.mentions, vec!["claude-sonnet-4-5"]);
        assert_eq!(scan.clean_message, "your turn");
    }

    #[test]
    fn test_mention_after_punctuation() {
        let scan = parse_mentions("good point,@gpt agrees");
        assert_eq!(scan.mentions, vec!["gpt"]);
        assert_eq!(scan.clean_message, "good point, agrees");
    }

    #[test]
    fn test_message_of_only_mentions_collapses_to_empty() {
        let scan = parse_mentions("@claude @gpt");
        assert_eq!(scan.mentions, vec!["claude", "gpt"]);
        assert_eq!(scan.clean_message, "");
    }
}
