//! Word tokenizer shared by indexing and querying
//!
//! A token is a maximal run of word characters (Unicode letters, digits,
//! underscore), lowercased. Tokens of two characters or fewer are dropped.

use std::sync::LazyLock;

use regex::Regex;

/// Tokens must be strictly longer than this many characters.
pub const MIN_TOKEN_CHARS: usize = 2;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word regex"));

/// Tokenize `text` into lowercase word tokens, in order of occurrence.
///
/// The whole input is lowercased before words are extracted, so the length
/// rule applies to the lowercase form. The returned iterator is lazy. Clone
/// it to walk the remaining sequence more than once.
#[must_use]
pub fn tokenize(text: &str) -> Tokens {
    Tokens {
        text: text.to_lowercase(),
        pos: 0,
    }
}

/// Lazy token stream produced by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens {
    text: String,
    pos: usize,
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.text.len() {
            let m = WORD.find_at(&self.text, self.pos)?;
            self.pos = m.end();
            let word = m.as_str();
            if word.chars().count() > MIN_TOKEN_CHARS {
                return Some(word.to_owned());
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Tokens {}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn lowercases_and_splits() {
        assert_eq!(toks("Invoice OVERDUE now"), vec!["invoice", "overdue", "now"]);
    }

    #[test]
    fn drops_short_tokens() {
        assert_eq!(toks("a an the of to be pay"), vec!["the", "pay"]);
    }

    #[test]
    fn punctuation_separates_tokens() {
        assert_eq!(
            toks("alice.johnson@techcorp.com"),
            vec!["alice", "johnson", "techcorp", "com"]
        );
        assert_eq!(toks("Re: PR #456"), vec!["456"]);
    }

    #[test]
    fn underscore_and_digits_are_word_chars() {
        assert_eq!(toks("thread_001 q1_2025"), vec!["thread_001", "q1_2025"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(toks("lunch team lunch"), vec!["lunch", "team", "lunch"]);
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(toks("").is_empty());
        assert!(toks("   \n\t ").is_empty());
        assert!(toks("!! ?? --").is_empty());
    }

    #[test]
    fn unicode_words_count_chars_not_bytes() {
        // "über" is 5 bytes but 4 chars; "éé" is 4 bytes but only 2 chars.
        assert_eq!(toks("Über éé café"), vec!["über", "café"]);
    }

    #[test]
    fn length_rule_applies_to_lowercase_form() {
        // 'İ' lowercases to 'i' plus a combining dot, so "İs" becomes three chars.
        assert_eq!(toks("İs"), vec!["i\u{307}s"]);
        assert!(toks("İ").is_empty());
    }

    #[test]
    fn clone_restarts_from_same_position() {
        let stream = tokenize("one two three");
        let first: Vec<String> = stream.clone().collect();
        let second: Vec<String> = stream.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["one", "two", "three"]);
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut stream = tokenize("hello");
        assert_eq!(stream.next().as_deref(), Some("hello"));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }
}
