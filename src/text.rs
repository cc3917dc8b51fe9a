// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Hashtag and mention extraction from post text.

/// Extract `#hashtags` from post text.
///
/// Tags are lowercased and deduplicated, preserving first-appearance order.
/// A marker only starts a tag at the beginning of the text or after a
/// non-word character, so `a#b` is not a tag.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    extract_marked(text, '#')
        .into_iter()
        .map(|t| t.to_lowercase())
        .fold(Vec::new(), |mut acc, tag| {
            if !acc.contains(&tag) {
                acc.push(tag);
            }
            acc
        })
}

/// Extract `@mentions` from post text, deduplicated in first-appearance order.
/// Mentions keep their original case; usernames are matched case-sensitively.
pub fn extract_mentions(text: &str) -> Vec<String> {
    extract_marked(text, '@')
        .into_iter()
        .fold(Vec::new(), |mut acc, name| {
            if !acc.contains(&name) {
                acc.push(name);
            }
            acc
        })
}

fn extract_marked(text: &str, marker: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut prev: Option<char> = None;

    while let Some((_, c)) = chars.next() {
        if c == marker && prev.map_or(true, |p| !is_word_char(p)) {
            let mut token = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if is_word_char(next) {
                    token.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if !token.is_empty() {
                out.push(token);
            }
        }
        prev = Some(c);
    }

    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_hashtags() {
        assert_eq!(
            extract_hashtags("shipping #rust today, #Rust forever"),
            vec!["rust"]
        );
        assert_eq!(
            extract_hashtags("#one #two #three"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_hashtag_must_start_a_word() {
        assert!(extract_hashtags("c#sharp is not a tag").is_empty());
        assert_eq!(extract_hashtags("(#nested) works"), vec!["nested"]);
    }

    #[test]
    fn test_empty_and_bare_marker() {
        assert!(extract_hashtags("").is_empty());
        assert!(extract_hashtags("# not a tag").is_empty());
        assert!(extract_hashtags("ends with #").is_empty());
    }

    #[test]
    fn test_underscores_and_digits() {
        assert_eq!(extract_hashtags("#rust_2024 rocks"), vec!["rust_2024"]);
    }

    #[test]
    fn test_extracts_mentions() {
        assert_eq!(
            extract_mentions("cc @ada and @Grace, thanks @ada"),
            vec!["ada", "Grace"]
        );
    }

    #[test]
    fn test_mention_mid_word_is_not_a_mention() {
        assert!(extract_mentions("mail me at user@example.com").is_empty());
    }

    #[test]
    fn test_unicode_text_around_tags() {
        assert_eq!(extract_hashtags("désolé #café ouvert"), vec!["café"]);
    }
}
