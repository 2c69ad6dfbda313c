//! Text normalization for intent parsing.
//!
//! All normalization is deterministic: lowercase, trim, whitespace
//! tokenization, filler-word removal. No stemming, no heuristics.

/// Filler words stripped before rule matching.
pub const FILLER_WORDS: &[&str] = &[
    "please", "can", "you", "could", "for", "me", "kindly", "would", "mind",
];

/// Lowercase and trim input text.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split normalized text into whitespace-delimited tokens.
pub fn tokenize(raw: &str) -> Vec<String> {
    normalize_text(raw)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Remove filler words, preserving token order.
pub fn strip_fillers(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !FILLER_WORDS.contains(&t.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize_text("  Open Chrome  "), "open chrome");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("open   chrome\tnow"), vec!["open", "chrome", "now"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_strip_fillers() {
        let tokens = tokenize("can you open chrome for me please");
        assert_eq!(strip_fillers(&tokens), vec!["open", "chrome"]);
    }

    #[test]
    fn test_strip_fillers_keeps_everything_else() {
        let tokens = tokenize("use firefox as my browser");
        assert_eq!(
            strip_fillers(&tokens),
            vec!["use", "firefox", "as", "my", "browser"]
        );
    }
}
