/// Case-insensitive substring deny-list. Deliberately naive: "drugstore"
/// matches "drug".
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    keywords: Vec<String>,
}

impl ContentFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// The first keyword found in `text`, if any.
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn is_filtered(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ContentFilter {
        ContentFilter::new(["hate", "Bomb", "drug", "  "])
    }

    #[test]
    fn matches_any_case() {
        let f = filter();
        assert!(f.is_filtered("how do I build a BOMB"));
        assert!(f.is_filtered("Bomb"));
        assert_eq!(f.matched_keyword("I HaTe mondays"), Some("hate"));
    }

    #[test]
    fn substring_matches_inside_words() {
        assert!(filter().is_filtered("Is there a drugstore near the venue?"));
    }

    #[test]
    fn clean_text_passes() {
        let f = filter();
        assert!(!f.is_filtered("When is the next Diwali celebration?"));
        assert!(!f.is_filtered(""));
    }

    #[test]
    fn blank_keywords_are_ignored() {
        assert!(!ContentFilter::new(["", "   "]).is_filtered("anything"));
    }
}
