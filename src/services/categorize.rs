//! Keyword-based category suggestions
//!
//! A `KeywordMap` maps category names to keywords. It is built once and never
//! mutated; adding a keyword produces a new map.

use std::collections::BTreeMap;

use crate::config::settings::Settings;

/// Built-in keyword table used when settings carry no override
const DEFAULT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Groceries",
        &["supermarket", "grocery", "groceries", "market", "aldi", "lidl", "carrefour", "tesco", "walmart", "rewe", "edeka"],
    ),
    (
        "Dining",
        &["restaurant", "cafe", "café", "coffee", "bistro", "pizza", "pizzeria", "bakery", "deli", "bar", "brasserie"],
    ),
    (
        "Transport",
        &["taxi", "uber", "bolt", "fuel", "petrol", "gas station", "parking", "railway", "train", "metro"],
    ),
    (
        "Health",
        &["pharmacy", "apotheke", "pharmacie", "farmacia", "clinic", "dentist", "doctor"],
    ),
    (
        "Shopping",
        &["amazon", "ikea", "mall", "store", "boutique", "electronics"],
    ),
    (
        "Utilities",
        &["electricity", "water", "internet", "mobile", "telecom", "energy"],
    ),
    (
        "Entertainment",
        &["cinema", "theatre", "theater", "netflix", "spotify", "concert", "museum"],
    ),
];

/// Immutable mapping of category names to lowercase keywords
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordMap {
    keywords: BTreeMap<String, Vec<String>>,
}

impl KeywordMap {
    /// Build from arbitrary pairs; keywords are lowercased and deduplicated
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut keywords: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (category, words) in entries {
            let list = keywords.entry(category.into()).or_default();
            for word in words {
                let word = word.as_ref().trim().to_lowercase();
                if !word.is_empty() && !list.contains(&word) {
                    list.push(word);
                }
            }
        }
        Self { keywords }
    }

    /// The built-in table
    pub fn builtin() -> Self {
        Self::new(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(category, words)| (*category, words.to_vec())),
        )
    }

    /// The table from settings, or the built-in one when none is configured
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.categorization_keywords {
            Some(table) => Self::new(table.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None => Self::builtin(),
        }
    }

    /// A copy of this map with one more keyword for `category`
    pub fn with_keyword(&self, category: &str, keyword: &str) -> Self {
        Self::new(
            self.keywords
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .chain(std::iter::once((category.to_string(), vec![keyword.to_string()]))),
        )
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.keywords.keys().map(String::as_str)
    }

    pub fn keywords_for(&self, category: &str) -> Option<&[String]> {
        self.keywords.get(category).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Suggest a category name for free text such as a merchant name.
    ///
    /// Matching is case-insensitive and only on whole words. The longest
    /// matching keyword wins; on a tie the alphabetically first category wins.
    pub fn suggest(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        // BTreeMap iteration is alphabetical, so strict `>` keeps the first on ties
        for (category, words) in &self.keywords {
            for word in words {
                if contains_word(&haystack, word)
                    && best.map_or(true, |(_, len)| word.chars().count() > len)
                {
                    best = Some((category.as_str(), word.chars().count()));
                }
            }
        }

        best.map(|(category, _)| category)
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_suggestions() {
        let map = KeywordMap::builtin();
        assert_eq!(map.suggest("LIDL Berlin-Mitte"), Some("Groceries"));
        assert_eq!(map.suggest("Café Lumière"), Some("Dining"));
        assert_eq!(map.suggest("Shell gas station #42"), Some("Transport"));
        assert_eq!(map.suggest("Unknown Vendor"), None);
    }

    #[test]
    fn test_word_boundaries() {
        let map = KeywordMap::new([("Dining", vec!["bar"])]);
        assert_eq!(map.suggest("Sports Bar"), Some("Dining"));
        assert_eq!(map.suggest("Barbershop"), None);
        assert_eq!(map.suggest("crowbar"), None);
    }

    #[test]
    fn test_longest_keyword_wins() {
        let map = KeywordMap::new([
            ("Shopping", vec!["store"]),
            ("Groceries", vec!["grocery store"]),
        ]);
        assert_eq!(map.suggest("Main Street Grocery Store"), Some("Groceries"));
    }

    #[test]
    fn test_ties_break_by_category_name() {
        let map = KeywordMap::new([("Zeta", vec!["shop"]), ("Alpha", vec!["mart"])]);
        assert_eq!(map.suggest("shop mart"), Some("Alpha"));
    }

    #[test]
    fn test_with_keyword_leaves_original_untouched() {
        let map = KeywordMap::builtin();
        let extended = map.with_keyword("Pets", "Fressnapf");

        assert_eq!(map.suggest("Fressnapf GmbH"), None);
        assert_eq!(extended.suggest("Fressnapf GmbH"), Some("Pets"));
        assert_eq!(extended.len(), map.len() + 1);
        assert_eq!(extended.keywords_for("Pets"), Some(&["fressnapf".to_string()][..]));
    }

    #[test]
    fn test_from_settings_override() {
        let mut settings = Settings::default();
        assert_eq!(KeywordMap::from_settings(&settings), KeywordMap::builtin());

        let mut table = BTreeMap::new();
        table.insert("Books".to_string(), vec!["Bookshop".to_string()]);
        settings.categorization_keywords = Some(table);

        let map = KeywordMap::from_settings(&settings);
        assert_eq!(map.categories().collect::<Vec<_>>(), vec!["Books"]);
        assert_eq!(map.suggest("The Bookshop"), Some("Books"));
        assert_eq!(map.suggest("Lidl"), None);
    }
}
