use std::collections::{BTreeMap, HashMap};

use crate::models::language::Language;

const EMBEDDED_LABELS: &str = include_str!("../../data/ui_labels.json");

/// Static UI labels keyed by language, then by label key.
#[derive(Debug, Default)]
pub struct Labels {
    by_language: HashMap<Language, BTreeMap<String, String>>,
}

impl Labels {
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(EMBEDDED_LABELS)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            by_language: serde_json::from_str(raw)?,
        })
    }

    /// Label for `key`, falling back to English and then to the key itself.
    pub fn translate<'a>(&'a self, lang: Language, key: &'a str) -> &'a str {
        self.lookup(lang, key)
            .or_else(|| self.lookup(Language::En, key))
            .unwrap_or(key)
    }

    /// Every English key with its label in `lang`.
    pub fn for_language(&self, lang: Language) -> BTreeMap<String, String> {
        let mut labels = self.by_language.get(&Language::En).cloned().unwrap_or_default();
        if let Some(translated) = self.by_language.get(&lang) {
            for (key, value) in translated {
                labels.insert(key.clone(), value.clone());
            }
        }
        labels
    }

    fn lookup(&self, lang: Language, key: &str) -> Option<&str> {
        self.by_language
            .get(&lang)
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }
}
