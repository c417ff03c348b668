use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the catalog is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "ru")]
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Id, Language::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Id => "id",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "id" => Ok(Language::Id),
            "ru" => Ok(Language::Ru),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Text stored in every supported language. English is mandatory and is the
/// fallback for any translation that is missing or empty.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ru: Option<String>,
}

impl LocalizedText {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            id: None,
            ru: None,
        }
    }

    pub fn new(en: impl Into<String>, id: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            id: Some(id.into()),
            ru: Some(ru.into()),
        }
    }

    pub fn get(&self, lang: Language) -> &str {
        let translated = match lang {
            Language::En => None,
            Language::Id => self.id.as_deref(),
            Language::Ru => self.ru.as_deref(),
        };

        match translated {
            Some(text) if !text.is_empty() => text,
            _ => &self.en,
        }
    }

    pub fn has_english(&self) -> bool {
        !self.en.trim().is_empty()
    }
}

pub fn resolve(text: &LocalizedText, lang: Language) -> String {
    text.get(lang).to_string()
}

pub fn resolve_list(texts: &[LocalizedText], lang: Language) -> Vec<String> {
    texts.iter().map(|text| resolve(text, lang)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_codes() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!("ID".parse::<Language>(), Ok(Language::Id));
        assert_eq!(" ru ".parse::<Language>(), Ok(Language::Ru));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_resolve_prefers_requested_language() {
        let text = LocalizedText::new("Beach", "Pantai", "Пляж");
        assert_eq!(resolve(&text, Language::En), "Beach");
        assert_eq!(resolve(&text, Language::Id), "Pantai");
        assert_eq!(resolve(&text, Language::Ru), "Пляж");
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        let missing = LocalizedText::english("Beach");
        assert_eq!(resolve(&missing, Language::Ru), "Beach");

        let empty = LocalizedText {
            en: "Beach".to_string(),
            id: Some(String::new()),
            ru: None,
        };
        assert_eq!(resolve(&empty, Language::Id), "Beach");
    }

    #[test]
    fn test_resolve_list_keeps_order() {
        let texts = vec![
            LocalizedText::new("One", "Satu", "Один"),
            LocalizedText::english("Two"),
            LocalizedText::new("Three", "Tiga", "Три"),
        ];
        assert_eq!(
            resolve_list(&texts, Language::Id),
            vec!["Satu", "Two", "Tiga"]
        );
        assert!(resolve_list(&[], Language::Ru).is_empty());
    }

    #[test]
    fn test_missing_english_fails_to_deserialize() {
        let result: Result<LocalizedText, _> =
            serde_json::from_value(serde_json::json!({ "id": "Pantai", "ru": "Пляж" }));
        assert!(result.is_err());
    }
}
