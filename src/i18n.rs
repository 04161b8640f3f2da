//! UI strings in English and Hebrew.
//!
//! Keys look like `library.title`. A missing Hebrew string falls back to
//! English, and a key missing from both comes back unchanged. `{{name}}`
//! tokens are replaced from the params. A numeric `count` param picks the
//! `_one`, `_two` or `_other` form of the key when the table has it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::ContentError;
use crate::preferences::Language;

const BUNDLED_EN: &str = include_str!("../content/i18n/en.json");
const BUNDLED_HE: &str = include_str!("../content/i18n/he.json");

/// One interpolation value. Numbers are printed without a trailing `.0`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Param {
    Number(f64),
    Text(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Number(n) => write!(f, "{}", n),
            Param::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<f64> for Param {
    fn from(n: f64) -> Self {
        Param::Number(n)
    }
}

pub type Params = BTreeMap<String, Param>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluralCategory {
    One,
    Two,
    Other,
}

impl PluralCategory {
    fn suffix(self) -> &'static str {
        match self {
            PluralCategory::One => "_one",
            PluralCategory::Two => "_two",
            PluralCategory::Other => "_other",
        }
    }
}

/// CLDR cardinal rules for the two supported languages.
pub fn plural_category(language: Language, count: f64) -> PluralCategory {
    let n = count.abs();
    let integer = n.fract() == 0.0;
    match language {
        Language::En if integer && n == 1.0 => PluralCategory::One,
        Language::En => PluralCategory::Other,
        Language::He if integer && n == 1.0 => PluralCategory::One,
        Language::He if integer && n == 2.0 => PluralCategory::Two,
        Language::He if !integer && n < 1.0 => PluralCategory::One,
        Language::He => PluralCategory::Other,
    }
}

type Table = BTreeMap<String, String>;

pub struct Translations {
    en: Table,
    he: Table,
}

impl Translations {
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_sources(BUNDLED_EN, BUNDLED_HE)
    }

    pub fn from_sources(en_json: &str, he_json: &str) -> Result<Self, ContentError> {
        let parse = |source_name: &'static str, text: &str| -> Result<Table, ContentError> {
            serde_json::from_str(text).map_err(|error| ContentError::Json { source_name, error })
        };
        Ok(Translations {
            en: parse("i18n/en.json", en_json)?,
            he: parse("i18n/he.json", he_json)?,
        })
    }

    fn table(&self, language: Language) -> &Table {
        match language {
            Language::En => &self.en,
            Language::He => &self.he,
        }
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.table(language)
            .get(key)
            .or_else(|| self.en.get(key))
            .map(String::as_str)
    }

    /// English keys the given language has no string for.
    pub fn missing_keys(&self, language: Language) -> Vec<&str> {
        let table = self.table(language);
        self.en
            .keys()
            .filter(|k| !table.contains_key(*k))
            .map(String::as_str)
            .collect()
    }

    pub fn translate(&self, language: Language, key: &str, params: &Params) -> String {
        let plural = match params.get("count") {
            Some(Param::Number(count)) => Some(plural_category(language, *count)),
            _ => None,
        };

        let mut candidates = Vec::with_capacity(3);
        if let Some(category) = plural {
            candidates.push(format!("{}{}", key, category.suffix()));
            if category != PluralCategory::Other {
                candidates.push(format!("{}{}", key, PluralCategory::Other.suffix()));
            }
        }
        candidates.push(key.to_string());

        let found = candidates.iter().find_map(|k| self.lookup(language, k));
        let mut text = match found {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!("No translation for {}", key);
                key.to_string()
            }
        };

        for (name, value) in params {
            text = text.replace(&format!("{{{{{}}}}}", name), &value.to_string());
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, Param)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn small() -> Translations {
        Translations::from_sources(
            r#"{
                "home.title": "Drum Trainer",
                "only.english": "English only",
                "lessons_one": "{{count}} lesson",
                "lessons_other": "{{count}} lessons",
                "greeting": "Hi {{name}}, {{name}}!"
            }"#,
            r#"{
                "home.title": "מאמן התופים",
                "lessons_one": "שיעור {{count}}",
                "lessons_other": "{{count}} שיעורים"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_fallbacks() {
        let t = small();
        let none = Params::new();
        assert_eq!(t.translate(Language::He, "home.title", &none), "מאמן התופים");
        assert_eq!(t.translate(Language::He, "only.english", &none), "English only");
        assert_eq!(t.translate(Language::En, "no.such.key", &none), "no.such.key");
        assert_eq!(t.translate(Language::He, "no.such.key", &none), "no.such.key");
    }

    #[test]
    fn test_interpolation_replaces_every_token() {
        let t = small();
        let p = params(&[("name", "Sam".into())]);
        assert_eq!(t.translate(Language::En, "greeting", &p), "Hi Sam, Sam!");
        // Unknown params leave the text alone.
        let p = params(&[("other", "x".into())]);
        assert_eq!(t.translate(Language::En, "greeting", &p), "Hi {{name}}, {{name}}!");
    }

    #[test]
    fn test_plurals() {
        let t = small();
        let count = |n: f64| params(&[("count", n.into())]);
        assert_eq!(t.translate(Language::En, "lessons", &count(1.0)), "1 lesson");
        assert_eq!(t.translate(Language::En, "lessons", &count(5.0)), "5 lessons");
        assert_eq!(t.translate(Language::En, "lessons", &count(0.0)), "0 lessons");
        assert_eq!(t.translate(Language::He, "lessons", &count(1.0)), "שיעור 1");
        // Hebrew "two" has no string of its own and uses the plural one.
        assert_eq!(t.translate(Language::He, "lessons", &count(2.0)), "2 שיעורים");
    }

    #[test]
    fn test_text_count_is_not_plural() {
        let t = small();
        let p = params(&[("count", "1".into())]);
        assert_eq!(t.translate(Language::En, "lessons", &p), "lessons");
    }

    #[test]
    fn test_plural_categories() {
        assert_eq!(plural_category(Language::En, 1.0), PluralCategory::One);
        assert_eq!(plural_category(Language::En, 1.5), PluralCategory::Other);
        assert_eq!(plural_category(Language::He, 2.0), PluralCategory::Two);
        assert_eq!(plural_category(Language::He, 0.5), PluralCategory::One);
        assert_eq!(plural_category(Language::He, 11.0), PluralCategory::Other);
    }

    #[test]
    fn test_bundled_tables() {
        let t = Translations::bundled().unwrap();
        assert!(t.missing_keys(Language::He).is_empty());
        let p = params(&[("current", 2.0.into()), ("total", 4.0.into())]);
        assert_eq!(t.translate(Language::En, "exercise.progress", &p), "Exercise 2 of 4");
        let p = params(&[("count", 3.0.into()), ("query", "rock".into())]);
        assert_eq!(
            t.translate(Language::En, "library.searchResultCount", &p),
            r#"3 results for "rock""#
        );
        assert_eq!(
            t.translate(Language::En, "completion.fallbackMessage", &Params::new()),
            crate::config::FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Translations::from_sources("{", "{}"),
            Err(ContentError::Json { source_name: "i18n/en.json", .. })
        ));
    }
}
