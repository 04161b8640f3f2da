use serde::Serialize;

use crate::config::{LANGUAGE_KEY, THEME_KEY};
use crate::storage::KeyValueStore;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Ocean,
    Sunset,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Ocean, Theme::Sunset];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn next(self) -> Theme {
        cycle(&Theme::ALL, self)
    }
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::He];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.as_str() == s)
    }

    pub fn next(self) -> Language {
        cycle(&Language::ALL, self)
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::En => Direction::Ltr,
            Language::He => Direction::Rtl,
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let idx = all.iter().position(|&t| t == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// Theme and language, remembered across visits in profile storage.
pub struct Preferences {
    theme: Theme,
    language: Language,
    store: Box<dyn KeyValueStore>,
}

impl Preferences {
    /// Unknown or unreadable values fall back to the defaults.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not read preference {}: {}", key, e);
                None
            }
        };
        let theme = read(THEME_KEY).as_deref().and_then(Theme::parse).unwrap_or_default();
        let language = read(LANGUAGE_KEY)
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default();

        Preferences { theme, language, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist(THEME_KEY, theme.as_str());
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.persist(LANGUAGE_KEY, language.as_str());
    }

    pub fn cycle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.next());
        self.theme
    }

    pub fn cycle_language(&mut self) -> Language {
        self.set_language(self.language.next());
        self.language
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Could not save preference {}: {}", key, e);
        }
    }
}
