//! The Library: browse lessons by type, or search them as you type.
//!
//! A non-blank query switches to search mode; clearing it returns to the
//! browse view with whatever type filter was selected.

pub mod browse;
pub mod search;

use std::rc::Rc;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::content::{ContentModel, Lesson};

pub use browse::{filter_tabs, group_by_type, FilterTab, LessonGroup, TypeFilter};
pub use search::{MatchField, SearchMatch, SearchResult};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LibraryMode {
    Browse,
    Search,
}

/// Everything the Library page can show. Each empty case is its own variant
/// so the page can word them differently.
#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "view", content = "data", rename_all = "camelCase")]
pub enum LibraryView<'a> {
    /// No lessons exist at all.
    EmptyLibrary,
    /// Lessons exist, but none of the filtered type.
    NoLessonsForFilter(TypeFilter),
    Grouped(Vec<LessonGroup<'a>>),
    Flat(Vec<&'a Lesson>),
    /// The (trimmed) query found nothing.
    NoSearchResults(String),
    SearchResults(Vec<SearchResult<'a>>),
}

pub struct Library {
    content: Rc<ContentModel>,
    config: SearchConfig,
    query: String,
    filter: TypeFilter,
}

impl Library {
    pub fn new(content: Rc<ContentModel>) -> Self {
        Self::with_config(content, SearchConfig::default())
    }

    pub fn with_config(content: Rc<ContentModel>, config: SearchConfig) -> Self {
        Library {
            content,
            config,
            query: String::new(),
            filter: TypeFilter::All,
        }
    }

    /// Store the query, cut to `max_query_length` characters.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.chars().take(self.config.max_query_length).collect();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_query(&self) -> &str {
        self.query.trim()
    }

    pub fn mode(&self) -> LibraryMode {
        if self.active_query().is_empty() {
            LibraryMode::Browse
        } else {
            LibraryMode::Search
        }
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Tabs are counted over the whole library, not the current view.
    pub fn filter_tabs(&self) -> Vec<FilterTab> {
        filter_tabs(self.content.lessons())
    }

    pub fn search(&self) -> Vec<SearchResult<'_>> {
        match self.mode() {
            LibraryMode::Search => search::search(self.content.lessons(), self.active_query(), &self.config),
            LibraryMode::Browse => Vec::new(),
        }
    }

    pub fn filtered_lessons(&self) -> Vec<&Lesson> {
        self.content
            .lessons()
            .iter()
            .filter(|l| self.filter.accepts(l))
            .collect()
    }

    pub fn view(&self) -> LibraryView<'_> {
        if self.content.lessons().is_empty() {
            return LibraryView::EmptyLibrary;
        }

        if self.mode() == LibraryMode::Search {
            let results = self.search();
            return if results.is_empty() {
                LibraryView::NoSearchResults(self.active_query().to_string())
            } else {
                LibraryView::SearchResults(results)
            };
        }

        let lessons = self.filtered_lessons();
        if lessons.is_empty() {
            return LibraryView::NoLessonsForFilter(self.filter);
        }
        match self.filter {
            TypeFilter::All => LibraryView::Grouped(group_by_type(&lessons)),
            TypeFilter::Only(_) => LibraryView::Flat(lessons),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_QUERY_LENGTH;
    use crate::content::LessonType;

    const LESSONS: &str = r#"
- { id: s1, type: song, title: We Will Rock You }
- { id: s2, type: song, title: Back in Black, description: Straight eighths }
- { id: f1, type: fundamental, title: Paradiddle }
"#;

    fn library(lessons: &str) -> Library {
        Library::new(Rc::new(ContentModel::from_sources(lessons, "", "").unwrap()))
    }

    #[test]
    fn test_blank_query_is_browse_mode() {
        let mut lib = library(LESSONS);
        assert_eq!(lib.mode(), LibraryMode::Browse);
        lib.set_query("   ");
        assert_eq!(lib.mode(), LibraryMode::Browse);
        assert!(lib.search().is_empty());
        assert!(matches!(lib.view(), LibraryView::Grouped(_)));
    }

    #[test]
    fn test_query_clamped() {
        let mut lib = library(LESSONS);
        let long = "é".repeat(MAX_QUERY_LENGTH + 20);
        lib.set_query(&long);
        assert_eq!(lib.query().chars().count(), MAX_QUERY_LENGTH);
    }

    #[test]
    fn test_active_query_trimmed() {
        let mut lib = library(LESSONS);
        lib.set_query("  rock ");
        assert_eq!(lib.query(), "  rock ");
        assert_eq!(lib.active_query(), "rock");
        assert_eq!(lib.mode(), LibraryMode::Search);
    }

    #[test]
    fn test_all_view_groups() {
        let lib = library(LESSONS);
        match lib.view() {
            LibraryView::Grouped(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!((groups[0].lesson_type, groups[0].count()), (LessonType::Song, 2));
                assert_eq!((groups[1].lesson_type, groups[1].count()), (LessonType::Fundamental, 1));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_type_filter_is_flat() {
        let mut lib = library(LESSONS);
        lib.set_filter(TypeFilter::Only(LessonType::Fundamental));
        match lib.view() {
            LibraryView::Flat(lessons) => {
                assert_eq!(lessons.len(), 1);
                assert_eq!(lessons[0].id, "f1");
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_distinct_empty_states() {
        assert_eq!(library("").view(), LibraryView::EmptyLibrary);

        let mut lib = library(LESSONS);
        lib.set_filter(TypeFilter::Only(LessonType::DrumBeat));
        assert_eq!(
            lib.view(),
            LibraryView::NoLessonsForFilter(TypeFilter::Only(LessonType::DrumBeat))
        );

        lib.set_query(" zzzzqqq ");
        assert_eq!(lib.view(), LibraryView::NoSearchResults("zzzzqqq".to_string()));
    }

    #[test]
    fn test_search_ignores_type_filter() {
        let mut lib = library(LESSONS);
        lib.set_filter(TypeFilter::Only(LessonType::Fundamental));
        lib.set_query("rock");
        match lib.view() {
            LibraryView::SearchResults(results) => assert_eq!(results[0].lesson.id, "s1"),
            other => panic!("unexpected view {:?}", other),
        }
        // Filter is remembered for when the query is cleared.
        lib.set_query("");
        assert!(matches!(lib.view(), LibraryView::Flat(_)));
    }

    #[test]
    fn test_tabs_from_full_corpus() {
        let mut lib = library(LESSONS);
        lib.set_filter(TypeFilter::Only(LessonType::Song));
        let tabs = lib.filter_tabs();
        assert_eq!(tabs.len(), 3);
        assert!(!tabs.iter().any(|t| t.filter == TypeFilter::Only(LessonType::DrumBeat)));
    }
}
