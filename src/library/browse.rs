use serde::{Deserialize, Serialize};

use crate::content::{Lesson, LessonType};

/// Which lesson types the browse view shows.
///
/// On the wire this is the same string `parse` accepts, so a tab's filter
/// can be handed straight back to `library_set_filter`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(into = "String", try_from = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(LessonType),
}

impl TypeFilter {
    /// `"all"` or a lesson type name.
    pub fn parse(s: &str) -> Option<TypeFilter> {
        if s == "all" {
            Some(TypeFilter::All)
        } else {
            LessonType::parse(s).map(TypeFilter::Only)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(t) => t.as_str(),
        }
    }

    pub fn accepts(self, lesson: &Lesson) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => lesson.lesson_type == t,
        }
    }
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> String {
        filter.as_str().to_string()
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TypeFilter::parse(&s).ok_or_else(|| format!("unknown filter: {}", s))
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterTab {
    pub filter: TypeFilter,
    pub count: usize,
}

/// "All" first, then one tab per type that has at least one lesson.
pub fn filter_tabs(lessons: &[Lesson]) -> Vec<FilterTab> {
    let mut tabs = vec![FilterTab {
        filter: TypeFilter::All,
        count: lessons.len(),
    }];
    for t in LessonType::ALL {
        let count = lessons.iter().filter(|l| l.lesson_type == t).count();
        if count > 0 {
            tabs.push(FilterTab {
                filter: TypeFilter::Only(t),
                count,
            });
        }
    }
    tabs
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonGroup<'a> {
    pub lesson_type: LessonType,
    pub lessons: Vec<&'a Lesson>,
}

impl LessonGroup<'_> {
    pub fn count(&self) -> usize {
        self.lessons.len()
    }
}

/// Split into song / drum-beat / fundamental sections, skipping empty ones.
pub fn group_by_type<'a>(lessons: &[&'a Lesson]) -> Vec<LessonGroup<'a>> {
    LessonType::ALL
        .into_iter()
        .map(|t| LessonGroup {
            lesson_type: t,
            lessons: lessons.iter().copied().filter(|l| l.lesson_type == t).collect(),
        })
        .filter(|g| !g.lessons.is_empty())
        .collect()
}
