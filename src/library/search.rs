//! Typo-tolerant search over lesson titles, descriptions and link titles.
//!
//! Each field gets a score in [0, 1], 0 being an exact (case-insensitive)
//! substring hit. Otherwise the query is compared with strsim's normalized
//! Damerau-Levenshtein against every run of consecutive words in the field
//! that has as many words as the query, and against the start of that run
//! (so a half-typed word still finds its match).

use serde::Serialize;

use crate::config::SearchConfig;
use crate::content::Lesson;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "links.title")]
    LinkTitle,
}

/// Where a query hit inside one field value.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchMatch {
    pub field: MatchField,
    pub value: String,
    /// Inclusive character ranges into `value`.
    pub indices: Vec<[usize; 2]>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    pub lesson: &'a Lesson,
    pub matches: Vec<SearchMatch>,
    /// 0 is a perfect match; lower sorts first.
    pub score: f64,
    /// Field the "matched in ..." hint should name.
    pub matched_field: Option<MatchField>,
}

impl<'a> SearchResult<'a> {
    fn new(lesson: &'a Lesson, matches: Vec<SearchMatch>, score: f64) -> Self {
        let matched_field = preferred_field(&matches);
        SearchResult {
            lesson,
            matches,
            score,
            matched_field,
        }
    }
}

/// Title beats description beats link title; otherwise the first match.
pub fn preferred_field(matches: &[SearchMatch]) -> Option<MatchField> {
    [MatchField::Title, MatchField::Description, MatchField::LinkTitle]
        .into_iter()
        .find(|f| matches.iter().any(|m| m.field == *f))
        .or_else(|| matches.first().map(|m| m.field))
}

struct FieldScore {
    score: f64,
    indices: Vec<[usize; 2]>,
}

/// One lowercase char per input char, so positions line up with the original.
fn fold(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// (start, end) char spans of whitespace-separated words, end exclusive.
fn word_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in chars.iter().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, chars.len()));
    }
    spans
}

/// Edit distance over the longer length, straight on the folded chars.
fn distance(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    strsim::generic_damerau_levenshtein(a, b) as f64 / longest as f64
}

fn score_field(query: &[char], query_words: usize, value: &str) -> FieldScore {
    let chars = fold(value);
    let m = query.len();

    let mut exact = Vec::new();
    let mut i = 0;
    while m > 0 && i + m <= chars.len() {
        if chars[i..i + m] == *query {
            exact.push([i, i + m - 1]);
            i += m;
        } else {
            i += 1;
        }
    }
    if !exact.is_empty() {
        return FieldScore {
            score: 0.0,
            indices: exact,
        };
    }

    let words = word_spans(&chars);
    if words.is_empty() {
        return FieldScore {
            score: 1.0,
            indices: Vec::new(),
        };
    }

    let k = query_words.clamp(1, words.len());
    let mut best = FieldScore {
        score: 1.0,
        indices: Vec::new(),
    };
    for window in words.windows(k) {
        let start = window[0].0;
        let end = window[k - 1].1;

        let full = distance(query, &chars[start..end]);
        if full < best.score {
            best = FieldScore {
                score: full,
                indices: vec![[start, end - 1]],
            };
        }

        if end - start > m {
            let prefix = distance(query, &chars[start..start + m]);
            if prefix < best.score {
                best = FieldScore {
                    score: prefix,
                    indices: vec![[start, start + m - 1]],
                };
            }
        }
    }
    best
}

/// Search `lessons` for `query`, best match first.
///
/// The query is trimmed and lowercased before matching; a blank query
/// returns nothing. Results with equal scores keep their order in `lessons`.
pub fn search<'a>(lessons: &'a [Lesson], query: &str, config: &SearchConfig) -> Vec<SearchResult<'a>> {
    let query = fold(query.trim());
    if query.is_empty() {
        return Vec::new();
    }
    let query_words = word_spans(&query).len();
    let max_weight = config.max_weight();

    let mut results: Vec<SearchResult<'a>> = Vec::new();
    for lesson in lessons {
        let mut fields: Vec<(MatchField, &str, f64)> = vec![(MatchField::Title, lesson.title.as_str(), config.title_weight)];
        if let Some(description) = &lesson.description {
            fields.push((MatchField::Description, description.as_str(), config.description_weight));
        }
        for link in &lesson.links {
            fields.push((MatchField::LinkTitle, link.title.as_str(), config.link_title_weight));
        }

        let mut matches = Vec::new();
        let mut score = f64::INFINITY;
        for (field, value, weight) in fields {
            if weight <= 0.0 {
                continue;
            }
            let field_score = score_field(&query, query_words, value);
            if field_score.score > config.threshold {
                continue;
            }
            score = score.min((field_score.score * max_weight / weight).min(1.0));
            matches.push(SearchMatch {
                field,
                value: value.to_string(),
                indices: field_score.indices,
            });
        }

        if !matches.is_empty() {
            results.push(SearchResult::new(lesson, matches, score));
        }
    }

    results.sort_by(|a, b| a.score.total_cmp(&b.score));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::{LessonLink, LessonType};
    use crate::content::ContentModel;
    use pretty_assertions::assert_eq;

    fn lesson(id: &str, title: &str, description: Option<&str>, links: &[&str]) -> Lesson {
        Lesson {
            id: id.to_string(),
            lesson_type: LessonType::Song,
            title: title.to_string(),
            description: description.map(str::to_string),
            difficulty: None,
            youtube_url: None,
            links: links
                .iter()
                .map(|t| LessonLink {
                    title: t.to_string(),
                    url: "https://example.com".to_string(),
                })
                .collect(),
        }
    }

    fn result_ids<'a>(results: &[SearchResult<'a>]) -> Vec<&'a str> {
        results.iter().map(|r| r.lesson.id.as_str()).collect()
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let lessons = vec![lesson("a", "Paradiddle", None, &[])];
        let cfg = SearchConfig::default();
        assert!(search(&lessons, "", &cfg).is_empty());
        assert!(search(&lessons, "   \t", &cfg).is_empty());
    }

    #[test]
    fn test_exact_substring_scores_zero() {
        let lessons = vec![lesson("a", "Single Stroke Roll", None, &[])];
        let results = search(&lessons, "stroke", &SearchConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[0].matches[0].indices, vec![[7, 12]]);
    }

    #[test]
    fn test_typo_matches_title() {
        let lessons = vec![lesson("a", "Paradiddle", Some("A rudiment"), &[])];
        let results = search(&lessons, "paradidle", &SearchConfig::default());
        assert_eq!(result_ids(&results), vec!["a"]);
        assert!(results[0].score > 0.0 && results[0].score <= 0.4);
        assert_eq!(results[0].matches[0].field, MatchField::Title);
    }

    #[test]
    fn test_prefix_while_typing() {
        let lessons = vec![lesson("a", "Metallica Medley", None, &[])];
        let results = search(&lessons, "metl", &SearchConfig::default());
        assert_eq!(result_ids(&results), vec!["a"]);
        assert_eq!(results[0].matches[0].indices, vec![[0, 3]]);
    }

    #[test]
    fn test_unrelated_query_no_match() {
        let lessons = vec![lesson("a", "Paradiddle", Some("RLRR LRLL"), &["Rudiment chart"])];
        assert!(search(&lessons, "xylophone", &SearchConfig::default()).is_empty());
    }

    #[test]
    fn test_title_preferred_over_description() {
        let lessons = vec![lesson("a", "Disco Beat", Some("A disco groove"), &[])];
        let results = search(&lessons, "disco", &SearchConfig::default());
        let fields: Vec<MatchField> = results[0].matches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec![MatchField::Title, MatchField::Description]);
        assert_eq!(results[0].matched_field, Some(MatchField::Title));
    }

    #[test]
    fn test_preferred_field_precedence() {
        let m = |field| SearchMatch {
            field,
            value: String::new(),
            indices: Vec::new(),
        };
        assert_eq!(preferred_field(&[]), None);
        assert_eq!(
            preferred_field(&[m(MatchField::LinkTitle), m(MatchField::Description)]),
            Some(MatchField::Description)
        );
        assert_eq!(preferred_field(&[m(MatchField::LinkTitle)]), Some(MatchField::LinkTitle));
    }

    #[test]
    fn test_link_titles_matched_individually() {
        let lessons = vec![lesson("a", "Back in Black", None, &["Drum transcription", "Slow practice track"])];
        let results = search(&lessons, "practice", &SearchConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matches.len(), 1);
        assert_eq!(results[0].matches[0].value, "Slow practice track");
        assert_eq!(results[0].matched_field, Some(MatchField::LinkTitle));
    }

    #[test]
    fn test_ordering_best_first_ties_stable() {
        let lessons = vec![
            lesson("typo", "Paradidle Fun", None, &[]),
            lesson("exact1", "Paradiddle", None, &[]),
            lesson("exact2", "Paradiddle Two", None, &[]),
        ];
        let results = search(&lessons, "paradiddle", &SearchConfig::default());
        assert_eq!(result_ids(&results), vec!["exact1", "exact2", "typo"]);
    }

    #[test]
    fn test_query_is_trimmed_before_matching() {
        let lessons = vec![lesson("a", "Disco Beat", None, &[])];
        let cfg = SearchConfig::default();
        assert_eq!(search(&lessons, "  disco  ", &cfg), search(&lessons, "disco", &cfg));
        assert_eq!(search(&lessons, "  disco  ", &cfg)[0].score, 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let lessons = vec![lesson("a", "Seven Nation Army", None, &[])];
        let results = search(&lessons, "NATION", &SearchConfig::default());
        assert_eq!(results[0].matches[0].indices, vec![[6, 11]]);
    }

    #[test]
    fn test_strict_threshold() {
        let lessons = vec![lesson("a", "Paradiddle", None, &[])];
        let cfg = SearchConfig {
            threshold: 0.0,
            ..SearchConfig::default()
        };
        assert!(search(&lessons, "paradidle", &cfg).is_empty());
        assert_eq!(search(&lessons, "paradiddle", &cfg).len(), 1);
    }

    #[test]
    fn test_distance_matches_strsim() {
        let pairs = [("paradidle", "paradiddle"), ("metl", "meta"), ("rock", "rokc"), ("", "")];
        for (a, b) in pairs {
            let expected = 1.0 - strsim::normalized_damerau_levenshtein(a, b);
            let got = distance(&fold(a), &fold(b));
            assert!((got - expected).abs() < 1e-9, "{} vs {}: {} != {}", a, b, got, expected);
        }
    }

    #[test]
    fn test_bundled_library() {
        let content = ContentModel::bundled().unwrap();
        let results = search(content.lessons(), "rock", &SearchConfig::default());
        let ids = result_ids(&results);
        assert!(ids.contains(&"we-will-rock-you"));
        assert!(ids.contains(&"basic-rock-beat"));
    }
}
