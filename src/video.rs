use serde::Serialize;
use url::Url;

use crate::content::types::Lesson;

const EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Extract the video id from `youtube.com/watch?v=ID`, `youtu.be/ID`
/// or `.../embed/ID`. Anything else, including unparsable text, is `None`.
pub fn youtube_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str().unwrap_or("");

    if host.contains("youtube.com") {
        if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
            return non_empty(&v);
        }
    }

    if host == "youtu.be" {
        return non_empty(parsed.path().trim_start_matches('/'));
    }

    if let Some(rest) = parsed.path().strip_prefix("/embed/") {
        return non_empty(rest.split('/').next().unwrap_or(""));
    }

    None
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Privacy-enhanced embed URL (no tracking cookies).
pub fn embed_url(raw: &str) -> Option<String> {
    youtube_video_id(raw).map(|id| format!("{}{}", EMBED_BASE, id))
}

/// What the lesson detail view needs. `embed_url` is `None` when the lesson
/// has no video or its URL is not recognised; the page then links out.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail<'a> {
    pub lesson: &'a Lesson,
    pub embed_url: Option<String>,
}

impl<'a> LessonDetail<'a> {
    pub fn new(lesson: &'a Lesson) -> Self {
        LessonDetail {
            lesson,
            embed_url: lesson.youtube_url.as_deref().and_then(embed_url),
        }
    }
}
