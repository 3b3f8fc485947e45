//! Hand-curated course and topic metadata.
//!
//! Only the [`CORE_COURSES`] and the topics belonging to them get pages and sitemap entries.
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ContentError;

/// Courses that get pages, in the order they are listed.
pub const CORE_COURSES: [&str; 5] = [
    "quantitative-aptitude",
    "logical-reasoning",
    "verbal-ability",
    "data-interpretation",
    "general-awareness",
];

const EMBEDDED_CURATED_CONTENT: &str = include_str!("../data/curated.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CuratedEntry {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CuratedContent {
    #[serde(default)]
    pub courses: BTreeMap<String, CuratedEntry>,
    #[serde(default)]
    pub topics: BTreeMap<String, CuratedEntry>,
}

impl CuratedContent {
    /// The curated content shipped with quizpress.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_CURATED_CONTENT, "embedded curated content")
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json, &path.display().to_string())
    }

    pub fn from_json(json: &str, origin: &str) -> Result<Self, ContentError> {
        serde_json::from_str(json).map_err(|source| ContentError::ParseFailed {
            origin: origin.to_string(),
            source,
        })
    }

    /// Core courses present in the curated content, in [`CORE_COURSES`] order.
    pub fn core_courses(&self) -> impl Iterator<Item = (&str, &CuratedEntry)> {
        CORE_COURSES
            .iter()
            .filter_map(|slug| self.courses.get(*slug).map(|course| (*slug, course)))
    }

    /// Topics belonging to a core course, in slug order.
    pub fn core_topics(&self) -> impl Iterator<Item = (&str, &CuratedEntry)> {
        self.topics
            .iter()
            .filter(|(_, topic)| course_of_topic_path(&topic.path).is_some_and(is_core_course))
            .map(|(slug, topic)| (slug.as_str(), topic))
    }

    /// Core topics of one course, in slug order.
    pub fn topics_of_course<'a>(
        &'a self,
        course_slug: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a CuratedEntry)> {
        self.topics
            .iter()
            .filter(move |(_, topic)| course_of_topic_path(&topic.path) == Some(course_slug))
            .map(|(slug, topic)| (slug.as_str(), topic))
    }
}

pub fn is_core_course(slug: &str) -> bool {
    CORE_COURSES.contains(&slug)
}

/// The course a topic belongs to: the third `/`-separated segment of its path (`/courses/<course>/<topic>`).
pub fn course_of_topic_path(path: &str) -> Option<&str> {
    path.split('/').nth(2).filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURATED: &str = r#"{
        "courses": {
            "verbal-ability": { "title": "Verbal", "path": "/courses/verbal-ability" },
            "quantitative-aptitude": { "title": "Quant", "path": "/courses/quantitative-aptitude" },
            "cooking": { "title": "Cooking", "path": "/courses/cooking" }
        },
        "topics": {
            "ratios": { "title": "Ratios", "path": "/courses/quantitative-aptitude/ratios" },
            "baking": { "title": "Baking", "path": "/courses/cooking/baking" },
            "grammar": { "title": "Grammar", "path": "/courses/verbal-ability/grammar" },
            "orphan": { "title": "Orphan", "path": "orphan" }
        }
    }"#;

    #[test]
    fn test_course_of_topic_path() {
        assert_eq!(
            course_of_topic_path("/courses/quantitative-aptitude/ratios"),
            Some("quantitative-aptitude")
        );
        assert_eq!(course_of_topic_path("/courses"), None);
        assert_eq!(course_of_topic_path("/courses//ratios"), None);
    }

    #[test]
    fn test_core_courses_follow_allow_list_order() {
        let curated = CuratedContent::from_json(CURATED, "test").unwrap();
        let slugs: Vec<_> = curated.core_courses().map(|(slug, _)| slug).collect();
        assert_eq!(slugs, vec!["quantitative-aptitude", "verbal-ability"]);
    }

    #[test]
    fn test_core_topics_are_filtered_by_course() {
        let curated = CuratedContent::from_json(CURATED, "test").unwrap();
        let slugs: Vec<_> = curated.core_topics().map(|(slug, _)| slug).collect();
        assert_eq!(slugs, vec!["grammar", "ratios"]);

        let quant: Vec<_> = curated
            .topics_of_course("quantitative-aptitude")
            .map(|(slug, _)| slug)
            .collect();
        assert_eq!(quant, vec!["ratios"]);
    }

    #[test]
    fn test_embedded_content_parses() {
        let curated = CuratedContent::embedded().unwrap();
        assert_eq!(curated.core_courses().count(), CORE_COURSES.len());
        assert!(curated.core_topics().count() > 0);
        assert!(curated.core_topics().all(|(_, topic)| topic.path.starts_with("/courses/")));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let error = CuratedContent::from_json("{ nope", "broken.json").unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let error = CuratedContent::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(error, ContentError::ReadFailed { .. }));
    }
}
