//! Public URL paths of the generated pages, and where their files land in the output directory.
use std::path::{Path, PathBuf};

use slug::slugify;

pub fn question_path(slug: &str) -> String {
    format!("/questions/{slug}")
}

pub fn exam_path(exam: &str) -> String {
    format!("/exams/{}", slugify(exam))
}

pub fn exam_topic_path(exam: &str, topic: &str) -> String {
    format!("/exams/{}/{}", slugify(exam), slugify(topic))
}

/// Joins a site URL (with or without a trailing slash) and an absolute path.
pub fn absolute_url(site_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// File a page is written to, e.g. `/exams/ssc` becomes `<output_dir>/exams/ssc/index.html`.
pub fn page_file_path(output_dir: &Path, path: &str) -> PathBuf {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(trimmed).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_slugified() {
        assert_eq!(exam_path("SSC CGL"), "/exams/ssc-cgl");
        assert_eq!(
            exam_topic_path("JEE Main", "Time & Work"),
            "/exams/jee-main/time-work"
        );
        assert_eq!(question_path("abc-1"), "/questions/abc-1");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://example.com/", "/questions/a"),
            "https://example.com/questions/a"
        );
        assert_eq!(
            absolute_url("https://example.com", "questions/a"),
            "https://example.com/questions/a"
        );
        assert_eq!(absolute_url("https://example.com", "/"), "https://example.com/");
    }

    #[test]
    fn test_page_file_path() {
        let out = Path::new("dist");
        assert_eq!(page_file_path(out, "/"), out.join("index.html"));
        assert_eq!(
            page_file_path(out, "/exams/ssc/"),
            out.join("exams/ssc").join("index.html")
        );
    }
}
