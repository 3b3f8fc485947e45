use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::{
    curated::{CORE_COURSES, CuratedContent},
    errors::BuildError,
    index::QuestionIndexes,
    question::Question,
    routes::{absolute_url, exam_path, exam_topic_path},
    seo::SeoMap,
};

pub const SITEMAP_FILENAME: &str = "sitemap.xml";
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml";
pub const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600";
/// Per-path response headers file read by static hosts.
pub const HEADERS_FILENAME: &str = "_headers";

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Change frequency values for sitemap entries.
///
/// See: https://www.sitemaps.org/protocol.html#changefreqdef for more details.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    fn as_str(&self) -> &str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// A page of the site that is not generated from questions, listed in the sitemap as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRoute {
    pub path: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl StaticRoute {
    pub fn new(path: impl Into<String>, changefreq: ChangeFreq, priority: f32) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority,
        }
    }
}

/// Represents a single URL entry in the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f32>,
}

impl SitemapEntry {
    fn to_xml(&self) -> String {
        let mut xml = String::from("<url>");
        xml.push_str(&format!("<loc>{}</loc>", escape_xml(&self.loc)));

        if let Some(lastmod) = self.lastmod {
            xml.push_str(&format!("<lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d")));
        }

        if let Some(changefreq) = self.changefreq {
            xml.push_str(&format!("<changefreq>{}</changefreq>", changefreq.as_str()));
        }

        if let Some(priority) = self.priority {
            xml.push_str(&format!("<priority>{:.1}</priority>", priority));
        }

        xml.push_str("</url>");
        xml
    }
}

/// Everything the sitemap is assembled from.
pub struct SitemapSources<'a> {
    pub site_url: &'a str,
    pub static_site_routes: &'a [StaticRoute],
    pub static_app_routes: &'a [StaticRoute],
    pub curated: &'a CuratedContent,
    /// Curated routes whose page was not written. They are left out.
    pub skipped_routes: &'a [String],
    pub indexes: &'a QuestionIndexes<'a>,
    pub seo: &'a SeoMap,
    /// `lastmod` of static and curated pages.
    pub build_date: Option<NaiveDate>,
}

/// Escapes XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Lists every public URL, in sitemap order: static site pages, static app pages, core courses, core topics, exams,
/// exam topics, then questions from most to least recently updated.
///
/// Exams and exam topics get one entry per route, so spellings that slugify alike are listed once.
pub fn collect_sitemap_entries(sources: &SitemapSources) -> Vec<SitemapEntry> {
    let site_url = sources.site_url;
    let mut entries = Vec::new();

    for route in sources
        .static_site_routes
        .iter()
        .chain(sources.static_app_routes)
    {
        entries.push(SitemapEntry {
            loc: absolute_url(site_url, &route.path),
            lastmod: sources.build_date,
            changefreq: Some(route.changefreq),
            priority: Some(route.priority),
        });
    }

    let is_written = |path: &String| !sources.skipped_routes.contains(path);

    for slug in CORE_COURSES {
        let Some(course) = sources.curated.courses.get(slug) else {
            debug!(target: "sitemap", "Core course {} has no curated entry", slug);
            continue;
        };
        if !is_written(&course.path) {
            continue;
        }

        entries.push(SitemapEntry {
            loc: absolute_url(site_url, &course.path),
            lastmod: sources.build_date,
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.8),
        });
    }

    for (_, topic) in sources
        .curated
        .core_topics()
        .filter(|(_, topic)| is_written(&topic.path))
    {
        entries.push(SitemapEntry {
            loc: absolute_url(site_url, &topic.path),
            lastmod: sources.build_date,
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.7),
        });
    }

    let exam_groups = sources.indexes.exam_groups();

    for exam in exam_groups.values() {
        entries.push(SitemapEntry {
            loc: absolute_url(site_url, &exam_path(&exam.name)),
            lastmod: newest_modification(&exam.questions),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(0.8),
        });
    }

    for exam in exam_groups.values() {
        for topic in exam.topics.values() {
            entries.push(SitemapEntry {
                loc: absolute_url(site_url, &exam_topic_path(&exam.name, &topic.name)),
                lastmod: newest_modification(&topic.questions),
                changefreq: Some(ChangeFreq::Weekly),
                priority: Some(0.7),
            });
        }
    }

    for question in questions_by_recency(sources.indexes) {
        let Some(record) = sources.seo.get(&question.question_number) else {
            warn!(
                target: "sitemap",
                "Question {} has no SEO metadata, leaving it out of the sitemap",
                question.question_number
            );
            continue;
        };

        entries.push(SitemapEntry {
            loc: record.canonical.clone(),
            lastmod: question.last_modified().map(|date| date.date_naive()),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.6),
        });
    }

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NAMESPACE}\">"));

    for entry in entries {
        xml.push_str(&entry.to_xml());
    }

    xml.push_str("</urlset>");
    xml
}

/// Assembles the sitemap document.
pub fn generate_sitemap(sources: &SitemapSources) -> String {
    render_sitemap(&collect_sitemap_entries(sources))
}

/// Writes `sitemap.xml` and the `_headers` file declaring how it is served. Returns the sitemap path.
pub fn write_sitemap(xml: &str, output_dir: &Path) -> Result<PathBuf, BuildError> {
    let sitemap_path = output_dir.join(SITEMAP_FILENAME);
    write_file(&sitemap_path, xml)?;

    let headers = format!(
        "/{SITEMAP_FILENAME}\n  Content-Type: {SITEMAP_CONTENT_TYPE}\n  Cache-Control: {SITEMAP_CACHE_CONTROL}\n"
    );
    write_file(&output_dir.join(HEADERS_FILENAME), &headers)?;

    Ok(sitemap_path)
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    fs::write(path, content).map_err(|source| BuildError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn newest_modification(questions: &[&Question]) -> Option<NaiveDate> {
    questions
        .iter()
        .filter_map(|question| question.last_modified())
        .max()
        .map(|date| date.date_naive())
}

/// Most recently modified first; questions without a date go last, ties by ascending number.
fn questions_by_recency<'a>(indexes: &QuestionIndexes<'a>) -> Vec<&'a Question> {
    let mut questions: Vec<_> = indexes.by_question_number.values().copied().collect();
    questions.sort_by_key(|question| {
        (
            question.last_modified().is_none(),
            Reverse(question.last_modified()),
            question.question_number,
        )
    });
    questions
}
