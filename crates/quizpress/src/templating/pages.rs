use log::warn;
use maud::{Markup, PreEscaped, html};

use crate::{
    curated::CuratedEntry,
    fetch::LearningContent,
    markdown::{render_inline_markdown, render_markdown, render_markdown_with_headings},
    question::{Question, QuestionType, Statement, is_image_reference},
    routes::{absolute_url, exam_path, exam_topic_path, question_path},
    seo::{CALL_TO_ACTION, OG_IMAGE_PATH, SeoMap, SeoRecord, UNIVERSAL_KEYWORDS, exam_keywords},
};

use super::layout::{PageHead, layout};

/// Site-wide values every page needs.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub url: &'a str,
    pub name: &'a str,
}

impl Site<'_> {
    fn og_image(&self) -> String {
        absolute_url(self.url, OG_IMAGE_PATH)
    }
}

pub fn question_page(site: &Site, question: &Question, seo: &SeoRecord) -> Markup {
    let json_ld = seo
        .schema
        .to_json_ld()
        .inspect_err(|err| {
            warn!(target: "pages", "Skipping structured data of question {}: {}", question.question_number, err)
        })
        .ok();

    let head = PageHead {
        title: &seo.title,
        description: &seo.description,
        keywords: &seo.keywords,
        canonical: &seo.canonical,
        og_image: &seo.og_image,
        og_type: "article",
        json_ld: json_ld.as_deref(),
    };

    let body = html! {
        (breadcrumbs(question.exam.as_deref(), question.topic.as_deref()))
        article.question {
            h1 { (seo.title) }
            p.question-meta {
                "Question " (question.question_number)
                @for detail in [question.exam.as_deref(), question.specific_sub_exam(), question.difficulty.as_deref()].into_iter().flatten() {
                    " · " (detail)
                }
                @if let Some(kind) = &question.question_type {
                    " · " (kind.as_str())
                }
            }
            div.statement {
                @match &question.statement {
                    Some(Statement::Text(text)) => { (PreEscaped(render_markdown(text))) }
                    Some(Statement::ImageRef(url)) => {
                        img src=(url) alt=(format!("Question {} figure", question.question_number)) loading="lazy";
                    }
                    None => {}
                }
            }
            @if !question.options.is_empty() {
                ol.options type="A" {
                    @for option in &question.options {
                        li {
                            @if option.is_text() && !is_image_reference(&option.content) {
                                (PreEscaped(render_inline_markdown(&option.content)))
                            } @else {
                                img src=(option.content) alt="Answer option" loading="lazy";
                            }
                        }
                    }
                }
            }
            @if question.question_type == Some(QuestionType::Integer) {
                p.answer-hint { "Answer with an integer." }
            }
            @if !question.tags.is_empty() {
                ul.tags {
                    @for tag in &question.tags {
                        li { (tag) }
                    }
                }
            }
            p.call-to-action { (CALL_TO_ACTION) }
        }
    };

    layout(&head, site.name, body)
}

/// Lists the topics of an exam and its questions.
pub fn exam_page(
    site: &Site,
    exam: &str,
    topics: &[(&str, usize)],
    questions: &[&Question],
    seo: &SeoMap,
) -> Markup {
    let title = format!("{exam} Questions with Solutions | {}", site.name);
    let description = format!(
        "Practice {} {exam} questions across {} topics. {CALL_TO_ACTION}",
        questions.len(),
        topics.len()
    );
    let keywords = listing_keywords(exam, None);
    let canonical = absolute_url(site.url, &exam_path(exam));
    let og_image = site.og_image();

    let head = PageHead {
        title: &title,
        description: &description,
        keywords: &keywords,
        canonical: &canonical,
        og_image: &og_image,
        og_type: "website",
        json_ld: None,
    };

    let body = html! {
        (breadcrumbs(Some(exam), None))
        h1 { (exam) " Questions" }
        p { (description) }
        @if !topics.is_empty() {
            section.topics {
                h2 { "Topics" }
                ul {
                    @for (topic, count) in topics {
                        li {
                            a href=(exam_topic_path(exam, topic)) { (topic) }
                            " (" (count) ")"
                        }
                    }
                }
            }
        }
        section.questions {
            h2 { "Questions" }
            (question_links(questions, seo))
        }
    };

    layout(&head, site.name, body)
}

pub fn exam_topic_page(
    site: &Site,
    exam: &str,
    topic: &str,
    questions: &[&Question],
    seo: &SeoMap,
) -> Markup {
    let title = format!("{exam} {topic} Questions | {}", site.name);
    let description = format!(
        "Practice {} {topic} questions from {exam}. {CALL_TO_ACTION}",
        questions.len()
    );
    let keywords = listing_keywords(exam, Some(topic));
    let canonical = absolute_url(site.url, &exam_topic_path(exam, topic));
    let og_image = site.og_image();

    let head = PageHead {
        title: &title,
        description: &description,
        keywords: &keywords,
        canonical: &canonical,
        og_image: &og_image,
        og_type: "website",
        json_ld: None,
    };

    let body = html! {
        (breadcrumbs(Some(exam), Some(topic)))
        h1 { (exam) " · " (topic) }
        p { (description) }
        (question_links(questions, seo))
    };

    layout(&head, site.name, body)
}

/// A course's learning content, followed by links to its topics.
pub fn course_page(
    site: &Site,
    course: &CuratedEntry,
    content: &LearningContent,
    topics: &[(&str, &CuratedEntry)],
) -> Markup {
    let extra = html! {
        @if !topics.is_empty() {
            section.course-topics {
                h2 { "Topics" }
                ul {
                    @for (_, topic) in topics {
                        li { a href=(topic.path) { (topic.title) } }
                    }
                }
            }
        }
    };

    learning_page(site, course, content, None, extra)
}

pub fn topic_page(
    site: &Site,
    topic: &CuratedEntry,
    content: &LearningContent,
    course: Option<&CuratedEntry>,
) -> Markup {
    learning_page(site, topic, content, course, html! {})
}

fn learning_page(
    site: &Site,
    entry: &CuratedEntry,
    content: &LearningContent,
    parent: Option<&CuratedEntry>,
    extra: Markup,
) -> Markup {
    let title = format!("{} | {}", content.title, site.name);
    let description = content
        .description
        .as_deref()
        .or(entry.description.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Learn {} step by step. {CALL_TO_ACTION}", content.title));
    let keywords = vec![
        content.title.to_lowercase(),
        format!("{} notes", content.title.to_lowercase()),
        format!("{} practice questions", content.title.to_lowercase()),
    ];
    let canonical = absolute_url(site.url, &entry.path);
    let og_image = site.og_image();
    let rendered = render_markdown_with_headings(content.content.as_deref().unwrap_or_default());

    let head = PageHead {
        title: &title,
        description: &description,
        keywords: &keywords,
        canonical: &canonical,
        og_image: &og_image,
        og_type: "article",
        json_ld: None,
    };

    let body = html! {
        nav.breadcrumbs aria-label="Breadcrumb" {
            a href="/" { "Home" }
            " / "
            a href="/courses" { "Courses" }
            @if let Some(parent) = parent {
                " / "
                a href=(parent.path) { (parent.title) }
            }
        }
        article.learning {
            h1 { (content.title) }
            @if rendered.headings.len() > 1 {
                nav.table-of-contents {
                    ul {
                        @for heading in &rendered.headings {
                            li class=(format!("level-{}", heading.level)) {
                                a href=(format!("#{}", heading.id)) { (heading.title) }
                            }
                        }
                    }
                }
            }
            (PreEscaped(rendered.html))
        }
        (extra)
    };

    layout(&head, site.name, body)
}

fn breadcrumbs(exam: Option<&str>, topic: Option<&str>) -> Markup {
    html! {
        nav.breadcrumbs aria-label="Breadcrumb" {
            a href="/" { "Home" }
            @if let Some(exam) = exam {
                " / "
                a href=(exam_path(exam)) { (exam) }
                @if let Some(topic) = topic {
                    " / "
                    a href=(exam_topic_path(exam, topic)) { (topic) }
                }
            }
        }
    }
}

fn question_links(questions: &[&Question], seo: &SeoMap) -> Markup {
    html! {
        ul.question-list {
            @for question in questions {
                @if let Some(record) = seo.get(&question.question_number) {
                    li { a href=(question_path(&record.slug)) { (record.title) } }
                }
            }
        }
    }
}

fn listing_keywords(exam: &str, topic: Option<&str>) -> Vec<String> {
    let mut keywords = Vec::new();
    let exam_lower = exam.to_lowercase();

    if let Some(topic) = topic {
        let topic_lower = topic.to_lowercase();
        keywords.push(format!("{exam_lower} {topic_lower} questions"));
        keywords.push(topic_lower);
    }

    keywords.push(format!("{exam_lower} questions"));
    keywords.push(format!("{exam_lower} previous year questions"));

    if let Some(exam_specific) = exam_keywords(exam) {
        keywords.extend(exam_specific.for_sub_exam(None).iter().map(|k| k.to_string()));
    }
    keywords.extend(UNIVERSAL_KEYWORDS.iter().map(|k| k.to_string()));

    let mut seen = rustc_hash::FxHashSet::default();
    keywords.retain(|keyword| seen.insert(keyword.clone()));
    keywords
}
