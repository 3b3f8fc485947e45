//! Search-engine metadata for question pages: title, description, keywords, canonical URL and schema.org data.
//!
//! Nothing in here fails. A question missing fields still gets usable (if blander) metadata.
use chrono::{DateTime, SecondsFormat, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::{
    question::{Question, QuestionType, Statement, is_image_reference},
    routes::{absolute_url, question_path},
    slug::{SlugMap, build_base_slug, generate_all_slugs},
};

mod keywords;

pub use keywords::{ExamKeywords, UNIVERSAL_KEYWORDS, exam_keywords};

pub const TITLE_MAX_LEN: usize = 120;
pub const CALL_TO_ACTION: &str =
    "Practice free with step-by-step solutions and instant answer checking.";
pub const OG_IMAGE_PATH: &str = "/og-image.png";

const ELLIPSIS: &str = "...";
const SCHEMA_TEXT_MAX_LEN: usize = 100;
const MAX_DESCRIBED_OPTIONS: usize = 5;

/// SEO metadata of every question in a batch, keyed by question number.
pub type SeoMap = FxHashMap<u64, SeoRecord>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoRecord {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Ordered from most specific to most generic.
    pub keywords: Vec<String>,
    pub canonical: String,
    pub og_image: String,
    pub schema: QuestionSchema,
}

/// A schema.org [`Question`](https://schema.org/Question), serialized as JSON-LD.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub text: String,
    pub edu_question_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educational_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<SchemaThing>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaThing {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

impl QuestionSchema {
    /// Serializes the schema for embedding in a `<script type="application/ld+json">` element.
    pub fn to_json_ld(&self) -> Result<String, serde_json::Error> {
        // A literal `</script>` inside the JSON would close the element early
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }
}

/// Computes the SEO metadata of every question, computing slugs for the whole batch only once.
pub fn generate_all_question_seo(questions: &[Question], site_url: &str) -> SeoMap {
    let slugs = generate_all_slugs(questions);

    questions
        .iter()
        .map(|question| {
            (
                question.question_number,
                generate_question_seo(question, &slugs, site_url),
            )
        })
        .collect()
}

/// Computes the SEO metadata of one question. `slugs` must come from [`generate_all_slugs`] over the whole batch.
pub fn generate_question_seo(question: &Question, slugs: &SlugMap, site_url: &str) -> SeoRecord {
    let slug = slugs
        .get(&question.question_number)
        .cloned()
        .unwrap_or_else(|| build_base_slug(question));
    let canonical = absolute_url(site_url, &question_path(&slug));

    SeoRecord {
        title: generate_title(question),
        description: generate_description(question),
        keywords: generate_keywords(question),
        og_image: absolute_url(site_url, OG_IMAGE_PATH),
        schema: generate_schema(question, &canonical),
        canonical,
        slug,
    }
}

/// `<statement> | <exam> <difficulty> | <topic>`, never longer than [`TITLE_MAX_LEN`] characters.
pub fn generate_title(question: &Question) -> String {
    let lead = match &question.statement {
        Some(Statement::Text(text)) => collapse_whitespace(text),
        Some(Statement::ImageRef(_)) | None => match &question.topic {
            Some(topic) => format!("{topic} Question"),
            None => "Visual Question".to_string(),
        },
    };

    let level = [question.exam.as_deref(), question.difficulty.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let suffix: String = [Some(level.as_str()), question.topic.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .map(|part| format!(" | {part}"))
        .collect();

    let lead_len = lead.chars().count();
    let suffix_len = suffix.chars().count();

    let title = if lead_len + suffix_len > TITLE_MAX_LEN {
        let budget = TITLE_MAX_LEN.saturating_sub(suffix_len + ELLIPSIS.len());
        format!("{}{ELLIPSIS}{suffix}", truncate_at_word(&lead, budget))
    } else {
        format!("{lead}{suffix}")
    };

    truncate_chars(&title, TITLE_MAX_LEN)
}

pub fn generate_description(question: &Question) -> String {
    let mut sentences = Vec::new();

    match &question.statement {
        Some(Statement::Text(text)) => sentences.push(collapse_whitespace(text)),
        Some(Statement::ImageRef(_)) => sentences.push(visual_sentence(question)),
        None => {}
    }

    match &question.question_type {
        Some(question_type) if question_type.has_choices() => {
            let options = describe_options(question);
            if !options.is_empty() {
                sentences.push(options);
            }
        }
        Some(QuestionType::Integer) => sentences.push("Answer type: Integer.".to_string()),
        _ => {}
    }

    let context = [
        question.exam.as_deref(),
        question.difficulty.as_deref(),
        question.topic.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
    if context.is_empty() {
        sentences.push("Practice question.".to_string());
    } else {
        sentences.push(format!("{context} question."));
    }

    sentences.push(CALL_TO_ACTION.to_string());

    sentences.join(" ")
}

/// Keywords ordered from most specific to most generic: the question's own fields, then curated exam keywords,
/// then [`UNIVERSAL_KEYWORDS`]. All lowercase, no duplicates.
pub fn generate_keywords(question: &Question) -> Vec<String> {
    let mut keywords = KeywordList::default();

    keywords.push(question.exam.as_deref());
    keywords.push(question.specific_sub_exam());
    keywords.push(question.section.as_deref());
    keywords.push(question.category.as_deref());
    keywords.push(question.topic.as_deref());
    keywords.push(question.question_type.as_ref().map(QuestionType::as_str));
    keywords.push(question.difficulty.as_deref());
    for tag in &question.tags {
        keywords.push(Some(tag));
    }

    if let Some(curated) = question.exam.as_deref().and_then(exam_keywords) {
        for keyword in curated.for_sub_exam(question.sub_exam.as_deref()) {
            keywords.push(Some(keyword));
        }
    }

    for keyword in UNIVERSAL_KEYWORDS {
        keywords.push(Some(keyword));
    }

    keywords.into_inner()
}

pub fn generate_schema(question: &Question, canonical: &str) -> QuestionSchema {
    let text = match &question.statement {
        Some(Statement::Text(text)) => truncate_chars(&collapse_whitespace(text), SCHEMA_TEXT_MAX_LEN),
        Some(Statement::ImageRef(_)) | None => match &question.topic {
            Some(topic) => format!("Visual {topic} question"),
            None => "Visual question".to_string(),
        },
    };

    let edu_question_type = match question.question_type {
        Some(QuestionType::Integer) => "Integer answer",
        _ => "Multiple choice",
    };

    QuestionSchema {
        context: "https://schema.org",
        kind: "Question",
        name: text.clone(),
        text,
        edu_question_type,
        educational_level: question.difficulty.clone(),
        about: question.topic.as_ref().map(|topic| SchemaThing {
            kind: "Thing",
            name: topic.clone(),
        }),
        url: canonical.to_string(),
        date_created: question.created_at.as_ref().map(format_schema_date),
        date_modified: question.updated_at.as_ref().map(format_schema_date),
    }
}

#[derive(Default)]
struct KeywordList {
    keywords: Vec<String>,
    seen: FxHashSet<String>,
}

impl KeywordList {
    fn push(&mut self, keyword: Option<&str>) {
        let Some(keyword) = keyword.map(|keyword| collapse_whitespace(keyword).to_lowercase())
        else {
            return;
        };

        if !keyword.is_empty() && self.seen.insert(keyword.clone()) {
            self.keywords.push(keyword);
        }
    }

    fn into_inner(self) -> Vec<String> {
        self.keywords
    }
}

fn visual_sentence(question: &Question) -> String {
    let mut sentence = String::from("Solve this visual");
    if let Some(topic) = &question.topic {
        sentence.push(' ');
        sentence.push_str(topic);
    }
    sentence.push_str(" question");
    if let Some(exam) = &question.exam {
        sentence.push_str(" from ");
        sentence.push_str(exam);
    }
    sentence.push('.');
    sentence
}

fn describe_options(question: &Question) -> String {
    question
        .options
        .iter()
        .filter(|option| {
            option.is_text()
                && !option.content.trim().is_empty()
                && !is_image_reference(&option.content)
        })
        .take(MAX_DESCRIBED_OPTIONS)
        .zip('A'..)
        .map(|(option, letter)| format!("{letter}) {}", collapse_whitespace(&option.content)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_schema_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `budget` characters, preferring the last word boundary.
fn truncate_at_word(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let cut = truncate_chars(text, budget);
    match cut.rfind(char::is_whitespace) {
        Some(index) if index > 0 => cut[..index].trim_end().to_string(),
        _ => cut,
    }
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionOption;

    const SITE: &str = "https://quiz.example";

    fn hcf_question() -> Question {
        Question {
            statement: Some(Statement::classify("Find HCF of 12 and 18")),
            exam: Some("SSC".into()),
            topic: Some("Number System".into()),
            question_type: Some(QuestionType::Integer),
            difficulty: Some("Easy".into()),
            ..Question::new(7)
        }
    }

    #[test]
    fn test_hcf_example() {
        let slugs = generate_all_slugs(&[hcf_question()]);
        let seo = generate_question_seo(&hcf_question(), &slugs, SITE);

        assert_eq!(seo.slug, "find-hcf-of-12-and-18-ssc-number-system");
        assert!(seo.title.ends_with("| SSC Easy | Number System"));
        assert_eq!(seo.title, "Find HCF of 12 and 18 | SSC Easy | Number System");
        assert!(seo.description.contains("Answer type: Integer."));
        assert!(seo.description.contains("SSC Easy Number System question."));
        assert!(seo.description.ends_with(CALL_TO_ACTION));
        assert_eq!(
            seo.canonical,
            "https://quiz.example/questions/find-hcf-of-12-and-18-ssc-number-system"
        );
        assert_eq!(seo.og_image, "https://quiz.example/og-image.png");
    }

    #[test]
    fn test_long_title_is_truncated_at_word_boundary() {
        let question = Question {
            statement: Some(Statement::classify(
                "A train running at a uniform speed crosses a platform of length 300 metres in 30 seconds and a pole in 15 seconds. Find the length of the train.",
            )),
            ..hcf_question()
        };

        let title = generate_title(&question);

        assert!(title.chars().count() <= TITLE_MAX_LEN);
        assert!(title.ends_with("... | SSC Easy | Number System"));
        let lead = title.strip_suffix("... | SSC Easy | Number System").unwrap();
        assert!(!lead.ends_with(' '));
        assert!(question.statement_text().unwrap().starts_with(lead));
    }

    #[test]
    fn test_title_never_exceeds_limit() {
        let huge_topic = "Topic ".repeat(40);
        let cases = [
            Question {
                topic: Some(huge_topic.clone()),
                ..hcf_question()
            },
            Question {
                statement: Some(Statement::classify("x".repeat(500))),
                ..hcf_question()
            },
            Question {
                statement: Some(Statement::classify("é ".repeat(300))),
                ..hcf_question()
            },
            Question::new(1),
        ];

        for question in &cases {
            assert!(generate_title(question).chars().count() <= TITLE_MAX_LEN);
        }
    }

    #[test]
    fn test_visual_question_title_and_description() {
        let question = Question {
            statement: Some(Statement::classify("https://cdn.example.com/q.png")),
            exam: Some("JEE".into()),
            topic: Some("Optics".into()),
            question_type: Some(QuestionType::Mcq),
            ..Question::new(2)
        };

        assert_eq!(generate_title(&question), "Optics Question | JEE | Optics");
        assert!(
            generate_description(&question)
                .starts_with("Solve this visual Optics question from JEE.")
        );
        assert_eq!(
            generate_schema(&question, "u").text,
            "Visual Optics question"
        );
    }

    #[test]
    fn test_description_lists_text_options() {
        let question = Question {
            question_type: Some(QuestionType::Mcq),
            options: vec![
                QuestionOption::text("6"),
                QuestionOption::image("https://cdn.example.com/a.png"),
                QuestionOption::text("https://cdn.example.com/b.png"),
                QuestionOption::text("  3  "),
                QuestionOption::text("2"),
                QuestionOption::text("1"),
                QuestionOption::text("12"),
                QuestionOption::text("18"),
            ],
            ..hcf_question()
        };

        let description = generate_description(&question);

        assert!(description.contains("A) 6 B) 3 C) 2 D) 1 E) 12 "));
        assert!(!description.contains("F)"));
        assert!(!description.contains("Answer type"));
    }

    #[test]
    fn test_description_without_fields() {
        let description = generate_description(&Question::new(5));
        assert_eq!(description, format!("Practice question. {CALL_TO_ACTION}"));
    }

    #[test]
    fn test_keywords_are_unique_and_ordered() {
        let question = Question {
            sub_exam: Some("CGL".into()),
            section: Some("Quantitative Aptitude".into()),
            category: Some("Arithmetic".into()),
            tags: vec!["HCF".into(), "number system".into(), "Mock Test".into()],
            ..hcf_question()
        };

        let keywords = generate_keywords(&question);

        let mut unique = keywords.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), keywords.len());

        assert_eq!(
            &keywords[..8],
            &[
                "ssc",
                "cgl",
                "quantitative aptitude",
                "arithmetic",
                "number system",
                "integer",
                "easy",
                "hcf",
            ]
        );

        let position = |keyword: &str| keywords.iter().position(|k| k == keyword).unwrap();
        assert!(position("hcf") < position("ssc cgl"));
        assert!(position("ssc cgl") < position("practice questions"));
        // A tag that is also a universal keyword keeps its earlier, specific position
        assert!(position("mock test") < position("ssc cgl"));
        assert!(keywords.iter().all(|k| *k == k.to_lowercase()));
    }

    #[test]
    fn test_keywords_skip_general_sub_exam() {
        let question = Question {
            sub_exam: Some("General".into()),
            ..hcf_question()
        };

        let keywords = generate_keywords(&question);

        assert!(!keywords.contains(&"general".to_string()));
        assert!(keywords.contains(&"ssc exam".to_string()));
    }

    #[test]
    fn test_schema() {
        let question = Question {
            statement: Some(Statement::classify("y".repeat(150))),
            created_at: Some("2024-01-02T03:04:05Z".parse().unwrap()),
            ..hcf_question()
        };

        let schema = generate_schema(&question, "https://quiz.example/questions/y");

        assert_eq!(schema.name.chars().count(), 100);
        assert_eq!(schema.edu_question_type, "Integer answer");
        assert_eq!(schema.educational_level.as_deref(), Some("Easy"));

        let json: serde_json::Value =
            serde_json::from_str(&schema.to_json_ld().unwrap()).unwrap();
        assert_eq!(json["@context"], "https://schema.org");
        assert_eq!(json["@type"], "Question");
        assert_eq!(json["about"]["name"], "Number System");
        assert_eq!(json["eduQuestionType"], "Integer answer");
        assert_eq!(json["dateCreated"], "2024-01-02T03:04:05Z");
        assert!(json.get("dateModified").is_none());
    }

    #[test]
    fn test_schema_defaults_to_multiple_choice() {
        let question = Question {
            question_type: None,
            ..hcf_question()
        };
        assert_eq!(
            generate_schema(&question, "u").edu_question_type,
            "Multiple choice"
        );
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let question = Question {
            statement: Some(Statement::classify("What does </script> do?")),
            ..hcf_question()
        };
        let json_ld = generate_schema(&question, "u").to_json_ld().unwrap();
        assert!(!json_ld.contains("</script>"));
    }

    #[test]
    fn test_generate_all_question_seo_shares_slugs() {
        let questions = vec![
            Question {
                statement: Some(Statement::classify("What is 2+2?")),
                exam: Some("CAT".into()),
                topic: Some("Arithmetic".into()),
                ..Question::new(9)
            },
            Question {
                statement: Some(Statement::classify("What is 2+2?")),
                exam: Some("CAT".into()),
                topic: Some("Arithmetic".into()),
                ..Question::new(3)
            },
        ];

        let seo = generate_all_question_seo(&questions, SITE);

        assert_eq!(seo[&3].slug, "what-is-22-cat-arithmetic-1");
        assert_eq!(seo[&9].slug, "what-is-22-cat-arithmetic-2");
        assert_eq!(
            seo[&9].canonical,
            "https://quiz.example/questions/what-is-22-cat-arithmetic-2"
        );
    }
}
