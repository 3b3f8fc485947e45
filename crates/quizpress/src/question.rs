//! Question records, as returned by the questions API.
//!
//! Records are immutable once fetched. The `statement` field is classified once, at deserialization time, into either
//! text or a reference to an image, so that nothing downstream has to guess again.
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://\S+$").expect("valid URL pattern"));

static IMAGE_EXTENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|gif|webp|svg|bmp|avif)(\?\S*)?$").expect("valid extension pattern")
});

/// Substrings of hosts that only ever serve images for us.
const IMAGE_HOSTS: [&str; 6] = [
    "cloudinary.com",
    "imgur.com",
    "amazonaws.com",
    "googleusercontent.com",
    "firebasestorage",
    "imagekit.io",
];

/// Returns whether a raw string looks like a reference to an image rather than prose.
pub fn is_image_reference(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    let lowercase = value.to_ascii_lowercase();

    URL_PATTERN.is_match(value)
        || IMAGE_EXTENSION_PATTERN.is_match(value)
        || IMAGE_HOSTS.iter().any(|host| lowercase.contains(host))
}

/// The statement of a question, either prose (markdown, possibly with LaTeX) or an image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Text(String),
    ImageRef(String),
}

impl Statement {
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if is_image_reference(&raw) {
            Statement::ImageRef(raw.trim().to_string())
        } else {
            Statement::Text(raw)
        }
    }

    /// The prose of the statement, `None` for image statements.
    pub fn text(&self) -> Option<&str> {
        match self {
            Statement::Text(text) => Some(text),
            Statement::ImageRef(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Statement::ImageRef(_))
    }
}

impl From<String> for Statement {
    fn from(raw: String) -> Self {
        Statement::classify(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum QuestionType {
    Mcq,
    MultipleCorrect,
    Integer,
    Other(String),
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::MultipleCorrect => "Multiple Correct",
            QuestionType::Integer => "Integer",
            QuestionType::Other(other) => other,
        }
    }

    /// Whether answers are picked among listed options.
    pub fn has_choices(&self) -> bool {
        matches!(self, QuestionType::Mcq | QuestionType::MultipleCorrect)
    }
}

impl From<String> for QuestionType {
    fn from(raw: String) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "mcq" => QuestionType::Mcq,
            "multiplecorrect" => QuestionType::MultipleCorrect,
            "integer" => QuestionType::Integer,
            _ => QuestionType::Other(raw.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionOption {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

impl QuestionOption {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            content: content.into(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            content: url.into(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind.eq_ignore_ascii_case("text")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_number: u64,
    #[serde(default, deserialize_with = "statement_or_none")]
    pub statement: Option<Statement>,
    #[serde(default, deserialize_with = "non_empty")]
    pub exam: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub sub_exam: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub question_type: Option<QuestionType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    /// A question with only its number set.
    pub fn new(question_number: u64) -> Self {
        Self {
            question_number,
            statement: None,
            exam: None,
            sub_exam: None,
            section: None,
            category: None,
            topic: None,
            difficulty: None,
            tags: Vec::new(),
            question_type: None,
            options: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn statement_text(&self) -> Option<&str> {
        self.statement.as_ref().and_then(Statement::text)
    }

    pub fn is_visual(&self) -> bool {
        self.statement.as_ref().is_some_and(Statement::is_image)
    }

    /// The sub-exam, unless it is the catch-all `General` bucket.
    pub fn specific_sub_exam(&self) -> Option<&str> {
        self.sub_exam.as_deref().filter(|sub_exam| *sub_exam != "General")
    }

    /// Last time the question changed, falling back to its creation date.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn statement_or_none<'de, D>(deserializer: D) -> Result<Option<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(deserializer)?.map(Statement::classify))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
