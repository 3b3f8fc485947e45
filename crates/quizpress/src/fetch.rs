//! Fetching questions and learning content from the platform API.
use std::{future::Future, sync::Arc, time::Duration};

use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{errors::FetchError, question::Question};

/// Questions requested per page.
pub const PAGE_SIZE: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A paginated source of questions.
pub trait QuestionPageSource {
    /// Fetches page `page` (starting at 1) holding at most `limit` questions.
    fn fetch_page(
        &self,
        page: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Question>, FetchError>> + Send;
}

/// A source of course and topic learning content. `Ok(None)` means the slug is unknown.
pub trait LearningContentSource {
    fn fetch_course(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<LearningContent>, FetchError>> + Send;

    fn fetch_topic(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<LearningContent>, FetchError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LearningContent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Markdown body.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LearningPayload {
    Wrapped { data: LearningContent },
    Bare(LearningContent),
}

impl From<LearningPayload> for LearningContent {
    fn from(payload: LearningPayload) -> Self {
        match payload {
            LearningPayload::Wrapped { data } => data,
            LearningPayload::Bare(content) => content,
        }
    }
}

/// HTTP client for the platform API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("quizpress/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `url` and returns its body, or `None` on 404 when `allow_not_found` is set.
    async fn get_text(&self, url: &str, allow_not_found: bool) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if allow_not_found && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(Some(body))
    }

    async fn fetch_learning_content(
        &self,
        kind: &str,
        slug: &str,
    ) -> Result<Option<LearningContent>, FetchError> {
        let url = format!("{}/api/learning/{kind}/slug/{slug}", self.base_url);
        debug!(target: "fetch", "GET {}", url);

        match self.get_text(&url, true).await? {
            Some(body) => parse_learning_content(&url, &body).map(Some),
            None => Ok(None),
        }
    }
}

impl QuestionPageSource for ApiClient {
    async fn fetch_page(&self, page: usize, limit: usize) -> Result<Vec<Question>, FetchError> {
        let url = format!(
            "{}/api/questions?page={page}&limit={limit}",
            self.base_url
        );
        debug!(target: "fetch", "GET {}", url);

        match self.get_text(&url, false).await? {
            Some(body) => parse_question_page(&url, &body),
            None => Ok(Vec::new()),
        }
    }
}

impl LearningContentSource for ApiClient {
    async fn fetch_course(&self, slug: &str) -> Result<Option<LearningContent>, FetchError> {
        self.fetch_learning_content("courses", slug).await
    }

    async fn fetch_topic(&self, slug: &str) -> Result<Option<LearningContent>, FetchError> {
        self.fetch_learning_content("topics", slug).await
    }
}

/// Decodes a `{ "questions": [...] }` page body.
pub fn parse_question_page(url: &str, body: &str) -> Result<Vec<Question>, FetchError> {
    let mut payload: Value = serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })?;

    match payload.get_mut("questions").map(Value::take) {
        Some(questions @ Value::Array(_)) => {
            serde_json::from_value(questions).map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })
        }
        Some(_) => Err(FetchError::MalformedPayload {
            url: url.to_string(),
            reason: "`questions` is not an array".to_string(),
        }),
        None => Err(FetchError::MalformedPayload {
            url: url.to_string(),
            reason: "missing `questions` field".to_string(),
        }),
    }
}

/// Decodes a learning content body, either bare or wrapped in `data`.
pub fn parse_learning_content(url: &str, body: &str) -> Result<LearningContent, FetchError> {
    serde_json::from_str::<LearningPayload>(body)
        .map(LearningContent::from)
        .map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
}

/// Result of the last complete uncapped fetch. One cache lives for one build.
#[derive(Debug, Default)]
pub struct QuestionCache {
    questions: Mutex<Option<Arc<Vec<Question>>>>,
}

impl QuestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<Vec<Question>>> {
        self.questions.lock().await.clone()
    }

    pub async fn is_populated(&self) -> bool {
        self.questions.lock().await.is_some()
    }

    /// Drops the cached questions so the next uncapped fetch goes back to the source.
    pub async fn invalidate(&self) {
        *self.questions.lock().await = None;
    }
}

/// Fetches every question from `source`, page by page.
///
/// Uncapped calls go through `cache`: the first one fetches and fills it, concurrent and later ones get the same
/// list. With `max_questions`, pages are fetched until the cap is reached and the result is trimmed to exactly the
/// cap; the cache is neither read nor filled. Nothing is cached when a page fails.
pub async fn fetch_all_questions<S: QuestionPageSource>(
    source: &S,
    cache: &QuestionCache,
    max_questions: Option<usize>,
) -> Result<Arc<Vec<Question>>, FetchError> {
    if max_questions.is_some() {
        return fetch_pages(source, max_questions).await.map(Arc::new);
    }

    // Held across the fetch so concurrent callers wait for this one instead of starting their own.
    let mut cached = cache.questions.lock().await;
    if let Some(questions) = cached.as_ref() {
        debug!(target: "fetch", "Using {} cached questions", questions.len());
        return Ok(Arc::clone(questions));
    }

    let questions = Arc::new(fetch_pages(source, None).await?);
    *cached = Some(Arc::clone(&questions));

    Ok(questions)
}

async fn fetch_pages<S: QuestionPageSource>(
    source: &S,
    max_questions: Option<usize>,
) -> Result<Vec<Question>, FetchError> {
    let mut questions = Vec::new();
    if max_questions == Some(0) {
        return Ok(questions);
    }

    let mut page = 1;
    loop {
        let batch = source.fetch_page(page, PAGE_SIZE).await?;
        let batch_len = batch.len();
        questions.extend(batch);

        debug!(
            target: "fetch",
            "Page {} returned {} questions ({} so far)",
            page,
            batch_len,
            questions.len()
        );

        if let Some(max) = max_questions
            && questions.len() >= max
        {
            questions.truncate(max);
            break;
        }

        if batch_len < PAGE_SIZE {
            break;
        }

        page += 1;
    }

    Ok(questions)
}
