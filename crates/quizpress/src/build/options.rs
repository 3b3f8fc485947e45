use std::{env, path::PathBuf};

use crate::sitemap::{ChangeFreq, StaticRoute};

/// Environment variables holding the API base URL, by precedence.
pub const API_BASE_URL_VARS: [&str; 2] = ["PUBLIC_API_BASE_URL", "API_BASE_URL"];
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SITE_URL: &str = "https://quizpress.app";
pub const DEFAULT_SITE_NAME: &str = "QuizPress";

/// Quizpress build options. Should be passed to [`generate()`](crate::generate()).
///
/// ## Examples
/// Default values:
/// ```rs
/// use quizpress::{generate, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(BuildOptions::default())
/// }
/// ```
/// Custom values:
/// ```rs
/// use quizpress::{generate, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(BuildOptions {
///     site_url: "https://staging.quizpress.app".into(),
///     output_dir: "public".into(),
///     max_questions: Some(200),
///     ..Default::default()
///   })
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Base URL of the platform API, without a trailing slash. Defaults to the first non-empty variable of
    /// [`API_BASE_URL_VARS`], then [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Public URL of the site, used for canonical URLs and the sitemap.
    pub site_url: String,
    pub site_name: String,

    pub output_dir: PathBuf,

    /// Copied as-is into the output directory, if it exists.
    pub static_dir: PathBuf,

    /// Whether to clean the output directory before building.
    pub clean_output_dir: bool,

    /// Build from at most this many questions. Capped builds always fetch fresh questions.
    pub max_questions: Option<usize>,

    /// Curated course and topic metadata file. `None` uses the metadata shipped with quizpress.
    pub curated_path: Option<PathBuf>,

    /// Marketing pages of the site, listed first in the sitemap.
    pub static_site_routes: Vec<StaticRoute>,

    /// Pages of the web app, listed in the sitemap after [`Self::static_site_routes`].
    pub static_app_routes: Vec<StaticRoute>,

    /// Silence all log output. Passing `--quiet` on the command line has the same effect.
    pub quiet: bool,
}

/// Resolves the API base URL from the process environment.
pub fn api_base_url_from_env() -> String {
    api_base_url_from(|name| env::var(name).ok())
}

/// Resolves the API base URL through `lookup`, trimming a trailing `/`. Empty values are skipped.
pub fn api_base_url_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    API_BASE_URL_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn default_static_site_routes() -> Vec<StaticRoute> {
    vec![
        StaticRoute::new("/", ChangeFreq::Daily, 1.0),
        StaticRoute::new("/about", ChangeFreq::Monthly, 0.5),
        StaticRoute::new("/contact", ChangeFreq::Monthly, 0.4),
        StaticRoute::new("/privacy-policy", ChangeFreq::Yearly, 0.3),
        StaticRoute::new("/terms", ChangeFreq::Yearly, 0.3),
    ]
}

pub fn default_static_app_routes() -> Vec<StaticRoute> {
    vec![
        StaticRoute::new("/questions", ChangeFreq::Daily, 0.9),
        StaticRoute::new("/exams", ChangeFreq::Daily, 0.8),
        StaticRoute::new("/practice", ChangeFreq::Daily, 0.8),
        StaticRoute::new("/mock-tests", ChangeFreq::Weekly, 0.8),
        StaticRoute::new("/courses", ChangeFreq::Weekly, 0.8),
    ]
}

/// Provides default values for [`crate::generate()`].
impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            api_base_url: api_base_url_from_env(),
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            output_dir: "dist".into(),
            static_dir: "static".into(),
            clean_output_dir: true,
            max_questions: None,
            curated_path: None,
            static_site_routes: default_static_site_routes(),
            static_app_routes: default_static_app_routes(),
            quiet: false,
        }
    }
}
