//! Static SEO layer of the QuizPress question bank.
//!
//! Quizpress fetches every question from the platform API and writes a crawlable static site out of them: one page per
//! question under a stable, human-readable slug, listing pages per exam and per exam topic, pages for the curated core
//! courses and topics, and a `sitemap.xml` listing all of it.
//!
//! The building blocks are usable on their own, for example to compute slugs or SEO metadata for a batch of questions
//! without writing anything:
//! ```rs
//! use quizpress::{seo::generate_all_question_seo, slug::generate_all_slugs};
//!
//! let slugs = generate_all_slugs(&questions);
//! let seo = generate_all_question_seo(&questions, "https://quizpress.app");
//! ```

// Modules the end-user will interact directly or indirectly with
pub mod curated;
pub mod errors;
pub mod fetch;
pub mod index;
pub mod markdown;
pub mod question;
pub mod routes;
pub mod seo;
pub mod sitemap;
pub mod slug;
pub mod templating;

// Exports for end-users
pub use build::metadata::{BuildOutput, PageOutput, StaticFileOutput};
pub use build::options::{
    API_BASE_URL_VARS, BuildOptions, DEFAULT_API_BASE_URL, DEFAULT_SITE_URL, api_base_url_from_env,
};
pub use build::{build, execute_build};
pub use errors::QuizpressError;

mod build;

// Internal modules
mod logging;

use logging::init_logging;

/// The version of Quizpress being used.
///
/// Can be used to create a generator tag in the output HTML.
///
/// ## Example
/// ```rs
/// use quizpress::GENERATOR;
///
/// format!("<meta name=\"generator\" content=\"{}\">", GENERATOR);
/// ```
pub const GENERATOR: &str = concat!("Quizpress v", env!("CARGO_PKG_VERSION"));

/// Quizpress entrypoint. Fetches the questions and generates the output files.
///
/// ## Example
/// Should be called from the main function of the binary crate.
/// ```rs
/// use quizpress::{generate, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(BuildOptions::default())
/// }
/// ```
pub fn generate(options: BuildOptions) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    init_logging(options.quiet);

    let async_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    Ok(execute_build(&options, &async_runtime)?)
}
