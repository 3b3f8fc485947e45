use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use colored::Colorize;
use log::{debug, info, trace, warn};
use maud::Markup;

use crate::{
    BuildOptions, BuildOutput,
    curated::{CuratedContent, course_of_topic_path},
    errors::{BuildError, QuizpressError},
    fetch::{
        ApiClient, LearningContentSource, QuestionCache, QuestionPageSource, fetch_all_questions,
    },
    index::build_question_indexes,
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
    routes::{exam_path, exam_topic_path, page_file_path, question_path},
    seo::generate_all_question_seo,
    sitemap::{SitemapSources, collect_sitemap_entries, render_sitemap, write_sitemap},
    templating::{Site, course_page, exam_page, exam_topic_page, question_page, topic_page},
};

pub mod metadata;
pub mod options;

pub fn execute_build(
    options: &BuildOptions,
    async_runtime: &tokio::runtime::Runtime,
) -> Result<BuildOutput, QuizpressError> {
    let client = ApiClient::new(&options.api_base_url)?;
    let cache = QuestionCache::new();

    async_runtime.block_on(async { build(options, &client, &cache).await })
}

/// Fetches everything from `api` and writes the site to the output directory.
pub async fn build<A>(
    options: &BuildOptions,
    api: &A,
    cache: &QuestionCache,
) -> Result<BuildOutput, QuizpressError>
where
    A: QuestionPageSource + LearningContentSource,
{
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);
    let section_format_options = FormatElapsedTimeOptions::default();

    info!(target: "build", "Output directory: {}", options.output_dir.display());

    let curated = match &options.curated_path {
        Some(path) => CuratedContent::load(path)?,
        None => CuratedContent::embedded()?,
    };

    // Nothing in the output directory changes until every fetch has succeeded.
    print_title("fetching questions");
    let fetch_start = Instant::now();
    let questions = fetch_all_questions(api, cache, options.max_questions).await?;
    build_metadata.question_count = questions.len();

    info!(target: "fetch", "{}", format!("{} questions fetched in {}", questions.len(), format_elapsed_time(fetch_start.elapsed(), &FormatElapsedTimeOptions::network())).bold());

    print_title("fetching learning content");
    let content_start = Instant::now();

    let mut courses = Vec::new();
    for (slug, course) in curated.core_courses() {
        match api.fetch_course(slug).await? {
            Some(content) => courses.push((slug, course, content)),
            None => {
                warn!(target: "content", "No learning content for course {}, skipping {}", slug, course.path);
                build_metadata.add_skipped_page(course.path.clone());
            }
        }
    }

    let mut topics = Vec::new();
    for (slug, topic) in curated.core_topics() {
        match api.fetch_topic(slug).await? {
            Some(content) => topics.push((slug, topic, content)),
            None => {
                warn!(target: "content", "No learning content for topic {}, skipping {}", slug, topic.path);
                build_metadata.add_skipped_page(topic.path.clone());
            }
        }
    }

    info!(target: "content", "{}", format!("Learning content for {} courses and {} topics fetched in {}", courses.len(), topics.len(), format_elapsed_time(content_start.elapsed(), &FormatElapsedTimeOptions::network())).bold());

    trace!(target: "build", "Setting up required directories...");
    if options.clean_output_dir {
        clean_output_dir(&options.output_dir)?;
    }
    fs::create_dir_all(&options.output_dir).map_err(|source| BuildError::WriteFailed {
        path: options.output_dir.clone(),
        source,
    })?;

    let indexes = build_question_indexes(&questions);
    let seo = generate_all_question_seo(&questions, &options.site_url);
    let site = Site {
        url: &options.site_url,
        name: &options.site_name,
    };

    print_title("generating pages");
    let pages_start = Instant::now();

    for question in questions.iter() {
        let Some(record) = seo.get(&question.question_number) else {
            continue;
        };

        write_page(
            &options.output_dir,
            &question_path(&record.slug),
            question_page(&site, question, record),
            &mut build_metadata,
        )?;
    }

    for exam in indexes.exam_groups().values() {
        write_page(
            &options.output_dir,
            &exam_path(&exam.name),
            exam_page(&site, &exam.name, &exam.topic_counts(), &exam.questions, &seo),
            &mut build_metadata,
        )?;

        for topic in exam.topics.values() {
            write_page(
                &options.output_dir,
                &exam_topic_path(&exam.name, &topic.name),
                exam_topic_page(&site, &exam.name, &topic.name, &topic.questions, &seo),
                &mut build_metadata,
            )?;
        }
    }

    for (slug, course, content) in &courses {
        let course_topics: Vec<_> = curated
            .topics_of_course(*slug)
            .filter(|(_, topic)| !build_metadata.skipped_pages.contains(&topic.path))
            .collect();

        write_page(
            &options.output_dir,
            &course.path,
            course_page(&site, course, content, &course_topics),
            &mut build_metadata,
        )?;
    }

    for (_, topic, content) in &topics {
        let course = course_of_topic_path(&topic.path).and_then(|course| curated.courses.get(course));
        write_page(
            &options.output_dir,
            &topic.path,
            topic_page(&site, topic, content, course),
            &mut build_metadata,
        )?;
    }

    info!(target: "pages", "{}", format!("{} pages generated in {}", build_metadata.pages.len(), format_elapsed_time(pages_start.elapsed(), &section_format_options)).bold());

    // Check if static directory exists
    if options.static_dir.exists() {
        let static_start = Instant::now();
        print_title("copying static files");

        copy_recursively(
            &options.static_dir,
            &options.output_dir,
            &mut build_metadata,
        )?;

        info!(target: "build", "{}", format!("Static files copied in {}", format_elapsed_time(static_start.elapsed(), &section_format_options)).bold());
    }

    print_title("generating sitemap");
    let static_site_routes = options.static_site_routes.as_slice();
    let static_app_routes = options.static_app_routes.as_slice();
    let entries = collect_sitemap_entries(&SitemapSources {
        site_url: &options.site_url,
        static_site_routes,
        static_app_routes,
        curated: &curated,
        skipped_routes: &build_metadata.skipped_pages,
        indexes: &indexes,
        seo: &seo,
        build_date: Some(chrono::Local::now().date_naive()),
    });
    let sitemap_path = write_sitemap(&render_sitemap(&entries), &options.output_dir)?;
    build_metadata.sitemap_urls = entries.len();

    info!(target: "sitemap", "Generated sitemap with {} URLs at {}", entries.len(), sitemap_path.display());

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &section_format_options)).bold());

    Ok(build_metadata)
}

fn clean_output_dir(output_dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(BuildError::CleanFailed {
            path: output_dir.to_path_buf(),
            source,
        }),
    }
}

fn write_page(
    output_dir: &Path,
    route: &str,
    page: Markup,
    build_metadata: &mut BuildOutput,
) -> Result<(), BuildError> {
    let page_start = Instant::now();
    let file_path = page_file_path(output_dir, route);

    write_route_file(page.into_string().as_bytes(), &file_path).map_err(|source| {
        BuildError::WriteFailed {
            path: file_path.clone(),
            source,
        }
    })?;

    debug!(target: "pages", "{} -> {} {}", route, file_path.to_string_lossy().dimmed(), format_elapsed_time(page_start.elapsed(), &FormatElapsedTimeOptions::default()).dimmed());

    build_metadata.add_page(route.to_string(), file_path);

    Ok(())
}

fn copy_recursively(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    build_metadata: &mut BuildOutput,
) -> Result<(), BuildError> {
    let copy_failed = |path: &Path| {
        let path = path.to_path_buf();
        move |source| BuildError::CopyFailed { path, source }
    };

    fs::create_dir_all(&destination).map_err(copy_failed(destination.as_ref()))?;
    for entry in fs::read_dir(&source).map_err(copy_failed(source.as_ref()))? {
        let entry = entry.map_err(copy_failed(source.as_ref()))?;
        let filetype = entry.file_type().map_err(copy_failed(&entry.path()))?;
        let target: PathBuf = destination.as_ref().join(entry.file_name());

        if filetype.is_dir() {
            copy_recursively(entry.path(), target, build_metadata)?;
        } else {
            fs::copy(entry.path(), &target).map_err(copy_failed(&entry.path()))?;
            build_metadata.add_static_file(target, entry.path());
        }
    }

    Ok(())
}

fn write_route_file(content: &[u8], file_path: &Path) -> Result<(), io::Error> {
    // Create the parent directories if it doesn't exist
    if let Some(parent_dir) = file_path.parent() {
        fs::create_dir_all(parent_dir)?
    }

    fs::write(file_path, content)?;

    Ok(())
}
