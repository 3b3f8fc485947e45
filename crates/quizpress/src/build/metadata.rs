use std::{path::PathBuf, process::Termination, time::Instant};

/// Metadata returned by [`generate()`](crate::generate) for a single page after a successful build.
#[derive(Debug)]
pub struct PageOutput {
    pub route: String,
    pub file_path: PathBuf,
}

/// Metadata returned by [`generate()`](crate::generate) for a single static file after a successful build.
///
/// A static file is copied to the output directory without any processing.
#[derive(Debug)]
pub struct StaticFileOutput {
    pub file_path: PathBuf,
    pub original_path: PathBuf,
}

/// Metadata returned by [`generate()`](crate::generate) after a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub static_files: Vec<StaticFileOutput>,
    /// Routes of curated pages that were not written because the API has no content for them.
    pub skipped_pages: Vec<String>,
    pub question_count: usize,
    pub sitemap_urls: usize,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            static_files: Vec::new(),
            skipped_pages: Vec::new(),
            question_count: 0,
            sitemap_urls: 0,
        }
    }

    pub(crate) fn add_page(&mut self, route: String, file_path: PathBuf) {
        self.pages.push(PageOutput { route, file_path });
    }

    pub(crate) fn add_static_file(&mut self, file_path: PathBuf, original_path: PathBuf) {
        self.static_files.push(StaticFileOutput {
            file_path,
            original_path,
        });
    }

    pub(crate) fn add_skipped_page(&mut self, route: String) {
        self.skipped_pages.push(route);
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
