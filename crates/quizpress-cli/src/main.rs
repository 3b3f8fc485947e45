use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quizpress::{BuildOptions, BuildOutput, generate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Silence all build output
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the questions and build the site
    Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Directory to write the site to
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory copied as-is into the output
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Public URL of the site
    #[arg(long)]
    site_url: Option<String>,

    /// Base URL of the platform API, overriding PUBLIC_API_BASE_URL and API_BASE_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Only build from the first N questions
    #[arg(long, value_name = "N")]
    max_questions: Option<usize>,

    /// Curated course and topic metadata (JSON)
    #[arg(long, value_name = "FILE")]
    curated: Option<PathBuf>,

    /// Keep existing files in the output directory
    #[arg(long)]
    no_clean: bool,
}

impl BuildArgs {
    fn into_options(self, quiet: bool) -> BuildOptions {
        let defaults = BuildOptions::default();

        BuildOptions {
            api_base_url: self
                .api_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            site_url: self.site_url.unwrap_or(defaults.site_url),
            output_dir: self.output.unwrap_or(defaults.output_dir),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            clean_output_dir: !self.no_clean,
            max_questions: self.max_questions,
            curated_path: self.curated,
            quiet,
            ..defaults
        }
    }
}

fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => generate(args.into_options(cli.quiet)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let cli = Cli::parse_from([
            "quizpress",
            "build",
            "--output",
            "public",
            "--api-url",
            "https://api.quizpress.test/",
            "--max-questions",
            "50",
            "--no-clean",
            "--quiet",
        ]);
        assert!(cli.quiet);

        let Commands::Build(args) = cli.command;
        let options = args.into_options(cli.quiet);

        assert_eq!(options.output_dir, PathBuf::from("public"));
        assert_eq!(options.api_base_url, "https://api.quizpress.test");
        assert_eq!(options.max_questions, Some(50));
        assert!(!options.clean_output_dir);
        assert_eq!(options.curated_path, None);
        assert!(options.quiet);
    }
}
