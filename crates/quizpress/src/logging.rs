use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::{Level, info};
use std::io::Write;
use std::time::Duration;

/// Thresholds above which [`format_elapsed_time`] colors a duration yellow or red.
pub struct FormatElapsedTimeOptions<'a> {
    pub sec_yellow_threshold: u64,
    pub sec_red_threshold: u64,
    pub millis_yellow_threshold: Option<u128>,
    pub millis_red_threshold: Option<u128>,
    pub additional_fn: Option<&'a (dyn Fn(ColoredString) -> ColoredString + Sync)>,
}

impl Default for FormatElapsedTimeOptions<'_> {
    fn default() -> Self {
        Self {
            sec_yellow_threshold: 1,
            sec_red_threshold: 2,
            millis_yellow_threshold: Some(100),
            millis_red_threshold: Some(500),
            additional_fn: None,
        }
    }
}

impl FormatElapsedTimeOptions<'_> {
    /// Thresholds suited to network work, where a few seconds is normal.
    pub fn network() -> Self {
        Self {
            sec_yellow_threshold: 10,
            sec_red_threshold: 30,
            millis_yellow_threshold: None,
            millis_red_threshold: None,
            additional_fn: None,
        }
    }
}

/// Installs the build logger. `RUST_LOG` defaults to `info`, and `quiet` or `--quiet` on the command line silences
/// everything.
///
/// Calling it more than once is harmless: later calls keep the logger that is already installed.
pub fn init_logging(quiet: bool) {
    let logging_env = Env::default().filter_or("RUST_LOG", "info");
    let quiet = quiet || std::env::args().any(|arg| arg == "--quiet");

    let _ = Builder::from_env(logging_env)
        .format(move |buf, record| {
            if quiet {
                return Ok(());
            }

            if record.target() == "SKIP_FORMAT" {
                return writeln!(buf, "{}", record.args());
            }

            let target = record.target().to_ascii_lowercase();
            let target = match record.level() {
                Level::Error => target.bold().red(),
                Level::Warn => target.bold().yellow(),
                _ => target.bold().bright_yellow(),
            };

            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                target,
                record.args()
            )
        })
        .try_init();
}

pub fn format_elapsed_time(elapsed: Duration, options: &FormatElapsedTimeOptions) -> ColoredString {
    let result = match elapsed.as_secs() {
        secs if secs > options.sec_red_threshold => format!("{}m{}s", secs / 60, secs % 60).red(),
        secs if secs > options.sec_yellow_threshold => format!("{}s", secs).yellow(),
        secs if secs > 0 => format!("{}s", secs).normal(),
        _ => match elapsed.as_millis() {
            millis
                if options
                    .millis_red_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).red()
            }
            millis
                if options
                    .millis_yellow_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).yellow()
            }
            millis if millis > 0 => format!("{}ms", millis).normal(),
            _ => format!("{}μs", elapsed.as_micros()).normal(),
        },
    };

    match &options.additional_fn {
        Some(additional_fn) => additional_fn(result),
        None => result,
    }
}

pub fn print_title(title: &str) {
    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "SKIP_FORMAT", "{}", format!(" {} ", title).on_green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_time_units() {
        colored::control::set_override(false);
        let options = FormatElapsedTimeOptions::default();

        assert_eq!(
            format_elapsed_time(Duration::from_micros(250), &options).to_string(),
            "250μs"
        );
        assert_eq!(
            format_elapsed_time(Duration::from_millis(42), &options).to_string(),
            "42ms"
        );
        assert_eq!(
            format_elapsed_time(Duration::from_secs(2), &options).to_string(),
            "2s"
        );
        assert_eq!(
            format_elapsed_time(Duration::from_secs(125), &options).to_string(),
            "2m5s"
        );
    }

    #[test]
    fn test_format_elapsed_time_additional_fn() {
        colored::control::set_override(false);
        let dim = |s: ColoredString| s.dimmed();
        let options = FormatElapsedTimeOptions {
            additional_fn: Some(&dim),
            ..Default::default()
        };

        assert_eq!(
            format_elapsed_time(Duration::from_millis(3), &options).to_string(),
            "3ms"
        );
    }
}
