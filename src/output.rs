//! # Output Configuration
//!
//! Terminal presentation for the CLI: whether to use colors and emoji, how to
//! style per-family status, and the build progress bar.
//!
//! The `--color=never|always|auto` flag wins; in `auto` mode the usual
//! environment conventions apply:
//! - `NO_COLOR` disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even in non-TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use mathfonts::output::{OutputConfig, emoji};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Building STIX", emoji(&out, "🔨", "[BUILD]"));
//! ```

use std::env;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Suppress progress bars.
    pub quiet: bool,
}

impl OutputConfig {
    /// Create an output configuration from the environment and the value of
    /// the `--color` flag ("always", "never" or "auto").
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self {
            use_color,
            quiet: false,
        }
    }

    /// Same configuration with progress bars suppressed when `quiet` is set.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self {
            use_color: true,
            quiet: false,
        }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self {
            use_color: false,
            quiet: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// The emoji when colors are enabled, the plain alternative otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Style an already padded status cell: green when the family was built,
/// bold red when it failed.
pub fn family_status(config: &OutputConfig, succeeded: bool, cell: String) -> String {
    if !config.use_color {
        return cell;
    }
    if succeeded {
        style(cell).green().force_styling(true).to_string()
    } else {
        style(cell).red().bold().force_styling(true).to_string()
    }
}

/// Progress bar over `len` families, drawn on stderr.
///
/// Hidden in quiet mode and when stderr is not a terminal, so piped output
/// stays clean.
pub fn family_progress(config: &OutputConfig, len: usize) -> ProgressBar {
    if config.quiet || !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
    let template = if config.use_color {
        "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}"
    } else {
        "[{elapsed_precise}] [{bar:30}] {pos}/{len} {msg}"
    };
    if let Ok(progress_style) = ProgressStyle::with_template(template) {
        bar.set_style(progress_style.progress_chars("=> "));
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
