//! chatbubble - Terminal Chat Transcript Viewer
//!
//! Shows a saved chat transcript with typing animation for assistant replies.

use anyhow::{Context, Result};
use chatbubble::config::ThemeName;
use chatbubble::render::plain;
use chatbubble::render::ui::{ColorTheme, TerminalUI};
use chatbubble::transcript::load_transcript;
use chatbubble::{Application, BubbleError, Config};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

fn cli() -> Command {
    Command::new("chatbubble")
        .version(chatbubble::VERSION)
        .about("View chat transcripts in the terminal with typing animation")
        .long_about(
            "chatbubble renders a JSON chat transcript as chat bubbles. Assistant replies \
             marked as typing are revealed one character at a time and formatted with a small \
             markdown dialect: headings, rules, bold text and links.",
        )
        .arg(
            Arg::new("transcript")
                .help("Path to the JSON transcript")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .help("Print the formatted transcript to stdout and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-animate")
                .long("no-animate")
                .help("Show every message in full immediately")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MS")
                .help("Milliseconds between two revealed characters")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_name("NAME")
                .help("Color theme: default, monochrome or high-contrast"),
        )
        .arg(
            Arg::new("no-timestamps")
                .long("no-timestamps")
                .help("Hide message clocks")
                .action(ArgAction::SetTrue),
        )
}

/// Apply command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> chatbubble::Result<()> {
    if matches.get_flag("no-animate") {
        config.animate = false;
    }
    if let Some(ms) = matches.get_one::<u64>("interval-ms") {
        config.tick_interval = Duration::from_millis(*ms);
        config.validate().map_err(|err| {
            BubbleError::invalid_argument(format!("--interval-ms {ms}: {err}"))
        })?;
    }
    if let Some(theme) = matches.get_one::<String>("theme") {
        config.theme = theme.parse::<ThemeName>().map_err(|_| {
            BubbleError::invalid_argument(format!(
                "--theme {theme}: expected one of {}",
                ThemeName::ALL.map(ThemeName::as_str).join(", ")
            ))
        })?;
    }
    if matches.get_flag("no-timestamps") {
        config.show_timestamps = false;
    }
    config.validate()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let matches = cli().get_matches();

    let transcript_path = PathBuf::from(
        matches
            .get_one::<String>("transcript")
            .expect("transcript argument is required"),
    );

    let mut config = Config::load().context("failed to load configuration")?;
    apply_overrides(&mut config, &matches)?;

    let messages = load_transcript(&transcript_path)?;

    if matches.get_flag("plain") {
        print!(
            "{}",
            plain::render_transcript(&messages, config.show_timestamps)
        );
        return Ok(());
    }

    let title = transcript_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| transcript_path.display().to_string());

    let ui_renderer = Box::new(TerminalUI::with_theme(ColorTheme::from(config.theme))?);
    let mut app = Application::new(title, messages, config, ui_renderer)?;

    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!chatbubble::VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let matches = cli()
            .try_get_matches_from([
                "chatbubble",
                "chat.json",
                "--no-animate",
                "--interval-ms",
                "35",
                "--theme",
                "monochrome",
            ])
            .unwrap();
        assert!(matches.get_flag("no-animate"));
        assert!(!matches.get_flag("plain"));
        assert_eq!(matches.get_one::<u64>("interval-ms"), Some(&35));
        assert_eq!(
            matches.get_one::<String>("theme").map(String::as_str),
            Some("monochrome")
        );
    }

    #[test]
    fn test_transcript_is_required() {
        assert!(cli().try_get_matches_from(["chatbubble"]).is_err());
    }

    #[test]
    fn test_overrides_apply_flags() {
        let matches = cli()
            .try_get_matches_from([
                "chatbubble",
                "chat.json",
                "--no-timestamps",
                "--theme",
                "high-contrast",
            ])
            .unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &matches).unwrap();
        assert!(!config.show_timestamps);
        assert!(config.animate);
        assert_eq!(config.theme, ThemeName::HighContrast);
    }

    #[test]
    fn test_bad_overrides_are_invalid_arguments() {
        let matches = cli()
            .try_get_matches_from(["chatbubble", "chat.json", "--theme", "neon"])
            .unwrap();
        let err = apply_overrides(&mut Config::default(), &matches).unwrap_err();
        assert!(matches!(err, BubbleError::InvalidArgument { .. }));
        assert!(err.to_string().contains("monochrome"));

        let matches = cli()
            .try_get_matches_from(["chatbubble", "chat.json", "--interval-ms", "0"])
            .unwrap();
        let err = apply_overrides(&mut Config::default(), &matches).unwrap_err();
        assert!(matches!(err, BubbleError::InvalidArgument { .. }));
    }
}
