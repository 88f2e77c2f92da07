//! CLI argument definitions and the translate handler

use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

use crate::core::client::{translate, ChatCompletion, OpenAiClient};
use crate::core::config::{config_path_for, parse_language_list, Settings};
use crate::core::errors::TranslationError;
use crate::core::models::TranslationOutcome;

/// Printed when no positional text was given
pub const NO_INPUT_MESSAGE: &str = "!! Error: No input text provided.";

/// OpenAI Translator for GoldenDict
#[derive(Parser, Debug)]
#[command(name = "goldendict-openai-translator", version, about, long_about = None)]
pub struct Args {
    /// 1 or 2 languages, separated by comma, e.g. "English, Chinese" or "Chinese"
    #[arg(long = "LANGUAGE_RELATED", value_name = "LANGUAGES")]
    pub language_related: Option<Option<String>>,

    /// Enable verbose logging (to stderr)
    #[arg(short, long)]
    pub verbose: bool,

    /// Text to translate
    pub text: Vec<String>,
}

impl Args {
    /// Language list override, if one was given with a non-blank value
    pub fn language_override(&self) -> Option<Vec<String>> {
        self.language_related
            .as_ref()
            .and_then(|raw| raw.as_deref())
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_language_list)
    }

    /// Positional words joined by single spaces
    pub fn joined_text(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        }
    }
}

/// How a run ended, for the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Reached the translation stage and printed an outcome
    Completed,
    /// Stopped before any request: missing text or bad configuration
    Aborted,
}

/// Resolve the config path for this host and run the translation with the
/// OpenAI client, writing to `out`
pub async fn run<W: Write>(args: Args, out: &mut W) -> anyhow::Result<RunStatus> {
    run_on(std::env::consts::OS, args, out).await
}

/// As [`run`], with the OS identifier given explicitly
pub async fn run_on<W: Write>(os: &str, args: Args, out: &mut W) -> anyhow::Result<RunStatus> {
    let config_path = match config_path_for(os) {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            writeln!(out, "!! Error: {}", e)?;
            return Ok(RunStatus::Aborted);
        }
    };

    handle_translate(args, &config_path, OpenAiClient::new, out).await
}

/// Load config, apply the language override, translate, and print
/// `<text>`, a blank separator, then the outcome.
///
/// `make_client` is only called once the config has loaded and text is present.
pub async fn handle_translate<W, F, C>(
    args: Args,
    config_path: &Path,
    make_client: F,
    out: &mut W,
) -> anyhow::Result<RunStatus>
where
    W: Write,
    F: FnOnce(&Settings) -> Result<C, TranslationError>,
    C: ChatCompletion,
{
    let Some(text) = args.joined_text() else {
        writeln!(out, "{}", NO_INPUT_MESSAGE)?;
        return Ok(RunStatus::Aborted);
    };

    let mut settings = match Settings::load(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration failed: {}", e);
            writeln!(out, "!! Error: {}", e)?;
            return Ok(RunStatus::Aborted);
        }
    };

    if let Some(languages) = args.language_override() {
        info!("Overriding languages with {:?}", languages);
        settings = settings.with_languages(languages);
    }

    debug!("Translating {} chars", text.chars().count());

    let outcome = match make_client(&settings) {
        Ok(client) => translate(&client, &settings.languages, &text).await,
        Err(e) => TranslationOutcome::Failed(e),
    };

    writeln!(out, "{}", text)?;
    writeln!(out, " \n")?;
    writeln!(out, "{}", outcome)?;
    out.flush()?;

    Ok(RunStatus::Completed)
}
