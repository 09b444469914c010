use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cnki_config::translator::TranslatorConfig;

#[derive(Parser, Debug)]
#[command(name = "cnki", version, about = "Translate text through the CNKI dictionary service")]
pub struct Cli {
    /// Preference file holding settings and the cached token
    #[arg(long, global = true, default_value = "prefs.json")]
    pub prefs: PathBuf,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a file, or stdin when no file is given
    Translate(TranslateArgs),
    /// Print the current token
    Token {
        /// Fetch a new token even if the cached one is fresh
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct TranslateArgs {
    pub file: Option<PathBuf>,

    /// Split into sentence-aligned chunks
    #[arg(long, conflicts_with = "no_split")]
    pub split: bool,

    /// Send the whole text at once, truncated to the maximum length
    #[arg(long)]
    pub no_split: bool,

    #[arg(long)]
    pub max_length: Option<usize>,

    /// Pacing between chunks, milliseconds per character of the maximum length
    #[arg(long)]
    pub split_second: Option<f64>,

    /// Pattern removed from every translation
    #[arg(long)]
    pub regex: Option<String>,

    /// Do not show the truncation warning
    #[arg(long)]
    pub silent: bool,
}

impl TranslateArgs {
    /// Applies one-run overrides, nothing is persisted.
    pub fn apply(&self, mut config: TranslatorConfig) -> TranslatorConfig {
        if self.split {
            config.use_split = true;
        }
        if self.no_split {
            config.use_split = false;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if let Some(split_second) = self.split_second {
            config.split_second = split_second;
        }
        if let Some(regex) = &self.regex {
            config.regex = Some(regex.clone()).filter(|r| !r.is_empty());
        }
        config
    }
}
