use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cnki_config::{Config, JsonFilePrefs};
use cnki_translator::{HttpApi, TokenStore, TranslationPipeline, TranslationResult};
use cnki_types::{ProgressEvent, TranslateTask};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod progress;

use self::cli::{Cli, Command, TranslateArgs};
use self::progress::{ChannelObserver, render_progress};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let prefs = Arc::new(
        JsonFilePrefs::open(&cli.prefs)
            .with_context(|| format!("Failed to open preferences {}", cli.prefs.display()))?,
    );
    let config = Config::load(prefs.as_ref());

    let api = Arc::new(
        HttpApi::from_config(&config.translator, Duration::from_secs(config.timeout_seconds))
            .context("Failed to build HTTP client")?,
    );
    let tokens = TokenStore::new(api.clone(), prefs.clone());

    match cli.command {
        Command::Token { refresh } => {
            let token = tokens.get_token(refresh).await?;
            if token.is_empty() {
                tracing::warn!("Service returned no token");
            }
            println!("{token}");
            Ok(())
        }
        Command::Translate(args) => run_translate(args, config, api, tokens).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn run_translate(
    args: TranslateArgs,
    config: Config,
    api: Arc<HttpApi>,
    tokens: TokenStore,
) -> anyhow::Result<()> {
    let raw = read_input(args.file.as_deref()).await?;
    let translator_config = args.apply(config.translator);

    let (tx, rx) = kanal::unbounded_async::<ProgressEvent>();
    let result = TranslationResult::new();
    let observer = Arc::new(ChannelObserver::new(result.clone(), tx.clone()));
    let pipeline = TranslationPipeline::new(api, tokens, translator_config, observer)
        .context("Invalid translator configuration")?;

    let interactive = atty::is(atty::Stream::Stderr);
    let renderer = tokio::spawn(render_progress(rx, interactive));

    let mut task = TranslateTask::new(raw).silent(args.silent);
    tracing::info!(
        "Translating {} chars (split: {})",
        task.raw.chars().count(),
        pipeline.config().use_split
    );
    let outcome = pipeline.run_task(&mut task, &result).await;

    let event = match &outcome {
        Ok(()) => ProgressEvent::Finished {
            result: task.result.clone(),
        },
        Err(e) => ProgressEvent::Failed {
            message: e.to_string(),
            banned: e.is_access_banned(),
            result: task.result.clone(),
        },
    };
    if let Err(e) = tx.send(event).await {
        tracing::error!("progress channel closed: {e}");
    }

    if let Err(e) = renderer.await {
        tracing::error!("render task panicked: {e}");
    }

    outcome.map_err(Into::into)
}
