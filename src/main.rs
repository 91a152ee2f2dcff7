// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use crate::providers::gemini::Gemini;
use crate::providers::groq::Groq;
use crate::providers::TranslationEngine;
use crate::translation::{
    Delay, EngineSlot, FallbackOrchestrator, ProgressSink, ProgressUpdate, RetryPolicy,
    TokioDelay, TranslationPipeline,
};

mod app_config;
mod errors;
mod file_utils;
mod providers;
mod segmenter;
mod translation;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// transdoc - resilient AI document translation
///
/// Splits a long document into bounded segments, translates each one through
/// a chain of AI engines with retries and fallback, and reassembles the
/// result in order.
#[derive(Parser, Debug)]
#[command(name = "transdoc")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered document translation tool")]
#[command(long_about = "transdoc translates long text or Markdown documents using AI engines.

EXAMPLES:
    transdoc book.md                        # Translate using default config
    transdoc -t fr book.md                  # Translate to French
    transdoc -o out.md book.md              # Write to an explicit output path
    transdoc --atomic big.md                # Smaller segments for strict rate limits
    transdoc --log-level debug book.md      # Verbose logging

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, defaults are
    used. API keys can also come from GROQ_API_KEY and GEMINI_API_KEY.")]
struct CommandLineOptions {
    /// Input document to translate (plain text or Markdown)
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target language code or name (e.g., 'es', 'fr', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output file path (defaults to <input>.<lang>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Use 2000-character segments regardless of configuration
    #[arg(long)]
    atomic: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Progress sink that drives an indicatif bar from pipeline updates
struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] segment {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ProgressBarSink {
    fn update(&self, update: ProgressUpdate) {
        if self.bar.length().unwrap_or(0) != update.total as u64 {
            self.bar.set_length(update.total as u64);
        }
        self.bar.set_position(update.current as u64);
        if update.attempt > 1 {
            self.bar
                .set_message(format!("(attempt {}) {}", update.attempt, update.status));
        } else {
            self.bar.set_message(update.status);
        }
    }
}

/// Build the engine fallback chain from configuration.
///
/// Engines keep their configured position even without a credential; the
/// orchestrator skips them at run time so the failure summary can say why.
fn build_chain(config: &Config) -> Vec<EngineSlot> {
    let groq_config = &config.engines.groq;
    let gemini_config = &config.engines.gemini;

    let groq: Arc<dyn TranslationEngine> = Arc::new(Groq::new_with_models(
        groq_config.api_key.clone(),
        groq_config.endpoint.clone(),
        groq_config.models.clone(),
    ));
    let gemini: Arc<dyn TranslationEngine> = Arc::new(Gemini::new_with_models(
        gemini_config.api_key.clone(),
        gemini_config.endpoint.clone(),
        gemini_config.models.clone(),
    ));

    vec![
        EngineSlot::with_policy(
            groq,
            groq_config.priority,
            RetryPolicy {
                max_retries: groq_config.max_retries,
                backoff_base_ms: groq_config.backoff_base_ms,
            },
        ),
        EngineSlot::with_policy(
            gemini,
            gemini_config.priority,
            RetryPolicy {
                max_retries: gemini_config.max_retries,
                backoff_base_ms: gemini_config.backoff_base_ms,
            },
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // Load configuration, falling back to defaults when the file is absent
    let mut config = if std::path::Path::new(&cli.config_path).exists() {
        Config::from_file(&cli.config_path)?
    } else {
        info!(
            "Config file {} not found, using defaults",
            cli.config_path
        );
        Config::default_config()
    };

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    if let Some(target) = cli.target_language {
        config.target_language = target;
    }
    if cli.atomic {
        config.segment_max_chars = 2000;
    }
    config.apply_env_credentials();
    config.validate()?;

    let target_name = config.target_language_name()?;
    let document = file_utils::read_document(&cli.input_path)?;
    let output_path = match cli.output {
        Some(path) => path,
        None => file_utils::default_output_path(&cli.input_path, &config.target_language)?,
    };

    info!(
        "Translating '{}' to {} ({})",
        document.title, target_name, output_path.display()
    );

    let delay: Arc<dyn Delay> = Arc::new(TokioDelay);
    let orchestrator = FallbackOrchestrator::new(build_chain(&config), delay.clone());
    let pipeline = TranslationPipeline::new(
        orchestrator,
        config.segment_max_chars,
        config.pacing_ms,
        delay,
    );

    let sink = Arc::new(ProgressBarSink::new());
    let sink_handle: Arc<dyn ProgressSink> = sink.clone();
    let result = pipeline
        .run(&document, &target_name, Some(sink_handle))
        .await;
    sink.finish();

    match result {
        Ok(body) => {
            file_utils::write_document(&output_path, &document, &body)?;
            info!("Translation complete: {}", output_path.display());
            Ok(())
        }
        Err(e) => {
            // A failed run produces no output file
            error!("{}", e);
            Err(anyhow!("{}", e))
        }
    }
}
