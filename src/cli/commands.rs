use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{Config, LoggingConfig};
use crate::feed::Article;
use crate::storage::{ArticleStore, DocumentStore, SharedStore};
use crate::sweep::SweepOrchestrator;
use crate::error::{Error, Result};

/// Write the default configuration to `config_path` or the standard location
pub fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_file = match config_path {
        Some(path) => path,
        None => Config::config_file()?,
    };

    if config_file.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {} (use --force to overwrite)",
            config_file.display()
        )));
    }

    if let Some(parent) = config_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let config = Config::default();
    config.save(&config_file)?;
    info!("Created default configuration: {}", config_file.display());

    println!("Config file: {}", config_file.display());
    println!("Store file:  {}", config.store.path.display());
    println!("Feeds:       {}", config.feeds.urls.len());

    Ok(())
}

/// Open the configured document store; the handle lives for the whole command.
pub fn open_store(config: &Config) -> Result<SharedStore> {
    let store = DocumentStore::open(&config.store.path)?;
    debug!("Opened article store at {}", store.path().display());
    Ok(Arc::new(store))
}

pub async fn update(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let sweeps = SweepOrchestrator::from_config(config, store)?;

    let report = sweeps.update().await?;

    for (url, reason) in &report.failed_feeds {
        println!("skipped {}: {}", url, reason);
    }
    println!("{}", update_message(report.added(), report.examined()));

    Ok(())
}

pub async fn cleanup(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let sweeps = SweepOrchestrator::from_config(config, store)?;

    let removed = sweeps.cleanup().await?;
    println!("[info] cleanup completed ({} removed)", removed);

    Ok(())
}

pub async fn recent(config: &Config, limit: Option<usize>, compact: bool) -> Result<()> {
    let store = open_store(config)?;
    let articles = store.list_recent(limit.unwrap_or(config.store.recent_limit)).await?;

    let rendered = if compact {
        render_compact(&articles)
    } else {
        render_full(&articles)
    };
    print!("{}", rendered);

    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let count = store.count().await?;
    let articles = store.list_recent(count).await?;

    print!(
        "{}",
        render_status(&config.store.path, count, articles.first(), articles.last(), &config.feeds.urls)
    );

    Ok(())
}

/// Store summary: path, article count, newest and oldest articles, configured feeds
pub fn render_status(
    path: &Path,
    count: usize,
    newest: Option<&Article>,
    oldest: Option<&Article>,
    feeds: &[String],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Store:    {}\n", path.display()));
    out.push_str(&format!("Articles: {}\n", count));
    if let Some(article) = newest {
        out.push_str(&format!("Newest:   {} ({})\n", article.title, article.published_at.to_rfc3339()));
    }
    if let Some(article) = oldest {
        out.push_str(&format!("Oldest:   {} ({})\n", article.title, article.published_at.to_rfc3339()));
    }
    out.push_str(&format!("Feeds:    {}\n", feeds.len()));
    for url in feeds {
        out.push_str(&format!("  {}\n", url));
    }
    out
}

fn update_message(added: usize, examined: usize) -> String {
    format!("[info] update completed ({} added, {} examined)", added, examined)
}

/// Full listing with image, credit and summary for each article
pub fn render_full(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles stored.\n".to_string();
    }

    let mut out = String::new();
    for article in articles {
        out.push_str(&format!("{}\n", article.title));
        out.push_str(&format!("  {} | {}\n", article.credit, article.published_at.format("%Y-%m-%d %H:%M UTC")));
        out.push_str(&format!("  {}\n", article.link));
        out.push_str(&format!("  image: {}\n", article.image));
        if !article.summary.is_empty() {
            out.push_str(&format!("  {}\n", article.summary));
        }
        out.push('\n');
    }
    out
}

/// One line per article, for narrow terminals
pub fn render_compact(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| format!("{} [{}] {}\n", a.published_at.format("%m-%d %H:%M"), a.credit, a.title))
        .collect()
}

/// Generate shell completions
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Initialize tracing; `--debug` and `--verbose` take precedence over the configured level.
pub fn init_logging(config: &LoggingConfig, debug: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(&config.level)
            .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug);

    let result = match (config.log_to_file, config.json_format) {
        (true, true) => builder.json().with_writer(file_appender(&config.log_file)).try_init(),
        (true, false) => builder.with_ansi(false).with_writer(file_appender(&config.log_file)).try_init(),
        (false, true) => builder.json().try_init(),
        (false, false) => builder.try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;
    debug!("Logging initialized");
    Ok(())
}

fn file_appender(log_file: &str) -> tracing_appender::rolling::RollingFileAppender {
    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "news-sweep.log".into());

    tracing_appender::rolling::never(dir, file_name)
}
