use reco::catalog::Catalog;
use reco::cli::{Cli, Commands, ConfigAction};
use reco::config::Config;
use reco::embedding;
use reco::engine::{Recommender, RequestOptions};
use reco::error::{RecoError, Result};
use reco::history::{ChatHistory, Role};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Query {
            query,
            limit,
            threshold,
            catalog,
            json,
        } => cmd_query(cli.config, &query, limit, threshold, catalog, json)?,
        Commands::Catalog { catalog } => cmd_catalog(cli.config, catalog)?,
        Commands::History { clear } => cmd_history(cli.config, clear)?,
        Commands::Config { action } => cmd_config(cli.config, action)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "reco=debug" } else { "reco=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn cmd_query(
    config_path: Option<PathBuf>,
    query: &str,
    limit: Option<usize>,
    threshold: Option<f32>,
    catalog_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path.as_deref())?;
    let catalog = load_catalog(&config, catalog_path)?;

    let provider = embedding::build_provider(&config.embedding.model, config.embedding.dimension);
    let engine = Recommender::new(&config, provider, &catalog)?;

    let options = RequestOptions {
        top_k: limit.unwrap_or(config.engine.top_k),
        similarity_threshold: threshold.unwrap_or(config.engine.similarity_threshold),
    };
    let recommendation = engine.recommend_with(query, options);

    if json {
        let rendered =
            serde_json::to_string_pretty(&recommendation.items).map_err(|e| RecoError::Json {
                source: e,
                context: "Failed to render results".to_string(),
            })?;
        println!("{}", rendered);
    } else {
        println!("{}", recommendation.summary);
        for (rank, item) in recommendation.items.iter().enumerate() {
            println!(
                "{:2}. {} - ${:.2} [{}] rating {:.1}",
                rank + 1,
                item.name,
                item.price,
                item.category,
                item.rating_or_zero()
            );
            if let Some(description) = &item.description {
                println!("      {}", description);
            }
        }
    }

    record_exchange(&config, query, &recommendation.summary)?;

    Ok(())
}

fn cmd_catalog(config_path: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load_or_default(config_path.as_deref())?;
    let catalog = load_catalog(&config, catalog_path)?;

    println!("{} items:", catalog.len());
    for item in &catalog.items {
        println!(
            "  {:4}  {:<45} {:<12} ${:>8.2}  {:.1}",
            item.id,
            item.name,
            item.category,
            item.price,
            item.rating_or_zero()
        );
    }

    Ok(())
}

fn cmd_history(config_path: Option<PathBuf>, clear: bool) -> Result<()> {
    let config = Config::load_or_default(config_path.as_deref())?;
    let path = history_path(&config);

    if clear {
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| RecoError::Io {
                source: e,
                context: format!("Failed to remove history file: {}", path.display()),
            })?;
        }
        println!("History cleared.");
        return Ok(());
    }

    if !path.exists() {
        println!("No history yet.");
        return Ok(());
    }

    let history = ChatHistory::load(&path)?;
    for message in history.get() {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "reco",
        };
        println!(
            "[{}] {}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            who,
            message.content
        );
    }

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(config_path.as_deref())?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(p) => p,
                None => Config::default_path()?,
            };
            if path.exists() && !force {
                return Err(RecoError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
        }
    }

    Ok(())
}

fn load_catalog(config: &Config, override_path: Option<PathBuf>) -> Result<Catalog> {
    let path = override_path.or_else(|| config.storage.catalog_file.clone());
    match path {
        Some(p) => Catalog::load(&p),
        None => {
            tracing::debug!("no catalog configured, using built-in sample");
            Ok(Catalog::sample())
        }
    }
}

fn history_path(config: &Config) -> PathBuf {
    config.storage.data_dir.join("history.json")
}

/// Append the exchange to the persistent history. The ranking pipeline never
/// reads this; failures only cost the record, not the answer.
fn record_exchange(config: &Config, query: &str, summary: &str) -> Result<()> {
    let path = history_path(config);

    let mut history = if path.exists() {
        ChatHistory::load(&path)?
    } else {
        ChatHistory::new()
    };

    history.add(Role::User, query);
    history.add(Role::Assistant, summary);
    history.save(&path)
}
