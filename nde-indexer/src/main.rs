use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nde_indexer::{Dependencies, IndexerConfig, IndexingError, LogFormat, Overrides};
use nde_indexer::config::SearchConfig;
use nde_indexer_repository::SearchIndexError;
use nde_indexer_shared::search::{DEFAULT_PER_PAGE, DEFAULT_SORT_BY};
use nde_indexer_shared::SearchQuery;

#[derive(Parser)]
#[command(name = "nde-indexer")]
#[command(about = "Rebuilds and queries the NDE video transcript search collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the search collection from the database (default)
    Reindex(ReindexArgs),
    /// Run a faceted search and print the result as JSON
    Search(SearchArgs),
    /// Check that the search node is reachable
    Health,
}

#[derive(Args, Default)]
struct ReindexArgs {
    /// Import profile (upsert|recreate)
    #[arg(long)]
    profile: Option<String>,

    /// Import action (create|upsert)
    #[arg(long)]
    action: Option<String>,

    /// Documents per import request
    #[arg(long)]
    batch_size: Option<usize>,

    /// Search node request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// How the collection is replaced (recreate|alias-swap)
    #[arg(long)]
    reset_mode: Option<String>,

    /// Rows per database read
    #[arg(long)]
    page_size: Option<usize>,

    /// Destination collection (the alias in alias-swap mode)
    #[arg(long)]
    collection: Option<String>,
}

impl From<ReindexArgs> for Overrides {
    fn from(args: ReindexArgs) -> Self {
        Self {
            profile: args.profile,
            action: args.action,
            batch_size: args.batch_size,
            timeout_secs: args.timeout_secs,
            reset_mode: args.reset_mode,
            page_size: args.page_size,
            collection: args.collection,
        }
    }
}

#[derive(Args)]
struct SearchArgs {
    /// Search text; `*` matches every document
    query: String,

    /// Filter expression, e.g. `isNde:=clear_nde`
    #[arg(long)]
    filter: Option<String>,

    #[arg(long, default_value = DEFAULT_SORT_BY)]
    sort_by: String,

    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,

    #[command(flatten)]
    target: CollectionArgs,
}

#[derive(Args)]
struct CollectionArgs {
    /// Collection or alias to use
    #[arg(long)]
    collection: Option<String>,
}

impl CollectionArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            collection: self.collection.clone(),
            ..Default::default()
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn reindex(args: ReindexArgs) -> Result<(), IndexingError> {
    let config = IndexerConfig::from_env(&args.into())?;
    let mut deps = Dependencies::new(&config)?;

    let report = deps.orchestrator.run().await?;

    if report.is_clean() {
        info!(
            collection = %report.load.collection,
            documents = report.load.summary.succeeded,
            "Indexing complete"
        );
    } else {
        warn!(
            collection = %report.load.collection,
            succeeded = report.load.summary.succeeded,
            failed = report.load.summary.failed,
            "Indexing complete with rejected documents"
        );
    }
    Ok(())
}

async fn search(args: SearchArgs) -> Result<(), IndexingError> {
    let config = SearchConfig::from_env(&args.target.overrides())?;
    let client = Dependencies::search_client(&config)?;

    let mut query = SearchQuery::new(args.query)
        .with_sort(args.sort_by)
        .with_page(args.page, args.per_page);
    if let Some(filter) = args.filter {
        query = query.with_filter(filter);
    }

    let response = client.search(&config.collection, &query).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn health() -> Result<(), IndexingError> {
    let config = SearchConfig::from_env(&Overrides::default())?;
    let client = Dependencies::search_client(&config)?;

    if client.health_check().await? {
        info!(url = %config.typesense.base_url(), "Search node is healthy");
        Ok(())
    } else {
        Err(SearchIndexError::connection(format!(
            "Search node at {} reported unhealthy",
            config.typesense.base_url()
        ))
        .into())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let log_format = match LogFormat::from_env() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(log_format);

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Reindex(args)) => reindex(args).await,
        None => reindex(ReindexArgs::default()).await,
        Some(Commands::Search(args)) => search(args).await,
        Some(Commands::Health) => health().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Indexer failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
