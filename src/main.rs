use booth_search::cli::Cli;
use booth_search::export::{write_listings, ExportError};
use booth_search::logging::init_logging;
use booth_search::network::{FetchError, HttpClient};
use booth_search::parser::extract_listings;
use booth_search::url_utils::SearchUrlError;
use scraper::Html;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum MainError {
    #[error("Build URL error: {0}")]
    Url(#[from] SearchUrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MainError {
    /// Process exit code, matching the table in the CLI help
    fn exit_code(&self) -> i32 {
        match self {
            MainError::Url(_) => 5,
            MainError::Fetch(_) => 4,
            MainError::Export(_) | MainError::Io(_) => 3,
        }
    }
}

/// Either read a saved page from disk or fetch the live search page
async fn load_document(cli: &Cli) -> Result<Html, MainError> {
    if let Some(path) = &cli.input {
        info!(path = %path.display(), "Reading saved search page");
        // Decoded lossily, like response bodies on the network path
        let bytes = tokio::fs::read(path).await?;
        return Ok(Html::parse_document(&String::from_utf8_lossy(&bytes)));
    }

    let url = cli.search_params().to_url()?;
    info!(url = %url, "Fetching search page");

    let http = HttpClient::new(cli.user_agent.clone(), cli.timeout)?;
    Ok(http.fetch_document(&url).await?)
}

async fn run(cli: Cli) -> Result<(), MainError> {
    let document = load_document(&cli).await?;

    let listings = extract_listings(&document);
    info!(count = listings.len(), "Writing listings");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_listings(&listings, cli.format, &mut out)?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let log_guard = match init_logging(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {}", e);
            std::process::exit(3);
        }
    };

    if let Err(e) = run(cli).await {
        error!("{}", e);
        // process::exit skips destructors; flush the file writer first
        drop(log_guard);
        std::process::exit(e.exit_code());
    }
}
