//! Select the first N artworks across pages of a live provider.
//!
//! Run with: cargo run --example select_first_n -- 30
//!
//! Reads PAGESELECT_API_URL from the environment or a .env file, defaulting to
//! the Art Institute of Chicago collection API.

use std::env;
use std::time::Duration;

use pageselect_lib::model::ARTWORK_FIELDS;
use pageselect_lib::model::PageNumber;
use pageselect_lib::source::HttpSource;
use pageselect_lib::{FetchOutcome, SessionConfig, TableSession};
use simplelog::{Config, LevelFilter, SimpleLogger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());

    let url = env::var("PAGESELECT_API_URL")
        .unwrap_or_else(|_| "https://api.artic.edu/api/v1/artworks".to_string());
    let n: usize = env::args().nth(1).map(|s| s.parse()).transpose()?.unwrap_or(30);

    let source = HttpSource::builder()
        .url(url)
        .fields(ARTWORK_FIELDS)
        .timeout(Duration::from_secs(15))
        .build()?;

    let mut session = TableSession::new(source, SessionConfig::default());
    session.navigate(PageNumber::FIRST).await;
    session.submit_bulk(n);

    println!("Selected {} rows on page 1", session.selected_count());

    loop {
        let Some((page, _)) = session.pending().iter().next() else {
            break;
        };
        match session.navigate(page).await {
            FetchOutcome::Loaded { discharged, .. } => {
                println!("Page {}: {:?}", page, discharged);
            }
            FetchOutcome::Failed { error, .. } => {
                println!("Page {} failed: {}", page, error);
                break;
            }
            FetchOutcome::Stale { .. } => {}
        }
    }

    println!("Total selected: {}", session.selected_count());
    for id in session.selected_ids() {
        println!("  {}", id);
    }

    Ok(())
}
