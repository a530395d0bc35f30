mod config;
mod db;
mod entities;
mod error;
mod fields;
mod loader;
mod models;
mod resolver;
mod source;
mod verify;

use clap::Parser;
use tracing::{info, warn};

use crate::{
    config::{Cli, Config},
    source::SourceTable,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelbase=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::resolve(Cli::parse());

    // validate the input before touching storage
    let table = SourceTable::open(&config.input)?;
    info!(
        input = %config.input.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "source table loaded"
    );
    if table.is_empty() {
        warn!("source table has no data rows");
    }

    let db = db::connect_and_migrate(&config.database_url).await?;

    let rows = match config.limit {
        Some(limit) => &table.rows()[..limit.min(table.len())],
        None => table.rows(),
    };

    let summary = loader::run(&db, rows, config.batch_size).await?;
    info!(
        movies = summary.movies,
        genres = summary.genres,
        actors = summary.actors,
        directors = summary.directors,
        "load complete"
    );

    if config.verify {
        match verify::movie_count(&db).await {
            Ok(total) => info!(total, "movies table verified"),
            Err(err) => warn!(error = %err, "verification query failed"),
        }
        match verify::genre_ranking(&db, 10).await {
            Ok(ranking) => {
                for entry in &ranking {
                    info!(genre = %entry.name, movies = entry.movies, "genre ranking");
                }
            },
            Err(err) => warn!(error = %err, "verification query failed"),
        }
    }

    Ok(())
}
