use anyhow::Result;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, OutputFormat, VectorDriver};
use crate::services::create_backend;

pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let (vector_store_connected, vector_store_points) = match create_backend(
        &config.vector_store,
        u64::from(config.embedding.dimension),
    )
    .await
    {
        Ok(store) => {
            let connected = store.health_check().await.unwrap_or(false);
            let points = if connected {
                store
                    .get_collection_info()
                    .await
                    .ok()
                    .flatten()
                    .map_or(0, |info| info.points_count)
            } else {
                0
            };
            (connected, points)
        }
        Err(_) => (false, 0),
    };

    let status = StatusInfo {
        embedding_url: config.embedding.url.clone(),
        embedding_model: config.embedding.model.clone(),
        embedding_dimension: config.embedding.dimension,
        embedding_key_present: config.embedding.api_key.is_some(),
        vector_store_driver: config.vector_store.driver.to_string(),
        vector_store_url: config.vector_store.url.clone(),
        vector_store_connected,
        vector_store_points,
        collection: config.vector_store.collection.clone(),
    };

    print!("{}", formatter.format_status(&status));

    if !vector_store_connected || !status.embedding_key_present {
        eprintln!();
        if !status.embedding_key_present {
            eprintln!(
                "Hint: no embedding API key configured. Set EMBEDDING_API_KEY or [embedding].api_key."
            );
        }
        if !vector_store_connected {
            match config.vector_store.driver {
                VectorDriver::Qdrant => {
                    eprintln!(
                        "Warning: Qdrant not reachable at {}. Start it or fix [vector_store].url.",
                        config.vector_store.url
                    );
                }
                VectorDriver::Postgres => {
                    eprintln!("Warning: PostgreSQL not accessible. Check connection settings.");
                }
            }
        }
    }

    Ok(())
}
