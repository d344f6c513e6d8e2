use clap::Parser;
use heritage_mashup::config::cli::CliConfig;
use heritage_mashup::utils::{logger, validation::Validate};
use heritage_mashup::{AdvancedMashup, SparqlMetadataStore, SqliteProcessStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    let config = cli.resolve()?;
    config.validate()?;

    let mut mashup = AdvancedMashup::new();

    for (i, endpoint) in config.metadata_endpoints.iter().enumerate() {
        let store = SparqlMetadataStore::new(endpoint)?;
        if i == 0 {
            if let Some(csv) = &config.metadata_csv {
                let count = store.ingest_csv(csv).await?;
                tracing::info!("Pushed {} metadata records to {}", count, endpoint);
            }
        }
        mashup.add_metadata_source(Arc::new(store));
    }

    for (i, path) in config.process_dbs.iter().enumerate() {
        let store = SqliteProcessStore::open(path)?;
        if i == 0 {
            if let Some(json) = &config.process_json {
                let count = store.ingest_json(json)?;
                tracing::info!("Pushed {} activity records to {}", count, path);
            }
        }
        mashup.add_process_source(Arc::new(store));
    }

    tracing::info!(
        "Registered {} metadata and {} process sources",
        mashup.metadata_source_count(),
        mashup.process_source_count()
    );

    let people = mashup.all_people().await?;
    let objects = mashup.all_objects().await?;
    let activities = mashup.all_activities().await?;

    println!("People: {}", people.len());
    println!("Cultural heritage objects: {}", objects.len());
    println!("Activities: {}", activities.len());

    Ok(())
}
