use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[derive(Debug)]
enum RunError {
    Config(sync::config::ConfigError),
    Api(sync::api::ApiError),
    Store(sync::store::StoreError),
    Transport(sync::transport::TransportError),
    Archive(sync::archive::ArchiveError),
    Sync(sync::run::SyncError),
    Io(std::io::Error),
}

impl From<sync::config::ConfigError> for RunError {
    fn from(value: sync::config::ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<sync::api::ApiError> for RunError {
    fn from(value: sync::api::ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<sync::store::StoreError> for RunError {
    fn from(value: sync::store::StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<sync::transport::TransportError> for RunError {
    fn from(value: sync::transport::TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<sync::archive::ArchiveError> for RunError {
    fn from(value: sync::archive::ArchiveError) -> Self {
        Self::Archive(value)
    }
}

impl From<sync::run::SyncError> for RunError {
    fn from(value: sync::run::SyncError) -> Self {
        Self::Sync(value)
    }
}

impl From<std::io::Error> for RunError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("sync")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    tracing::info!("Starting...");

    if let Err(e) = run().await {
        tracing::error!("Season sync failed: {:?}", e);
        std::process::exit(1);
    }

    tracing::info!("Complete.");
}

async fn run() -> Result<(), RunError> {
    let config = sync::config::Config::from_env()?;

    let scratch = tempfile::TempDir::with_prefix("league-stats")?;
    tracing::info!(
        "Processing files using working directory {}",
        scratch.path().display()
    );

    let replay_dir = scratch.path().join("replays");
    std::fs::create_dir_all(&replay_dir)?;

    let (db_dir, archive) = match &config.storage {
        sync::config::StorageVariant::Archived {
            stats_bucket,
            stats_folder,
        } => {
            let db_dir = scratch.path().join("database");
            std::fs::create_dir_all(&db_dir)?;

            let archive = sync::archive::StatsArchive::new(
                stats_bucket,
                config.s3_region()?,
                config.s3_credentials()?,
                stats_folder.clone(),
                config.season,
            )?;
            archive.download_current(&db_dir, scratch.path()).await?;

            (db_dir, Some(archive))
        }
        sync::config::StorageVariant::Local { db_path } => (db_path.clone(), None),
    };

    let store = sync::store::JsonFileStore::open(&db_dir)?;

    let transport: Box<dyn sync::transport::ReplayTransport> = match &config.replay_source {
        sync::config::ReplaySource::Bucket { name } => Box::new(sync::transport::S3Transport::new(
            name,
            config.s3_region()?,
            config.s3_credentials()?,
        )?),
        sync::config::ReplaySource::BaseUrl { url } => {
            Box::new(sync::transport::HttpTransport::new(url.clone()))
        }
        sync::config::ReplaySource::CacheDir { dir } => {
            Box::new(sync::transport::DirTransport::new(dir.clone()))
        }
    };

    let client = sync::api::Client::new(config.api_url.clone());
    let matches = client.reported_matches(config.season).await?;
    tracing::info!("Found {} matches", matches.len());
    let teams = client.registered_teams().await?;
    tracing::info!("Found {} teams", teams.len());

    let mut ctx = sync::run::SyncContext {
        store: Box::new(store),
        transport,
        parser: Box::new(sync::parser::CommandParser::new(
            config.parser_command.clone(),
        )),
        replay_dir,
    };

    let summary = sync::run::sync_season(&mut ctx, &matches, &teams).await?;
    tracing::info!(
        "Ingested {} replays ({} already processed, {} unparseable, {} missing)",
        summary.ingested,
        summary.already_processed,
        summary.unparseable,
        summary.missing_replays
    );

    if let Some(archive) = archive {
        archive.publish(&db_dir, scratch.path()).await?;
    }

    if let Err(e) = scratch.close() {
        tracing::warn!("Unable to clean working directory: {:?}", e);
    }

    Ok(())
}
