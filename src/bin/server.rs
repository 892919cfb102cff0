use anyhow::Context;
use clap::Parser;
use people_axum::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
    store::StorageConfig,
};

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var(
            "RUST_LOG",
            "server=trace,people_axum=trace,tower_http=trace",
        );
    }

    init_tracing()?;

    let args = CliArgs::parse();

    tracing::info!(config_file = %args.config_file, "Starting ...");

    let mut server_config = ServerConfig::from_config_file(&args.config_file).await?;

    if let Some(port) = args.port {
        server_config = server_config.with_port(port);
    }

    if let Some(path) = args.database_path {
        server_config = server_config.with_storage(StorageConfig::Sqlite { path });
    }

    Server::new(server_config).run().await?;

    Ok(())
}
