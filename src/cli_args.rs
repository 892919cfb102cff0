use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[clap(long, env = "CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,

    /// Port to listen on, overriding the configured one.
    #[clap(long, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite database file, overriding the configured storage.
    #[clap(long, env = "DATABASE_PATH")]
    pub database_path: Option<String>,
}
