use clap::{Parser, Subcommand};
use nimreg_core::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nimreg",
    version,
    about = "Student record CRUD service over SQLite",
    long_about = "nimreg exposes create/read/update/delete operations on student records\n\
        (keyed by NIM) as an HTTP/JSON API backed by a single SQLite table.\n\n\
        Quick start:\n  \
        nimreg serve\n  \
        curl localhost:3030/students"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    ///
    /// Opens (or creates) the SQLite database, ensures the students table
    /// exists, and serves the JSON API until interrupted.
    ///
    /// Examples:
    ///   nimreg serve
    ///   nimreg serve --port 8080 --db-path /var/lib/nimreg/students.db
    Serve {
        /// Bind address (default: from config, 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,

        /// TCP port (default: from config, 3030)
        #[arg(long)]
        port: Option<u16>,

        /// SQLite database file (default: from config, students.db)
        #[arg(long)]
        db_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref().map(Path::new))?;

    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            db_path,
        } => {
            let bind = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            let port = port.unwrap_or(config.server.port);
            let db_path = db_path.unwrap_or_else(|| config.storage.db_path.clone());
            nimreg_http::server::run_server(&bind, port, Path::new(&db_path), &config.storage)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
