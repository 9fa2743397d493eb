use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use marginalia::config::ServerConfig;
use marginalia::server::dto::ProjectView;
use marginalia::server::{AppState, create_router};
use marginalia::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(about = "A line-anchored comment server for source repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and seed the default categories
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Inspect or remove registered projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Start the server
    Serve {
        /// TOML configuration file; flags given on the command line take precedence
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,

        /// Public base URL of this server (e.g., "https://comments.example.com").
        /// Embedded in project write URLs. Defaults to http://HOST:PORT.
        #[arg(long)]
        backend_base_url: Option<String>,

        /// Base URL of the comment viewer that project read URLs point at
        #[arg(long)]
        frontend_base_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List registered projects
    List {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove a project together with its repository and comments
    Remove {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        #[arg(long)]
        project_id: i64,
    },
}

fn open_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let db_path = PathBuf::from(data_dir).join("marginalia.db");
    if !db_path.exists() {
        bail!("Database not found at {}. Run 'marginalia init' first.", db_path.display());
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    Ok(store)
}

fn run_init(data_dir: String) -> anyhow::Result<()> {
    let data_path = PathBuf::from(data_dir);
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("marginalia.db");
    let existed = db_path.exists();

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    if existed {
        println!("Database already initialized at {}", db_path.display());
    } else {
        println!("Initialized database at {}", db_path.display());
    }

    Ok(())
}

fn run_projects(command: ProjectCommands) -> anyhow::Result<()> {
    match command {
        ProjectCommands::List { data_dir, json } => {
            let store = open_store(&data_dir)?;
            let projects = store
                .list_projects()?
                .iter()
                .map(ProjectView::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
                return Ok(());
            }

            if projects.is_empty() {
                println!("No projects registered.");
                return Ok(());
            }

            for project in &projects {
                println!(
                    "{:>6}  {:<24}  {:>4} comments  {}",
                    project.identifier,
                    project.label,
                    project.comments.len(),
                    project.repository.landing_page_url
                );
            }
        }
        ProjectCommands::Remove {
            data_dir,
            project_id,
        } => {
            let store = open_store(&data_dir)?;
            if !store.delete_project(project_id)? {
                bail!("Project {project_id} not found");
            }
            println!("Removed project {project_id}");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("marginalia=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir } => run_init(data_dir)?,
        Commands::Projects { command } => run_projects(command)?,
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            backend_base_url,
            frontend_base_url,
        } => {
            let mut config = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir.into();
            }
            if backend_base_url.is_some() {
                config.backend_base_url = backend_base_url;
            }
            if let Some(frontend_base_url) = frontend_base_url {
                config.frontend_base_url = frontend_base_url;
            }

            let db_path = config.db_path();
            if !db_path.exists() {
                bail!(
                    "Database not found at {}. Run 'marginalia init' first.",
                    db_path.display()
                );
            }

            let store = Arc::new(SqliteStore::new(&db_path)?);
            store.initialize()?;

            let url_bases = config.url_bases();
            info!(
                "Project URLs derive from backend {} and frontend {}",
                url_bases.backend_base_url, url_bases.frontend_base_url
            );

            let state = Arc::new(AppState::new(store.clone(), url_bases));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            store.close()?;
        }
    }

    Ok(())
}
