//! CLI entry point for quill

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill::store::PgPostStore;
use quill::Blog;

#[derive(Parser)]
#[command(name = "quill")]
#[command(author = "Taylor Jones")]
#[command(version)]
#[command(about = "A small server-rendered personal blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        #[arg(short, long)]
        title: String,

        /// One-line tagline
        #[arg(long, default_value = "")]
        tagline: String,

        /// Markdown file to use as the body
        #[arg(short, long)]
        body_file: Option<PathBuf>,

        /// Publish immediately
        #[arg(long)]
        published: bool,
    },

    /// List published posts
    List,

    /// Apply database migrations
    Migrate,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quill=debug,tower_http=debug,info"
    } else {
        "quill=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let blog = Blog::new(&base_dir)?;
            let store = connect_or_exit(&blog).await;
            quill::server::start(&blog, Arc::new(store), &ip, port).await?;
        }

        Commands::New {
            title,
            tagline,
            body_file,
            published,
        } => {
            let blog = Blog::new(&base_dir)?;
            let store = connect_or_exit(&blog).await;
            tracing::info!("Creating new post with title: {}", title);
            quill::commands::new::run(&store, &title, &tagline, body_file.as_deref(), published)
                .await?;
        }

        Commands::List => {
            let blog = Blog::new(&base_dir)?;
            let store = connect_or_exit(&blog).await;
            quill::commands::list::run(&store).await?;
        }

        Commands::Migrate => {
            let blog = Blog::new(&base_dir)?;
            let store =
                PgPostStore::connect(&blog.config.database_url, blog.config.max_connections)
                    .await?;
            store.migrate().await?;
            println!("Migrated successfully!");
        }

        Commands::Version => {
            println!("quill version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Startup cannot proceed without the database
async fn connect_or_exit(blog: &Blog) -> PgPostStore {
    match blog.connect().await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
