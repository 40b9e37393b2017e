//! CLI entry point for polypress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polypress::commands::list::ListOptions;
use polypress::commands::new::NewOptions;

#[derive(Parser)]
#[command(name = "polypress")]
#[command(version)]
#[command(about = "A multilingual blog content engine", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Title of the new post
        title: String,

        /// Locale to write in (defaults to the default locale)
        #[arg(long)]
        locale: Option<String>,

        /// Category title for posts
        #[arg(long)]
        category: Option<String>,

        /// Layout to use (post, page)
        #[arg(short, long, default_value = "post")]
        layout: String,
    },

    /// Generate the data tree
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, page, category, tag, route)
        #[arg(default_value = "post")]
        r#type: String,

        /// Locale to list (defaults to the default locale)
        #[arg(long)]
        locale: Option<String>,

        /// Page of posts to show
        #[arg(long)]
        page: Option<String>,

        /// Posts per page
        #[arg(long)]
        size: Option<usize>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "polypress=debug,info"
    } else {
        "polypress=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            polypress::commands::init::init_site(&target_dir)?;
            println!("Initialized empty site in {:?}", target_dir);
        }

        Commands::New {
            title,
            locale,
            category,
            layout,
        } => {
            let site = polypress::Polypress::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            let options = NewOptions {
                locale,
                category,
                layout: Some(layout),
            };
            let path = polypress::commands::new::create(&site, &title, &options)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate => {
            let site = polypress::Polypress::new(&base_dir)?;
            tracing::info!("Generating data files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let site = polypress::Polypress::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            locale,
            page,
            size,
        } => {
            let site = polypress::Polypress::new(&base_dir)?;
            let options = ListOptions {
                locale,
                page: Some(polypress::aggregate::parse_page_param(page.as_deref())),
                size,
            };
            polypress::commands::list::run(&site, &r#type, &options)?;
        }

        Commands::Version => {
            println!("polypress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
