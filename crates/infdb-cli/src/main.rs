mod commands;
mod render;

use clap::{Parser, Subcommand};
use infdb_core::{AudienceSize, Platform};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "infdb")]
#[command(about = "Influencer database lead funnel")]
struct Cli {
    /// Print view models as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a search and show the result preview
    Search {
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        size: Option<AudienceSize>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Minimum average views per post
        #[arg(long)]
        min_views: Option<u32>,
        /// Minimum engagement rate in percent
        #[arg(long)]
        min_er: Option<f64>,
        /// Request the free trial for the resulting search
        #[arg(long)]
        trial_email: Option<String>,
    },
    /// List the locations the backend allows for a platform
    Locations {
        #[arg(long)]
        platform: Platform,
    },
    /// Request the free trial package for a search or offer
    Trial {
        #[arg(long)]
        offer_id: i64,
        #[arg(long)]
        email: String,
    },
    /// Show a stored offer with its packages
    Offer {
        id: i64,
        /// Request the free trial for this offer, then show it again
        #[arg(long)]
        trial_email: Option<String>,
    },
    /// Show the package catalog and a custom quote
    Pricing {
        /// Number of matching influencers in the search
        #[arg(long, default_value = "0")]
        total: u64,
        /// Requested custom package size
        #[arg(long, default_value = "600")]
        records: u32,
    },
    /// Show filter options, defaults and category suggestions
    Options {
        /// Text typed into the category field
        #[arg(long)]
        category: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = infdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.command {
        Some(Commands::Search {
            platform,
            size,
            location,
            category,
            min_views,
            min_er,
            trial_email,
        }) => {
            let args = commands::SearchArgs {
                platform,
                size,
                location,
                category,
                min_views,
                min_er,
                trial_email,
            };
            commands::run_search(&config, args, json).await?;
        }
        Some(Commands::Locations { platform }) => {
            commands::run_locations(&config, platform, json).await?;
        }
        Some(Commands::Trial { offer_id, email }) => {
            commands::run_trial(&config, offer_id, &email, json).await?;
        }
        Some(Commands::Offer { id, trial_email }) => {
            commands::run_offer(&config, id, trial_email.as_deref(), json).await?;
        }
        Some(Commands::Pricing { total, records }) => {
            commands::run_pricing(total, records, json)?;
        }
        Some(Commands::Options { category }) => {
            commands::run_options(&config, category, json)?;
        }
        None => println!("infdb ready; run `infdb --help` for commands"),
    }

    Ok(())
}
