pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cookshare")]
#[command(about = "CookShare - share, browse, and discover recipes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Load sample recipes from a YAML file into an empty database
    Seed {
        /// Seed file path
        file: PathBuf,
    },

    /// Browse recipes on a running server
    Search {
        /// Text to find in titles, descriptions, and ingredient names
        query: Option<String>,

        /// Exact cuisine
        #[arg(long)]
        cuisine: Option<String>,

        /// Comma-separated tags (any of)
        #[arg(long)]
        tags: Option<String>,

        /// Easy, Medium, or Hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Maximum prep + cook time in minutes
        #[arg(long)]
        max_time: Option<i64>,

        /// latest, popular, or trending
        #[arg(long)]
        sort: Option<String>,

        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Suggest recipes for the ingredients you have
    Suggest {
        /// Ingredient names
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
}
