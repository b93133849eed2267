//! Recipe Finder - search TheMealDB from the terminal
//!
//! Recipes and thumbnails are cached locally, so anything viewed once is
//! available again without a network connection.

use clap::{Args as ClapArgs, Parser, Subcommand};
use recipe_finder::{
    filter, FinderConfig, MealDbClient, ProteinFilter, RecipeFinder, RecipeList, RecipeRecord,
    SourceError, ThumbnailSize,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Search recipes by ingredient, with a local recipe and image cache
#[derive(Parser, Debug)]
#[command(name = "recipe_finder")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory for cached recipes and thumbnails
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// TheMealDB API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Timeout in seconds for API calls
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct FilterArgs {
    /// Only chicken recipes
    #[arg(long)]
    chicken: bool,
    /// Only beef recipes
    #[arg(long)]
    beef: bool,
    /// Only seafood recipes
    #[arg(long)]
    seafood: bool,
}

impl From<&FilterArgs> for ProteinFilter {
    fn from(args: &FilterArgs) -> Self {
        ProteinFilter {
            chicken: args.chicken,
            beef: args.beef,
            seafood: args.seafood,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search recipes by main ingredient
    Search {
        ingredient: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Three chicken, three beef and three salmon recipes
    ViewAll {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a surprise recipe
    Random,
    /// Show one recipe in full
    Show { id: String },
    /// Save a recipe thumbnail scaled to the given size
    Thumbnail {
        id: String,
        #[arg(long, default_value_t = 150)]
        width: u32,
        #[arg(long, default_value_t = 150)]
        height: u32,
        /// Output file; the format follows the extension
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn print_list(list: &RecipeList) {
    for recipe in list {
        println!("{:>6}  {}  ({}, {})", recipe.id, recipe.name, recipe.category, recipe.region);
    }
}

fn print_detail(recipe: &RecipeRecord) {
    println!("{}", recipe.name);
    println!("Category: {}   Cuisine: {}", recipe.category, recipe.region);
    println!();
    println!("Ingredients:");
    for line in &recipe.ingredients {
        println!("  - {}", line);
    }
    println!();
    println!("Instructions:");
    println!("{}", recipe.instructions);
}

fn user_message(err: &SourceError) -> String {
    if err.is_unavailable() {
        "Could not connect to recipe database. Check your internet connection.".to_string()
    } else {
        err.to_string()
    }
}

fn show_filtered(list: RecipeList, filter_args: &FilterArgs, empty_message: String) {
    let filtered = filter(&list, &ProteinFilter::from(filter_args));
    if list.is_empty() {
        println!("{}", empty_message);
    } else if filtered.is_empty() {
        println!("No matches for that filter");
    } else {
        print_list(&filtered);
        println!("Found {} recipes", filtered.len());
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut config = FinderConfig::default();
    if let Some(dir) = args.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    config.request_timeout = Duration::from_secs(args.timeout_secs);
    log::info!("Cache directory: {}", config.cache_dir.display());

    let client = MealDbClient::from_config(&config).map_err(|e| e.to_string())?;
    let finder = RecipeFinder::new(client, config);

    match args.command {
        Command::Search { ingredient, filter } => {
            let list = finder.search(&ingredient).map_err(|e| user_message(&e))?;
            show_filtered(list, &filter, format!("No recipes found for '{}'", ingredient));
        }
        Command::ViewAll { filter } => {
            let list = finder.view_all().map_err(|e| user_message(&e))?;
            show_filtered(list, &filter, "No recipes found".to_string());
        }
        Command::Random => {
            let recipe = finder
                .random()
                .map_err(|e| format!("Could not fetch random recipe: {}", user_message(&e)))?;
            print_detail(&recipe);
        }
        Command::Show { id } => {
            let recipe = finder.load_recipe(&id).map_err(|e| user_message(&e))?;
            print_detail(&recipe);
        }
        Command::Thumbnail {
            id,
            width,
            height,
            out,
        } => {
            let recipe = finder.load_recipe(&id).map_err(|e| user_message(&e))?;
            let image = finder
                .thumbnail(&recipe, ThumbnailSize::Custom(width, height))
                .ok_or_else(|| format!("No image available for {}", recipe.name))?;
            image
                .save(&out)
                .map_err(|e| format!("Failed to save {}: {}", out.display(), e))?;
            println!("Saved {}x{} thumbnail to {}", width, height, out.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=warn, RUST_LOG=recipe_finder=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting Recipe Finder");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Application error: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
