use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::display_title;
use recommender::{EngineConfig, RecommendQuery, RecommendationEngine, RecommendationResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// movie-recs - Hybrid Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from genre content and rating patterns", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory (movies.csv, ratings.csv)
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// JSON engine configuration; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigOverrides {
    /// Most active users kept for collaborative filtering
    #[arg(long, global = true)]
    top_users: Option<usize>,

    /// Most rated movies kept for collaborative filtering
    #[arg(long, global = true)]
    top_movies: Option<usize>,

    /// Latent factors of the rating matrix decomposition
    #[arg(long, global = true)]
    latent_factors: Option<usize>,

    /// Precompute the full content similarity matrix
    #[arg(long, global = true)]
    precompute: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Movie title (fuzzy matched, e.g. "toy story")
        title: String,

        /// Keep movies whose genres contain this text
        #[arg(long)]
        genre: Option<String>,

        /// Minimum average user rating
        #[arg(long)]
        min_rating: Option<f32>,

        /// Earliest release year (inclusive)
        #[arg(long)]
        year_min: Option<u16>,

        /// Latest release year (inclusive)
        #[arg(long)]
        year_max: Option<u16>,

        /// Number of recommendations to return
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Show the matched title, genres and scores
        #[arg(long)]
        explain: bool,
    },

    /// Print a random catalog title
    Random,

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let engine = Arc::new(
        RecommendationEngine::load_from_dir(&cli.data_dir, config)
            .context("Failed to build recommendation engine")?,
    );
    let (movies, ratings, _) = engine.catalog().counts();
    println!(
        "{} Loaded {} movies and {} ratings in {:?}",
        "✓".green(),
        movies,
        ratings,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            title,
            genre,
            min_rating,
            year_min,
            year_max,
            limit,
            explain,
        } => {
            let mut query = RecommendQuery::new(title);
            query.criteria.genre = genre;
            query.criteria.min_rating = min_rating;
            query.criteria.year_min = year_min;
            query.criteria.year_max = year_max;
            query.limit = limit;
            handle_recommend(&engine, &query, explain)?
        }
        Commands::Random => handle_random(&engine)?,
        Commands::Search { title } => handle_search(&engine, &title),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let overrides = &cli.overrides;
    if let Some(top_users) = overrides.top_users {
        config = config.with_top_users(top_users);
    }
    if let Some(top_movies) = overrides.top_movies {
        config = config.with_top_movies(top_movies);
    }
    if let Some(latent_factors) = overrides.latent_factors {
        config = config.with_latent_factors(latent_factors);
    }
    if overrides.precompute {
        config = config.with_precompute_content(true);
    }
    tracing::debug!("Engine config: {:?}", config);
    Ok(config)
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &RecommendationEngine,
    query: &RecommendQuery,
    explain: bool,
) -> Result<()> {
    if let (Some(min), Some(max)) = (query.criteria.year_min, query.criteria.year_max) {
        if min > max {
            bail!("--year-min {} is after --year-max {}", min, max);
        }
    }

    let result = engine.recommend_detailed(query);
    print_recommendations(&result, query, explain);
    Ok(())
}

/// Handle the 'random' command
fn handle_random(engine: &RecommendationEngine) -> Result<()> {
    let title = engine
        .random_title()
        .context("Catalog has no titles")?;
    println!("{}", title.bold());
    Ok(())
}

/// Handle the 'search' command
fn handle_search(engine: &RecommendationEngine, title: &str) {
    let matches = engine.catalog().search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  {}", "No movies found".yellow());
        return;
    }
    for movie in matches.iter().take(20) {
        let rating = match movie.avg_rating {
            Some(avg) => format!("avg {:.2} ({} ratings)", avg, movie.rating_count),
            None => "unrated".to_string(),
        };
        println!(
            "{}: {} [{}] {}",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            rating.dimmed()
        );
    }
    if matches.len() > 20 {
        println!("  ... and {} more", matches.len() - 20);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: Arc<RecommendationEngine>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let titles: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| engine.random_title_with(&mut rng).map(str::to_string))
            .collect()
    };
    if titles.is_empty() {
        bail!("Catalog has no titles to benchmark with");
    }

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let start = Instant::now();

    let mut handles = Vec::with_capacity(titles.len());
    for title in titles {
        let engine = Arc::clone(&engine);
        let permit = Arc::clone(&permits).acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let count = engine.recommend(&RecommendQuery::new(title)).len();
            drop(permit);
            (started.elapsed(), count)
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    let mut empty = 0usize;
    for handle in handles {
        let (elapsed, count) = handle.await?;
        if count == 0 {
            empty += 1;
        }
        timings.push(elapsed);
    }
    let wall_time = start.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Empty results: {}", empty);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_recommendations(result: &RecommendationResult, query: &RecommendQuery, explain: bool) {
    let Some(matched) = &result.matched else {
        println!(
            "{} No title closely matches '{}'",
            "✗".red(),
            query.title
        );
        return;
    };

    if explain {
        println!(
            "Matched {} (confidence {})",
            matched.title.bold(),
            matched.score
        );
    }
    println!(
        "{}",
        format!("Movies like {}:", display_title(&matched.title))
            .bold()
            .blue()
    );

    if result.recommendations.is_empty() {
        println!("  {}", "No movies pass the given filters".yellow());
        return;
    }

    for (rank, movie) in result.recommendations.iter().enumerate() {
        if explain {
            println!(
                "{}. {} [{}] - Score: {:.3}",
                (rank + 1).to_string().green(),
                movie.title,
                movie.genres.join(", "),
                movie.score
            );
        } else {
            println!("{}. {}", (rank + 1).to_string().green(), movie.title);
        }
    }
}
