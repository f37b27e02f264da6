use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;
use foodfinder::config::Config;
use foodfinder::logging;
use foodfinder::provider::http::HttpSearchProvider;
use foodfinder::provider::location::StaticLocationProvider;
use foodfinder::provider::LocationProvider;
use foodfinder::ranking::{self, Candidate, FilterCriteria, PriceBucket, SortKey, UserLocation};
use foodfinder::service::{ResultPage, SearchSession};

#[derive(Parser)]
#[command(name = "foodfinder", version, about = "Ranked eatery search for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the search service and print a ranked page of eateries
    Search {
        /// Free-text query, e.g. "lẩu bò quận 7"
        query: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rank candidates from a JSON file or stdin instead of the live service
    Rank {
        /// Path to a JSON array of candidates, or - for stdin
        #[arg(long)]
        input: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Category filter, exact label; omit for all
    #[arg(long)]
    category: Option<String>,

    /// Price bucket: all, under-50k, 50k-100k, 100k-200k, 200k-500k, over-500k
    #[arg(long)]
    price: Option<String>,

    /// Minimum average rating; 0 disables
    #[arg(long)]
    min_rating: Option<f64>,

    /// District, e.g. "Quận 7" or "Bình Thạnh"; omit for all
    #[arg(long)]
    district: Option<String>,

    /// Sort key: hybrid, semantic, tfidf, rating, distance, name
    #[arg(long)]
    sort: Option<String>,

    /// Maximum distance in km; only effective with a location
    #[arg(long)]
    max_km: Option<f64>,
}

#[derive(Args)]
struct PositionArgs {
    /// Use the coordinates from the config file as the user location
    #[arg(long)]
    near: bool,

    /// Latitude in decimal degrees; overrides the config coordinates
    #[arg(long, requires = "lon")]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat")]
    lon: Option<f64>,
}

#[derive(Args)]
struct OutputArgs {
    /// Page number, 1-based
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Results per page; defaults to the configured page size
    #[arg(long)]
    page_size: Option<usize>,

    /// Emit the page as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// Build filter criteria from CLI flags.
///
/// Unknown sort keys and price buckets warn and fall back instead of
/// failing the command. A resolved location flips the defaults toward
/// distance: nearest-first sort and the configured radius cap, unless
/// the user chose otherwise.
fn build_criteria(filters: &FilterArgs, has_location: bool, default_radius_km: f64) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();
    if let Some(category) = &filters.category {
        criteria = criteria.with_category(category.clone());
    }
    if let Some(price) = &filters.price {
        criteria = criteria.with_price_bucket(PriceBucket::parse_lenient(price));
    }
    if let Some(min_rating) = filters.min_rating {
        criteria = criteria.with_min_rating(min_rating);
    }
    if let Some(district) = &filters.district {
        criteria = criteria.with_district(district.clone());
    }
    if let Some(sort) = &filters.sort {
        criteria = criteria.with_sort(SortKey::parse_lenient(sort));
    } else if has_location {
        criteria = criteria.with_sort(SortKey::Distance);
    }
    if let Some(max_km) = filters.max_km {
        criteria = criteria.with_max_distance_km(max_km);
    } else if has_location {
        criteria = criteria.with_max_distance_km(default_radius_km);
    }
    criteria
}

/// Resolve the user location from flags, falling back to the config.
///
/// Every geolocation failure class degrades the same way: warn and
/// continue without a location.
async fn resolve_location(position: &PositionArgs, config: &Config) -> Option<UserLocation> {
    if !position.near && position.lat.is_none() {
        return None;
    }
    let provider = if position.lat.is_some() {
        StaticLocationProvider::new(position.lat, position.lon)
    } else {
        StaticLocationProvider::new(config.location.lat, config.location.lon)
    };
    match provider.current_location().await {
        Ok(location) => {
            tracing::info!(lat = location.lat, lon = location.lon, "Location resolved");
            Some(location)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not resolve a location, continuing without one");
            None
        }
    }
}

/// Read candidates from a JSON file or stdin ("-").
///
/// Accepts either a bare array or the search API envelope with a data
/// array. Elements that do not decode are skipped, matching how the
/// live provider treats them.
fn read_candidates(input: &str) -> Result<Vec<Candidate>> {
    let text = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)?
    };

    let value: serde_json::Value = serde_json::from_str(&text)?;
    let elements = match value {
        serde_json::Value::Array(elements) => elements,
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(elements)) => elements,
            _ => anyhow::bail!("expected a JSON array of candidates or an envelope with a data array"),
        },
        _ => anyhow::bail!("expected a JSON array of candidates"),
    };

    let total = elements.len();
    let mut candidates = Vec::with_capacity(total);
    for element in elements {
        match serde_json::from_value::<Candidate>(element) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => tracing::debug!(error = %e, "Skipping unusable candidate"),
        }
    }
    if candidates.len() < total {
        tracing::warn!(
            kept = candidates.len(),
            total = total,
            "Some candidates in the input were skipped"
        );
    }
    Ok(candidates)
}

/// Render one page to stdout, human-readable or JSON.
fn print_page(page: &ResultPage, page_size: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        println!("No results (page {} of {}).", page.page, page.total_pages);
        return Ok(());
    }

    for (i, item) in page.items.iter().enumerate() {
        let number = page.page.saturating_sub(1) * page_size + i + 1;
        let c = &item.candidate;
        let mut line = format!("{:>3}. {}", number, c.name);
        if let Some(category) = c.category.as_deref() {
            line.push_str(&format!("  [{}]", category));
        }
        if let Some(rating) = c.avg_rating {
            line.push_str(&format!("  {:.1}★", rating));
        }
        if let Some(price) = c.price_range.as_deref() {
            line.push_str(&format!("  {}", price));
        }
        if let Some(distance) = item.distance_km {
            line.push_str(&format!("  {:.2} km", distance));
        }
        line.push_str(&format!("  (score {:.3})", item.hybrid_score));
        println!("{}", line);
        if !c.address.is_empty() {
            println!("     {}", c.address);
        }
    }
    println!(
        "Page {} of {} ({} results)",
        page.page, page.total_pages, page.total_results
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args
    let cli = Cli::parse();

    // 2. Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Config error (using defaults): {}", e);
        Config::default()
    });

    // 3. Initialize logging FIRST (before any other output)
    // Logging goes to stderr only; stdout is reserved for results
    logging::init_logging(&config);

    // 4. Handle subcommands
    match cli.command {
        Commands::Search {
            query,
            filters,
            position,
            output,
        } => {
            let provider = HttpSearchProvider::new(&config.search)?;
            let session = SearchSession::new(Arc::new(provider));
            let fetched = session.search(&query).await?;
            tracing::info!(query = %query, fetched = fetched, "Search completed");

            let location = resolve_location(&position, &config).await;
            let criteria =
                build_criteria(&filters, location.is_some(), config.location.default_radius_km);
            let page_size = output.page_size.unwrap_or(config.search.page_size);
            let page = session
                .page(&criteria, location, output.page, page_size)
                .await;
            print_page(&page, page_size, output.json)?;
        }

        Commands::Rank {
            input,
            filters,
            position,
            output,
        } => {
            let candidates = read_candidates(&input)?;
            tracing::info!(candidates = candidates.len(), "Loaded candidates for ranking");

            let location = resolve_location(&position, &config).await;
            let criteria =
                build_criteria(&filters, location.is_some(), config.location.default_radius_km);
            let ranked = ranking::rank(&candidates, &criteria, location);
            let total_results = ranked.len();

            let page_size = output.page_size.unwrap_or(config.search.page_size);
            let slice = ranking::paginate(&ranked, output.page, page_size);
            let page = ResultPage {
                items: slice.items.to_vec(),
                page: output.page,
                total_pages: slice.total_pages,
                total_results,
            };
            print_page(&page, page_size, output.json)?;
        }
    }

    Ok(())
}
