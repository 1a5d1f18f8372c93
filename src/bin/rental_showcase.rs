use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::time::Instant;

use rental_olap::engine::core::aggregate::{AggregateRef, GroupingSetSpec};
use rental_olap::engine::core::filter::{Operand, Predicate};
use rental_olap::engine::core::result::{OrderKey, OrderSpec, ResultSet};
use rental_olap::engine::query::{AggregateRequest, AggregationEngine, EngineOptions, QueryContext};
use rental_olap::engine::source::{CustomerDim, FactRow, JoinMode, MovieDim, RentalSource};
use rental_olap::shared::datetime::DateGranularity;

const COUNTRIES: &[&str] = &["Spain", "Germany", "France", "Italy", "Netherlands", "Poland"];
const GENRES: &[&str] = &[
    "Drama",
    "Comedy",
    "Action & Adventure",
    "Animation",
    "Sci-Fi & Fantasy",
    "Documentary",
];
const GENDERS: &[&str] = &["female", "male"];
// Renting prices in cents
const PRICES: &[u32] = &[159, 179, 199, 229, 259, 299, 319, 349];

#[derive(Parser)]
#[command(name = "rental-showcase")]
#[command(about = "Runs the movie-rental OLAP reports over synthetic data", long_about = None)]
struct Args {
    /// Number of rental facts to generate
    #[arg(short, long, default_value = "5000")]
    rentals: usize,

    /// Number of customers
    #[arg(long, default_value = "400")]
    customers: u64,

    /// Number of movies
    #[arg(long, default_value = "120")]
    movies: u64,

    /// RNG seed; runs with the same seed produce identical reports
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Report to run
    #[arg(long, value_enum, default_value = "all")]
    report: Report,

    /// Fraction of rentals pointing at an unknown movie (forces a left join)
    #[arg(long, default_value = "0.0")]
    orphan_rate: f64,

    /// Worker threads for partitioned aggregation; 0 keeps the configured value
    #[arg(short, long, default_value = "0")]
    workers: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Report {
    All,
    Country,
    Cube,
    Monthly,
    Deciles,
}

struct Dataset {
    customers: Vec<CustomerDim>,
    movies: Vec<MovieDim>,
    facts: Vec<FactRow>,
}

fn main() -> Result<()> {
    rental_olap::logging::init()?;
    let args = Args::parse();

    let started = Instant::now();
    let data = generate(&args);
    let join_mode = if args.orphan_rate > 0.0 {
        JoinMode::Left
    } else {
        JoinMode::Strict
    };
    let source = RentalSource::new(data.customers, data.movies, join_mode);
    let rows = source
        .load(&data.facts)
        .context("failed to denormalize generated rentals")?;
    eprintln!(
        "Generated {} rentals ({:?} join) in {:.1} ms",
        rows.len(),
        join_mode,
        started.elapsed().as_secs_f64() * 1000.0
    );

    let mut options = EngineOptions::from_app_config();
    if args.workers > 0 {
        options = options.with_worker_threads(args.workers);
    }
    let engine = AggregationEngine::new(options);
    let ctx = QueryContext::new();

    let mut reports = serde_json::Map::new();
    for (name, request) in requests(args.report) {
        let started = Instant::now();
        let result = engine
            .execute(source.schema(), &request, &rows, &ctx)
            .with_context(|| format!("report {name} failed"))?;
        eprintln!(
            "{name}: {} groups in {:.1} ms",
            result.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        reports.insert(name.to_string(), render(&result));
    }

    let output = serde_json::Value::Object(reports);
    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn requests(report: Report) -> Vec<(&'static str, AggregateRequest)> {
    let mut out = Vec::new();
    if matches!(report, Report::All | Report::Country) {
        // Average rating per country and genre with subtotals
        out.push((
            "country_genre_rollup",
            AggregateRequest::new(GroupingSetSpec::rollup(&["country", "genre"]))
                .measure("rating")
                .measure("price")
                .order_by(OrderSpec::asc("country"))
                .order_by(OrderSpec::desc(AggregateRef::avg("rating"))),
        ));
    }
    if matches!(report, Report::All | Report::Cube) {
        out.push((
            "country_genre_cube",
            AggregateRequest::new(GroupingSetSpec::cube(&["country", "genre"]))
                .measure("price")
                .count_distinct("customer_id"),
        ));
    }
    if matches!(report, Report::All | Report::Monthly) {
        out.push((
            "monthly_revenue",
            AggregateRequest::new(GroupingSetSpec::rollup(&["rental_month", "price_tier"]))
                .date_bucket("rental_month", "rental_date", DateGranularity::Month)
                .measure("price")
                .count_distinct("customer_id"),
        ));
    }
    if matches!(report, Report::All | Report::Deciles) {
        // Customer segmentation by spend, regulars only
        out.push((
            "customer_spend_deciles",
            AggregateRequest::new(GroupingSetSpec::group_by(&["customer_id"]))
                .measure("price")
                .having(Predicate::and(vec![
                    Operand::count().gte(5),
                    Operand::aggregate(AggregateRef::sum("price")).is_not_null(),
                ]))
                .rank_by(AggregateRef::sum("price"), 10)
                .order_by(OrderSpec::asc(OrderKey::Bucket))
                .order_by(OrderSpec::desc(AggregateRef::sum("price"))),
        ));
    }
    out
}

fn render(result: &ResultSet) -> serde_json::Value {
    json!({
        "dimensions": result.dimensions,
        "grouping_sets": result.grouping_sets,
        "rows_aggregated": result.rows_aggregated,
        "rows": result.to_json(),
    })
}

fn generate(args: &Args) -> Dataset {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    let customers = (1..=args.customers)
        .map(|customer_id| CustomerDim {
            customer_id,
            country: pick_optional(&mut rng, COUNTRIES, 0.03),
            gender: pick_optional(&mut rng, GENDERS, 0.05),
            date_of_birth: rng
                .gen_bool(0.9)
                .then(|| epoch - Duration::days(rng.gen_range(18 * 365..75 * 365))),
        })
        .collect();

    let movies = (1..=args.movies)
        .map(|movie_id| MovieDim {
            movie_id,
            genre: pick_optional(&mut rng, GENRES, 0.02),
            year_of_release: rng.gen_bool(0.95).then(|| rng.gen_range(1970..2024)),
            renting_price: f64::from(PRICES[rng.gen_range(0..PRICES.len())]) / 100.0,
        })
        .collect();

    let orphan_rate = args.orphan_rate.clamp(0.0, 1.0);
    let facts = (1..=args.rentals as u64)
        .map(|rental_id| FactRow {
            rental_id,
            customer_id: rng.gen_range(1..=args.customers.max(1)),
            movie_id: if orphan_rate > 0.0 && rng.gen_bool(orphan_rate) {
                args.movies + 1
            } else {
                rng.gen_range(1..=args.movies.max(1))
            },
            rating: rng.gen_bool(0.6).then(|| rng.gen_range(1..=10)),
            rental_date: epoch + Duration::days(rng.gen_range(0..365)),
        })
        .collect();

    Dataset {
        customers,
        movies,
        facts,
    }
}

fn pick_optional(rng: &mut StdRng, values: &[&str], null_rate: f64) -> Option<String> {
    if rng.gen_bool(null_rate) {
        None
    } else {
        Some(values[rng.gen_range(0..values.len())].to_string())
    }
}
