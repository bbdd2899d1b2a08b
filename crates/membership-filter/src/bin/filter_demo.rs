//! Command-line walkthrough of the membership filter
//!
//! Reads the filter design from `MEMBERSHIP_FILTER_EXPECTED_ITEMS` and
//! `MEMBERSHIP_FILTER_TARGET_FPR`; log verbosity follows `RUST_LOG`.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use membership_filter::{FileFilterStore, FilterConfig, FilterStore, MembershipFilter};

const FRUITS: [&str; 5] = ["apple", "banana", "cherry", "date", "elderberry"];
const QUERIES: [&str; 5] = ["apple", "banana", "orange", "grape", "cherry"];

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = FilterConfig::from_env();
    config.validate().context("invalid filter configuration")?;

    let fruit_filter = small_filter_demo(&config)?;
    large_filter_demo()?;
    persistence_demo(&fruit_filter)?;

    Ok(())
}

fn small_filter_demo(config: &FilterConfig) -> Result<MembershipFilter> {
    let mut filter = MembershipFilter::from_config(config)?;
    info!(
        expected_items = config.expected_items,
        target_fpr = config.target_false_positive_rate,
        "Created filter"
    );

    for fruit in FRUITS {
        filter.add(fruit.as_bytes());
    }

    for fruit in QUERIES {
        let status = if filter.might_contain(fruit.as_bytes()) {
            "probably present"
        } else {
            "definitely absent"
        };
        println!("{:<12} {}", fruit, status);
    }

    let stats = serde_json::to_string_pretty(&filter.stats())?;
    println!("{}", stats);
    Ok(filter)
}

fn large_filter_demo() -> Result<()> {
    let mut filter = MembershipFilter::new(100_000, 0.001)?;

    let start = Instant::now();
    for i in 0..50_000 {
        filter.add(format!("user_{}", i).as_bytes());
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "Added 50,000 items");

    // Half the queries fall in the added range, half outside it
    let start = Instant::now();
    let found = (0..10_000u64)
        .map(|i| (i * 7_919) % 100_000)
        .filter(|id| filter.might_contain(format!("user_{}", id).as_bytes()))
        .count();
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        found,
        "Looked up 10,000 items"
    );

    let stats = filter.stats();
    println!(
        "large filter: {} bits, {} hashes, fill {:.2}%, estimated FPR {:.4}%",
        stats.bit_count,
        stats.hash_count,
        stats.fill_ratio * 100.0,
        stats.estimated_false_positive_rate * 100.0
    );
    Ok(())
}

fn persistence_demo(filter: &MembershipFilter) -> Result<()> {
    let path = std::env::temp_dir().join(format!("membership-filter-demo-{}.bf", std::process::id()));
    let store = FileFilterStore::new(&path);

    store
        .save(filter)
        .with_context(|| format!("saving filter to {}", path.display()))?;
    let restored = store
        .load()
        .with_context(|| format!("loading filter from {}", path.display()))?;

    let agree = QUERIES
        .iter()
        .all(|fruit| restored.might_contain(fruit.as_bytes()) == filter.might_contain(fruit.as_bytes()));
    println!("restored filter agrees with original: {}", agree);

    std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
    Ok(())
}
