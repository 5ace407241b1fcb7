//! Benchmark for the analytics computation cycle.
//! Run with: cargo bench

#![allow(unused)]

use chrono::{Duration, Utc};
use marketpulse_analytics::{AnalyticsEngine, RankKey};
use marketpulse_core::catalog::{MarketplaceCatalog, OfferTypeLabels, ProductCatalog};
use marketpulse_core::config::EngineConfig;
use marketpulse_core::offer::{Offer, OfferKind, OfferScope};

fn create_test_offers(count: usize) -> Vec<Offer> {
    let now = Utc::now();
    (0..count)
        .map(|i| Offer {
            id: format!("offer-{i:04}"),
            name: format!("Benchmark Offer {i}"),
            kind: OfferKind::PercentDiscount {
                percent: 5.0 + (i % 30) as f64,
            },
            scope: OfferScope::Marketplace,
            start_date: now - Duration::days(30),
            end_date: now + Duration::days(30),
            marketplaces: vec!["amazon_us".to_string(), "ebay".to_string()],
            product_ids: vec![format!("prod-{i}")],
            is_active: true,
        })
        .collect()
}

fn main() {
    let engine = AnalyticsEngine::new(
        MarketplaceCatalog::reference(),
        ProductCatalog::default(),
        OfferTypeLabels::default(),
        &EngineConfig::default(),
    );
    let offers = create_test_offers(200);
    let now = Utc::now();

    // Warmup
    for _ in 0..10 {
        let analytics = engine.offer_analytics(&offers, now);
        let summary = engine.summary(&offers, &analytics, &[], now);
        let _ = engine.alerts(&offers, &analytics, &summary, &[], now);
    }

    // Benchmark
    let iterations = 1_000;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        let analytics = engine.offer_analytics(&offers, now);
        let summary = engine.summary(&offers, &analytics, &[], now);
        let alerts = engine.alerts(&offers, &analytics, &summary, &[], now);
        let _ = engine.chart_ranking(&offers, &analytics, &[], RankKey::Revenue, now);
        std::hint::black_box(alerts);
    }

    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!("=== Analytics Cycle Benchmark ===");
    println!("Offers:      {}", offers.len());
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per cycle:   {:?}", per_iter);
    println!(
        "Throughput:  {:.0} cycles/sec",
        iterations as f64 / elapsed.as_secs_f64()
    );
}
