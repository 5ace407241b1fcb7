//! Integration test for the full analytics computation cycle: offer snapshot
//! in, analytics + summary + alerts + rankings out.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use marketpulse_analytics::{AnalyticsEngine, RankKey};
    use marketpulse_core::catalog::{MarketplaceCatalog, OfferTypeLabels, ProductCatalog};
    use marketpulse_core::config::EngineConfig;
    use marketpulse_core::offer::{Offer, OfferKind, OfferScope};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(
            MarketplaceCatalog::reference(),
            ProductCatalog::default(),
            OfferTypeLabels::default(),
            &EngineConfig::default(),
        )
    }

    /// A small snapshot spanning lifecycle states and offer kinds.
    fn sample_offers() -> Vec<Offer> {
        let now = fixed_now();
        vec![
            Offer {
                id: "offer-100".to_string(),
                name: "Summer Electronics Sale".to_string(),
                kind: OfferKind::PercentDiscount { percent: 20.0 },
                scope: OfferScope::Marketplace,
                start_date: now - Duration::days(20),
                end_date: now + Duration::days(25),
                marketplaces: vec!["amazon_us".to_string(), "ebay".to_string()],
                product_ids: vec!["prod-1".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-200".to_string(),
                name: "Flash Weekend BOGO".to_string(),
                kind: OfferKind::BogoFree {
                    buy_qty: 1,
                    get_qty: 1,
                },
                scope: OfferScope::Product,
                start_date: now - Duration::days(12),
                end_date: now + Duration::days(4),
                marketplaces: vec!["walmart".to_string()],
                product_ids: vec!["prod-2".to_string(), "prod-3".to_string()],
                is_active: true,
            },
            Offer {
                id: "offer-300".to_string(),
                name: "Expired Clearance".to_string(),
                kind: OfferKind::FixedDiscount { amount: 10.0 },
                scope: OfferScope::Product,
                start_date: now - Duration::days(90),
                end_date: now - Duration::days(10),
                marketplaces: vec!["etsy".to_string()],
                product_ids: vec![],
                is_active: true,
            },
        ]
    }

    #[test]
    fn test_full_cycle_consistency() {
        let engine = engine();
        let offers = sample_offers();
        let now = fixed_now();

        let analytics = engine.offer_analytics(&offers, now);
        assert_eq!(analytics.len(), offers.len());
        for a in &analytics {
            assert!(a.clicks <= a.impressions);
            assert!(a.conversions <= a.clicks);
        }

        let summary = engine.summary(&offers, &analytics, &[], now);
        // offer-300 is expired: two active of three.
        assert_eq!(summary.total_offers, 3);
        assert_eq!(summary.active_offers, 2);

        let alerts = engine.alerts(&offers, &analytics, &summary, &[], now);
        for pair in alerts.windows(2) {
            assert!(pair[0].severity.priority() <= pair[1].severity.priority());
        }

        let chart = engine.chart_ranking(&offers, &analytics, &[], RankKey::Revenue, now);
        // Expired offers never chart.
        assert!(chart.iter().all(|e| !e.name.starts_with("Expired")));

        let rollup = engine.marketplace_rollup(&offers[0], 0);
        assert_eq!(rollup.len(), 10);

        let products = engine.product_rollup(&offers[1], 1);
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_cycle_survives_snapshot_mutation() {
        let engine = engine();
        let mut offers = sample_offers();
        let now = fixed_now();

        let before = engine.offer_analytics(&offers, now);

        // Simulate the CRUD collaborator deleting an offer; the engine is
        // simply re-invoked with the fresh snapshot.
        offers.remove(1);
        let after = engine.offer_analytics(&offers, now);
        assert_eq!(after.len(), 2);

        // Surviving offers at unchanged positions keep identical numbers.
        assert_eq!(before[0].impressions, after[0].impressions);
        assert_eq!(before[0].revenue, after[0].revenue);

        let summary = engine.summary(&offers, &after, &[], now);
        assert_eq!(summary.total_offers, 2);
    }

    #[test]
    fn test_serialized_payload_round_trip() {
        let engine = engine();
        let offers = sample_offers();
        let now = fixed_now();

        let analytics = engine.offer_analytics(&offers, now);
        let summary = engine.summary(&offers, &analytics, &[], now);

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: marketpulse_analytics::SummaryMetrics =
            serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_offers, summary.total_offers);
        assert_eq!(parsed.total_revenue, summary.total_revenue);

        let alerts = engine.alerts(&offers, &analytics, &summary, &[], now);
        let json = serde_json::to_string(&alerts).unwrap();
        let parsed: Vec<marketpulse_analytics::PerformanceAlert> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), alerts.len());
    }
}
