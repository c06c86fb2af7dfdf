use proposal_pipeline::domain::{
    CardBrandVolume, ComparisonData, ComparisonError, GeneratedImage, ImageGenerationStatus,
    ImageOutcome, ImageSet, MerchantProfile, Narrative, NarrativeSource, ParsedStatement,
    PricingTerms,
};

fn statement(volume: f64, transactions: u64, fees: f64) -> ParsedStatement {
    ParsedStatement {
        total_volume: volume,
        transaction_count: transactions,
        total_fees: fees,
        ..ParsedStatement::default()
    }
}

#[test]
fn given_expensive_statement_when_compared_then_savings_are_positive() {
    let comparison =
        ComparisonData::compute(&statement(25_000.0, 500, 750.0), &PricingTerms::default()).unwrap();

    assert_eq!(comparison.monthly_volume, 25_000.0);
    assert_eq!(comparison.current_fees, 750.0);
    assert_eq!(comparison.current_effective_rate, 0.03);
    assert_eq!(comparison.proposed_fees, 584.95);
    assert_eq!(comparison.monthly_savings, 165.05);
    assert_eq!(comparison.annual_savings, 1980.6);
    assert_eq!(comparison.savings_percent, 22.01);
    assert!(comparison.saves_money());
}

#[test]
fn given_cheap_statement_when_compared_then_no_savings() {
    let comparison =
        ComparisonData::compute(&statement(10_000.0, 100, 150.0), &PricingTerms::default()).unwrap();

    assert!(comparison.monthly_savings < 0.0);
    assert!(!comparison.saves_money());
}

#[test]
fn given_zero_volume_when_compared_then_errors() {
    let result = ComparisonData::compute(&statement(0.0, 0, 10.0), &PricingTerms::default());

    assert_eq!(result.unwrap_err(), ComparisonError::NoVolume);
}

#[test]
fn given_negative_fees_when_compared_then_errors() {
    let result = ComparisonData::compute(&statement(100.0, 1, -5.0), &PricingTerms::default());

    assert_eq!(result.unwrap_err(), ComparisonError::NegativeFees(-5.0));
}

#[test]
fn given_infinite_volume_when_compared_then_out_of_range() {
    let result = ComparisonData::compute(&statement(f64::INFINITY, 1, 10.0), &PricingTerms::default());

    assert_eq!(result.unwrap_err(), ComparisonError::OutOfRange);
}

#[test]
fn given_nan_fees_when_compared_then_out_of_range() {
    let result = ComparisonData::compute(&statement(100.0, 1, f64::NAN), &PricingTerms::default());

    assert_eq!(result.unwrap_err(), ComparisonError::OutOfRange);
}

#[test]
fn given_multiple_statements_when_merged_then_totals_and_brands_combine() {
    let mut first = statement(1_000.0, 10, 30.0);
    first.processor = Some("Acme".to_string());
    first.card_brands = vec![CardBrandVolume {
        brand: "Visa".to_string(),
        volume: 600.0,
    }];
    let mut second = statement(2_000.0, 20, 60.0);
    second.period = Some("April".to_string());
    second.card_brands = vec![
        CardBrandVolume {
            brand: "VISA".to_string(),
            volume: 400.0,
        },
        CardBrandVolume {
            brand: "Discover".to_string(),
            volume: 100.0,
        },
    ];

    let merged = ParsedStatement::merge(vec![first, second]).unwrap();

    assert_eq!(merged.total_volume, 3_000.0);
    assert_eq!(merged.transaction_count, 30);
    assert_eq!(merged.total_fees, 90.0);
    assert_eq!(merged.processor.as_deref(), Some("Acme"));
    assert_eq!(merged.period.as_deref(), Some("April"));
    assert_eq!(merged.card_brands.len(), 2);
    assert_eq!(merged.card_brands[0].volume, 1_000.0);
    assert_eq!(merged.average_ticket(), Some(100.0));
    assert!(ParsedStatement::merge(Vec::new()).is_none());
}

fn generated(variant: &str) -> ImageOutcome {
    ImageOutcome::Generated {
        variant: variant.to_string(),
        images: vec![GeneratedImage {
            variant: variant.to_string(),
            url: format!("https://img/{variant}.png"),
        }],
    }
}

fn failed(variant: &str) -> ImageOutcome {
    ImageOutcome::Failed {
        variant: variant.to_string(),
        reason: "rejected".to_string(),
    }
}

#[test]
fn given_all_variants_succeed_when_aggregated_then_complete() {
    let set = ImageSet::from_outcomes(vec![generated("cover"), generated("storefront")]);

    assert_eq!(set.status, ImageGenerationStatus::Complete);
    assert_eq!(set.images().count(), 2);
}

#[test]
fn given_some_variants_fail_when_aggregated_then_partial() {
    let timed_out = ImageOutcome::TimedOut {
        variant: "growth".to_string(),
        after_ms: 30_000,
    };
    let set = ImageSet::from_outcomes(vec![generated("cover"), failed("storefront"), timed_out]);

    assert_eq!(set.status, ImageGenerationStatus::Partial);
    assert_eq!(set.images().map(|i| i.variant.as_str()).collect::<Vec<_>>(), vec!["cover"]);
}

#[test]
fn given_no_variant_succeeds_when_aggregated_then_failed() {
    let set = ImageSet::from_outcomes(vec![failed("cover"), failed("storefront")]);

    assert_eq!(set.status, ImageGenerationStatus::Failed);
    assert_eq!(ImageGenerationStatus::aggregate(&[]), ImageGenerationStatus::Failed);
}

#[test]
fn given_image_outcome_when_serialized_then_tagged_by_outcome() {
    let json = serde_json::to_value(failed("cover")).unwrap();

    assert_eq!(json["outcome"], "failed");
    assert_eq!(json["variant"], "cover");
}

#[test]
fn given_savings_when_standard_narrative_built_then_mentions_figures() {
    let merchant = MerchantProfile {
        business_name: "Corner Bakery".to_string(),
        website: None,
        industry: None,
        contact_name: None,
    };
    let comparison =
        ComparisonData::compute(&statement(25_000.0, 500, 750.0), &PricingTerms::default()).unwrap();

    let narrative = Narrative::standard(&merchant, Some(&comparison));

    assert_eq!(narrative.source, NarrativeSource::Fallback);
    assert!(narrative.summary.contains("Corner Bakery"));
    assert!(narrative.summary.contains("$165.05"));
}
