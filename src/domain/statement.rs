use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBrandVolume {
    pub brand: String,
    pub volume: f64,
}

/// Pricing and volume figures pulled out of one or more processing statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub processor: Option<String>,
    pub period: Option<String>,
    pub total_volume: f64,
    pub transaction_count: u64,
    pub total_fees: f64,
    pub card_brands: Vec<CardBrandVolume>,
}

impl ParsedStatement {
    /// Combines statements from several uploads into one view.
    ///
    /// Totals are summed and card brand volumes merged by case-insensitive
    /// brand name. Processor and period come from the first statement that
    /// names them.
    pub fn merge(statements: Vec<ParsedStatement>) -> Option<ParsedStatement> {
        let mut iter = statements.into_iter();
        let mut merged = iter.next()?;

        for statement in iter {
            merged.total_volume += statement.total_volume;
            merged.transaction_count = merged
                .transaction_count
                .saturating_add(statement.transaction_count);
            merged.total_fees += statement.total_fees;
            if merged.processor.is_none() {
                merged.processor = statement.processor;
            }
            if merged.period.is_none() {
                merged.period = statement.period;
            }
            for brand in statement.card_brands {
                match merged
                    .card_brands
                    .iter_mut()
                    .find(|b| b.brand.eq_ignore_ascii_case(&brand.brand))
                {
                    Some(existing) => existing.volume += brand.volume,
                    None => merged.card_brands.push(brand),
                }
            }
        }

        Some(merged)
    }

    /// False when a total or brand volume overflowed to infinity or NaN.
    pub fn is_finite(&self) -> bool {
        self.total_volume.is_finite()
            && self.total_fees.is_finite()
            && self.card_brands.iter().all(|b| b.volume.is_finite())
    }

    pub fn average_ticket(&self) -> Option<f64> {
        (self.transaction_count > 0).then(|| self.total_volume / self.transaction_count as f64)
    }
}
