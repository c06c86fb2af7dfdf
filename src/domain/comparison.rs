use serde::{Deserialize, Serialize};

use super::statement::ParsedStatement;

/// Pricing offered in the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTerms {
    pub base_rate: f64,
    pub markup_bps: f64,
    pub per_transaction_fee: f64,
    pub monthly_fee: f64,
}

impl Default for PricingTerms {
    fn default() -> Self {
        Self {
            base_rate: 0.018,
            markup_bps: 30.0,
            per_transaction_fee: 0.10,
            monthly_fee: 9.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonData {
    pub monthly_volume: f64,
    pub current_fees: f64,
    pub current_effective_rate: f64,
    pub proposed_fees: f64,
    pub proposed_effective_rate: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub savings_percent: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ComparisonError {
    #[error("statement has no processing volume")]
    NoVolume,
    #[error("statement fees are negative: {0}")]
    NegativeFees(f64),
    #[error("statement figures are out of range")]
    OutOfRange,
}

impl ComparisonData {
    pub fn compute(
        statement: &ParsedStatement,
        terms: &PricingTerms,
    ) -> Result<Self, ComparisonError> {
        let volume = statement.total_volume;
        if !volume.is_finite() || !statement.total_fees.is_finite() {
            return Err(ComparisonError::OutOfRange);
        }
        if volume <= 0.0 {
            return Err(ComparisonError::NoVolume);
        }
        if statement.total_fees < 0.0 {
            return Err(ComparisonError::NegativeFees(statement.total_fees));
        }

        let rate = terms.base_rate + terms.markup_bps / 10_000.0;
        let proposed_fees = volume * rate
            + statement.transaction_count as f64 * terms.per_transaction_fee
            + terms.monthly_fee;
        let current_fees = statement.total_fees;
        let monthly_savings = current_fees - proposed_fees;
        let savings_percent = if current_fees > 0.0 {
            monthly_savings / current_fees * 100.0
        } else {
            0.0
        };

        Ok(Self {
            monthly_volume: round_cents(volume),
            current_fees: round_cents(current_fees),
            current_effective_rate: round_rate(current_fees / volume),
            proposed_fees: round_cents(proposed_fees),
            proposed_effective_rate: round_rate(proposed_fees / volume),
            monthly_savings: round_cents(monthly_savings),
            annual_savings: round_cents(monthly_savings * 12.0),
            savings_percent: round_cents(savings_percent),
        })
    }

    pub fn saves_money(&self) -> bool {
        self.monthly_savings > 0.0
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_rate(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
