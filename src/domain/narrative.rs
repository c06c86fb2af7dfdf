use serde::{Deserialize, Serialize};

use super::comparison::ComparisonData;
use super::merchant::MerchantProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub summary: String,
    pub source: NarrativeSource,
}

impl Narrative {
    pub fn generated(summary: String) -> Self {
        Self {
            summary,
            source: NarrativeSource::Generated,
        }
    }

    /// Templated summary used when no generated text is available.
    pub fn standard(merchant: &MerchantProfile, comparison: Option<&ComparisonData>) -> Self {
        let summary = match comparison {
            Some(c) if c.saves_money() => format!(
                "{} currently pays an effective rate of {:.2}% on ${:.2} in monthly volume. \
                 Our proposed pricing lowers that to {:.2}%, saving an estimated ${:.2} per month \
                 (${:.2} per year).",
                merchant.business_name,
                c.current_effective_rate * 100.0,
                c.monthly_volume,
                c.proposed_effective_rate * 100.0,
                c.monthly_savings,
                c.annual_savings,
            ),
            Some(c) => format!(
                "{} currently pays an effective rate of {:.2}% on ${:.2} in monthly volume. \
                 Our proposal focuses on transparent interchange-plus pricing at {:.2}%.",
                merchant.business_name,
                c.current_effective_rate * 100.0,
                c.monthly_volume,
                c.proposed_effective_rate * 100.0,
            ),
            None => format!(
                "Thank you for considering us for {}'s payment processing.",
                merchant.business_name
            ),
        };

        Self {
            summary,
            source: NarrativeSource::Fallback,
        }
    }
}
