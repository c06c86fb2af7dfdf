use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::{StatementParser, StatementParserError};
use crate::domain::{CardBrandVolume, ContentType, ParsedStatement, SourceDocument};

static NON_KEY_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const VOLUME_KEYS: &[&str] = &[
    "total volume",
    "total sales",
    "gross sales",
    "sales volume",
    "total amount submitted",
    "amount submitted",
    "processing volume",
];
const TRANSACTION_KEYS: &[&str] = &[
    "total transactions",
    "transaction count",
    "number of transactions",
    "transactions",
    "total items",
];
const FEE_KEYS: &[&str] = &[
    "total fees",
    "total fees charged",
    "fees charged",
    "total charges",
    "processing fees",
    "fees",
];
const PROCESSOR_KEYS: &[&str] = &["processor", "merchant service provider", "provider"];
const PERIOD_KEYS: &[&str] = &["statement period", "period", "statement date", "statement month"];
const CARD_BRANDS: &[(&str, &str)] = &[
    ("visa", "Visa"),
    ("mastercard", "Mastercard"),
    ("master card", "Mastercard"),
    ("mc", "Mastercard"),
    ("amex", "American Express"),
    ("american express", "American Express"),
    ("discover", "Discover"),
];

/// Reads statements laid out as labelled lines: `Total Volume: $12,500.00`,
/// CSV rows (`Total Volume,12500`) or markdown table rows
/// (`| Total Volume | $12,500.00 |`).
pub struct TextStatementParser;

#[async_trait]
impl StatementParser for TextStatementParser {
    async fn parse(
        &self,
        data: &[u8],
        document: &SourceDocument,
    ) -> Result<ParsedStatement, StatementParserError> {
        if !matches!(document.content_type, ContentType::Text | ContentType::Csv) {
            return Err(StatementParserError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let text = std::str::from_utf8(data)
            .map_err(|e| StatementParserError::ExtractionFailed(e.to_string()))?;
        parse_statement_text(text, &document.filename)
    }
}

/// Extracts pricing figures from statement text. `source` names the document
/// in error messages.
pub fn parse_statement_text(
    text: &str,
    source: &str,
) -> Result<ParsedStatement, StatementParserError> {
    let mut statement = ParsedStatement::default();
    let mut volume = None;
    let mut fees = None;

    for (key, value) in text.lines().filter_map(split_line) {
        if VOLUME_KEYS.contains(&key.as_str()) {
            volume.get_or_insert(parse_amount(&key, &value)?);
        } else if FEE_KEYS.contains(&key.as_str()) {
            fees.get_or_insert(parse_amount(&key, &value)?.abs());
        } else if TRANSACTION_KEYS.contains(&key.as_str()) {
            if statement.transaction_count == 0 {
                statement.transaction_count = parse_count(&key, &value)?;
            }
        } else if PROCESSOR_KEYS.contains(&key.as_str()) {
            statement.processor.get_or_insert(value);
        } else if PERIOD_KEYS.contains(&key.as_str()) {
            statement.period.get_or_insert(value);
        } else if let Some((_, brand)) = CARD_BRANDS.iter().find(|(alias, _)| *alias == key) {
            let amount = parse_amount(&key, &value)?;
            match statement.card_brands.iter_mut().find(|b| b.brand == *brand) {
                Some(existing) => existing.volume += amount,
                None => statement.card_brands.push(CardBrandVolume {
                    brand: brand.to_string(),
                    volume: amount,
                }),
            }
        }
    }

    let volume = volume.or_else(|| {
        let brand_total: f64 = statement.card_brands.iter().map(|b| b.volume).sum();
        (brand_total > 0.0).then_some(brand_total)
    });

    match (volume, fees) {
        (Some(volume), Some(fees)) => {
            statement.total_volume = volume;
            statement.total_fees = fees;
            if !statement.is_finite() {
                return Err(StatementParserError::OutOfRange(source.to_string()));
            }
            Ok(statement)
        }
        _ => Err(StatementParserError::NoPricingData(source.to_string())),
    }
}

/// Splits a line into a normalized key and its raw value.
fn split_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (key, value) = if line.starts_with('|') {
        let mut cells = line
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty());
        (cells.next()?, cells.next()?)
    } else if let Some(pair) = line.split_once(':') {
        pair
    } else {
        line.split_once(',')?
    };

    let key = normalize_key(key);
    let value = value.trim().trim_matches('"').trim().to_string();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn normalize_key(key: &str) -> String {
    let lowered = key.trim().trim_matches('"').to_ascii_lowercase();
    NON_KEY_CHARS
        .replace_all(&lowered, " ")
        .trim()
        .to_string()
}

fn parse_amount(key: &str, value: &str) -> Result<f64, StatementParserError> {
    let negative = value.starts_with('(') && value.ends_with(')');
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let amount = cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| StatementParserError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        })?;
    Ok(if negative { -amount } else { amount })
}

fn parse_count(key: &str, value: &str) -> Result<u64, StatementParserError> {
    let cleaned: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    cleaned
        .parse::<u64>()
        .map_err(|_| StatementParserError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        })
}
