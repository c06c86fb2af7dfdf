use std::fmt::Write as _;

use async_trait::async_trait;

use crate::application::ports::{DocumentRenderer, DocumentRendererError, RenderContext, RenderedBytes};

const STYLES: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:40px;color:#1f2933}\
h1{margin-bottom:4px}table{border-collapse:collapse;margin:16px 0}\
td,th{border:1px solid #cbd2d9;padding:6px 12px;text-align:right}\
th:first-child,td:first-child{text-align:left}.savings{color:#17803d;font-weight:bold}\
.hero img{max-width:100%;margin:8px 0}";

/// Renders the proposal as a self-contained HTML page. Used when no
/// external PDF rendering service is configured.
pub struct HtmlDocumentRenderer;

#[async_trait]
impl DocumentRenderer for HtmlDocumentRenderer {
    async fn render(&self, context: &RenderContext) -> Result<RenderedBytes, DocumentRendererError> {
        let html = render_html(context).map_err(|e| DocumentRendererError::Template(e.to_string()))?;

        Ok(RenderedBytes {
            bytes: html.into_bytes(),
            content_type: "text/html; charset=utf-8".to_string(),
            extension: "html".to_string(),
        })
    }
}

pub fn render_html(context: &RenderContext) -> Result<String, std::fmt::Error> {
    let merchant = &context.merchant;
    let comparison = &context.comparison;
    let statement = &context.statement;
    let mut out = String::with_capacity(4096);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Processing proposal for {}</title>", escape(&merchant.business_name))?;
    writeln!(out, "<style>{STYLES}</style></head><body>")?;
    writeln!(out, "<h1>Processing proposal for {}</h1>", escape(&merchant.business_name))?;
    if let Some(contact) = &merchant.contact_name {
        writeln!(out, "<p>Prepared for {}</p>", escape(contact))?;
    }
    writeln!(out, "<p><small>Generated {}</small></p>", context.generated_at.format("%B %-d, %Y"))?;

    if let Some(description) = &context.business_profile.description {
        writeln!(out, "<p><em>{}</em></p>", escape(description))?;
    }

    if let Some(cover) = context.images.first() {
        writeln!(
            out,
            "<div class=\"hero\"><img src=\"{}\" alt=\"{}\"></div>",
            escape(&cover.url),
            escape(&cover.variant)
        )?;
    }

    if let Some(narrative) = &context.narrative {
        writeln!(out, "<h2>Summary</h2>")?;
        for paragraph in narrative.summary.split("\n\n").filter(|p| !p.trim().is_empty()) {
            writeln!(out, "<p>{}</p>", escape(paragraph.trim()))?;
        }
    }

    writeln!(out, "<h2>Current processing</h2><table>")?;
    if let Some(processor) = &statement.processor {
        writeln!(out, "<tr><td>Processor</td><td>{}</td></tr>", escape(processor))?;
    }
    if let Some(period) = &statement.period {
        writeln!(out, "<tr><td>Statement period</td><td>{}</td></tr>", escape(period))?;
    }
    writeln!(out, "<tr><td>Monthly volume</td><td>{}</td></tr>", money(comparison.monthly_volume))?;
    writeln!(out, "<tr><td>Transactions</td><td>{}</td></tr>", statement.transaction_count)?;
    for brand in &statement.card_brands {
        writeln!(out, "<tr><td>{}</td><td>{}</td></tr>", escape(&brand.brand), money(brand.volume))?;
    }
    writeln!(out, "</table>")?;

    writeln!(out, "<h2>Cost comparison</h2><table>")?;
    writeln!(out, "<tr><th></th><th>Current</th><th>Proposed</th></tr>")?;
    writeln!(
        out,
        "<tr><td>Monthly fees</td><td>{}</td><td>{}</td></tr>",
        money(comparison.current_fees),
        money(comparison.proposed_fees)
    )?;
    writeln!(
        out,
        "<tr><td>Effective rate</td><td>{}</td><td>{}</td></tr>",
        percent(comparison.current_effective_rate),
        percent(comparison.proposed_effective_rate)
    )?;
    writeln!(out, "</table>")?;

    if comparison.saves_money() {
        writeln!(
            out,
            "<p class=\"savings\">Estimated savings: {} per month, {} per year ({:.2}%)</p>",
            money(comparison.monthly_savings),
            money(comparison.annual_savings),
            comparison.savings_percent
        )?;
    } else {
        writeln!(out, "<p>Your current pricing is competitive. We can still match it with transparent terms.</p>")?;
    }

    for image in context.images.iter().skip(1) {
        writeln!(
            out,
            "<div class=\"hero\"><img src=\"{}\" alt=\"{}\"></div>",
            escape(&image.url),
            escape(&image.variant)
        )?;
    }

    writeln!(out, "</body></html>")?;
    Ok(out)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

