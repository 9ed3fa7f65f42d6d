//! Extraction Prompts
//!
//! Both prompts demand a bare JSON array of `{"bucket", "value"}` records so
//! the same decoder handles the full taxonomy and the revenue breakdown.

use crate::types::TaxonomyKey;

/// Human-readable line item names shown to the model, in taxonomy order.
fn line_item_description(key: TaxonomyKey) -> &'static str {
    match key {
        TaxonomyKey::Products => "Products revenue",
        TaxonomyKey::Services => "Services revenue",
        TaxonomyKey::Revenue => "Total Revenue",
        TaxonomyKey::Taxes => "Income Tax Expense",
        other => other.label(),
    }
}

fn json_template(keys: &[TaxonomyKey], separator: &str) -> String {
    keys.iter()
        .map(|key| format!("{{\"bucket\":\"{}\",\"value\":0.0}}", key.label()))
        .collect::<Vec<_>>()
        .join(separator)
}

pub struct PromptTemplates;

impl PromptTemplates {
    /// Full-taxonomy extraction prompt.
    pub fn taxonomy_extraction(summary_text: &str) -> String {
        let items = TaxonomyKey::EXTRACTED
            .iter()
            .map(|key| format!("- {}", line_item_description(*key)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "# Financial Data Extraction Task\n\n\
             You are a financial analyst specializing in SEC filings and corporate financial statements. \
             Extract precise financial data from the text below, which comes from \
             a company's annual report (10-K filing).\n\n\
             ## Instructions\n\
             1. Locate the following annual line items in the financial summary\n\
             2. Extract the exact numerical values as they appear in the text\n\
             3. Convert all values to millions of dollars\n\
             4. Pay attention to units (million vs. billion) and adjust accordingly\n\
             5. For any value not explicitly mentioned, leave as 0.0\n\
             6. If multiple years are mentioned, extract the most recent year only\n\n\
             ## Required Financial Data Points\n\
             {items}\n\n\
             ## Response Format\n\
             Respond ONLY with a valid JSON array with this exact structure:\n\
             [\n  {template}\n]\n\n\
             ## Financial Summary Text\n\
             {summary_text}\n\n\
             Remember: Return ONLY the JSON array with no additional commentary or explanation.",
            items = items,
            template = json_template(&TaxonomyKey::EXTRACTED, ",\n  "),
            summary_text = summary_text,
        )
    }

    /// Narrower Products/Services breakdown prompt used during reconciliation.
    pub fn revenue_breakdown(summary_text: &str) -> String {
        format!(
            "As a financial analyst, analyze this 10-K summary to determine the breakdown of \
             revenue between Products and Services. If exact figures aren't provided, estimate \
             based on percentages or context clues. Format your response as a JSON array with \
             ONLY these two values in millions of dollars:\n\
             [{template}]\n\n\
             {summary_text}",
            template = json_template(&[TaxonomyKey::Products, TaxonomyKey::Services], ", "),
            summary_text = summary_text,
        )
    }
}
