//! Prompt templates for summarization.

use super::request::SummaryRequest;

/// System prompt for summarization calls.
pub fn system_prompt() -> &'static str {
    "You're an expert data analyst providing clear insights about visualizations."
}

/// Build the user prompt for a summary.
pub fn summary_prompt(request: &SummaryRequest) -> String {
    let chart = request
        .chart_kind
        .map(|k| k.to_string())
        .unwrap_or_else(|| "table".to_string());

    let definitions = if request.definitions.is_empty() {
        "None available".to_string()
    } else {
        request.definitions.join("\n")
    };

    let sample = serde_json::to_string_pretty(&request.sample).unwrap_or_default();

    format!(
        r#"Analyze this data visualization with the following characteristics:
- Chart type: {}
- Calculation mode: {}
- Reference variables: {}
- Observed variables: {}

Variable definitions:
{}

Data sample ({} of {} total points):
{}

Please provide:
1. A concise summary of what the chart shows
2. Key trends or patterns in the data
3. Potential insights or conclusions that can be drawn
4. Any notable outliers or anomalies
5. Suggestions for further analysis

Format your response in clear paragraphs without using markdown headings.
If the variables and their descriptions are in another language, write the analysis in that language.
Do not ask questions."#,
        chart,
        request.mode,
        request.reference_fields.join(", "),
        request.observed_fields.join(", "),
        definitions,
        request.sample.len(),
        request.total_groups,
        sample,
    )
}
