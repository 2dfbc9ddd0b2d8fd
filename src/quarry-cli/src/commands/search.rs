//! Search command - query the index

use crate::output::{self, colors, OutputFormat};
use clap::Args;
use quarry_rs::{Client, SearchParams, SearchResponse};
use serde_json::Value;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Index of the first result to return
    #[arg(long, short = 'o')]
    pub offset: Option<u64>,

    /// Number of results per page
    #[arg(long, short = 'p')]
    pub page_size: Option<u64>,

    /// Sort specification, e.g. "mtime DESC"
    #[arg(long)]
    pub sort: Option<String>,

    /// Ask the server for facet counts
    #[arg(long)]
    pub facets: bool,

    /// Extra parameter passed through to the server (repeatable)
    #[arg(long = "param", short = 'P', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl SearchArgs {
    pub fn to_params(&self) -> SearchParams {
        let mut params = SearchParams::query(&self.query);
        if let Some(offset) = self.offset {
            params = params.offset(offset);
        }
        if let Some(page_size) = self.page_size {
            params = params.page_size(page_size);
        }
        if let Some(sort) = &self.sort {
            params = params.sort(sort.clone());
        }
        if self.facets {
            params = params.facets(true);
        }
        for (key, value) in &self.params {
            params = params.append(key.clone(), value);
        }
        params
    }
}

/// Execute the search command
pub async fn execute(args: SearchArgs, client: &mut Client, format: OutputFormat) -> anyhow::Result<()> {
    let params = args.to_params();

    let response = client.search(&params).await?;
    let Some(response) = response else {
        let detail = client
            .last_response()
            .map(|raw| format!("status {}: {}", raw.status, output::one_line(&raw.body, 200)))
            .unwrap_or_else(|| "no response recorded".to_string());
        anyhow::bail!("search failed with {}", detail);
    };

    match format {
        OutputFormat::Json => output::print_json(response.json())?,
        OutputFormat::Human => print_human(&response, args.offset.unwrap_or(0)),
    }

    Ok(())
}

fn print_human(response: &SearchResponse, offset: u64) {
    let took = response
        .search_time()
        .map(|t| format!(" in {}s", t))
        .unwrap_or_default();

    if response.results().is_empty() {
        println!(
            "No results found for '{}'{}",
            colors::label(response.query()),
            took
        );
    } else {
        println!(
            "Found {} result(s) for '{}'{}:\n",
            colors::number(&response.total().to_string()),
            colors::label(response.query()),
            took
        );
    }

    for (i, hit) in response.results().iter().enumerate() {
        let rank = offset + i as u64 + 1;
        let title = if hit.title().is_empty() {
            hit.uri()
        } else {
            hit.title()
        };
        println!(
            "[{}] {} {}",
            colors::rank(&rank.to_string()),
            title,
            colors::score(&format!("({:.3})", hit.score()))
        );
        println!("    {}", colors::uri(hit.uri()));
        if let Some(summary) = hit.summary().filter(|s| !s.is_empty()) {
            println!("    {}", colors::dim(&output::one_line(summary, 160)));
        }
    }

    if let Some(facets) = response.facets() {
        let lines = facet_lines(facets);
        if !lines.is_empty() {
            println!("\n{}", colors::label("Facets:"));
            for line in lines {
                println!("  {}", line);
            }
        }
    }
}

/// One line per facet: `name: term (count), term (count)`.
/// Accepts `{name: [{term, count}]}` and `{name: {term: count}}` shapes.
pub fn facet_lines(facets: &Value) -> Vec<String> {
    let Some(map) = facets.as_object() else {
        return Vec::new();
    };

    map.iter()
        .map(|(name, buckets)| {
            let terms: Vec<String> = match buckets {
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        let term = item.get("term").and_then(Value::as_str).unwrap_or("?");
                        match item.get("count") {
                            Some(count) => format!("{} ({})", term, count),
                            None => term.to_string(),
                        }
                    })
                    .collect(),
                Value::Object(counts) => counts
                    .iter()
                    .map(|(term, count)| format!("{} ({})", term, count))
                    .collect(),
                other => vec![other.to_string()],
            };
            format!("{}: {}", name, terms.join(", "))
        })
        .collect()
}
