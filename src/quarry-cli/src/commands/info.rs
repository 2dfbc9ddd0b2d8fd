//! Info command - show what the server advertises

use crate::output::{self, colors, OutputFormat};
use quarry_rs::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InfoOutput<'a> {
    pub server: &'a str,
    pub search: &'a str,
    pub index: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<&'a serde_json::Value>,
}

impl<'a> InfoOutput<'a> {
    pub fn from_client(client: &'a Client) -> Self {
        let info = client.server_info();
        Self {
            server: client.base_url(),
            search: client.search_endpoint(),
            index: client.index_endpoint(),
            commit: client.commit_endpoint(),
            rollback: client.rollback_endpoint(),
            description: info.and_then(|i| i.description()),
            version: info.and_then(|i| i.version()),
            fields: client.fields(),
            facets: client.facets(),
        }
    }
}

fn names(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

/// Execute the info command
pub fn execute(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let info = InfoOutput::from_client(client);

    match format {
        OutputFormat::Json => output::print_json(&info)?,
        OutputFormat::Human => {
            println!("{} {}", colors::label("Server:  "), colors::uri(info.server));
            if let Some(description) = info.description {
                println!("{} {}", colors::label("About:   "), description);
            }
            if let Some(version) = info.version {
                println!("{} {}", colors::label("Version: "), version);
            }
            println!("{} {}", colors::label("Search:  "), info.search);
            println!("{} {}", colors::label("Index:   "), info.index);
            if let Some(commit) = info.commit {
                println!("{} {}", colors::label("Commit:  "), commit);
            }
            if let Some(rollback) = info.rollback {
                println!("{} {}", colors::label("Rollback:"), rollback);
            }
            println!("{} {}", colors::label("Fields:  "), names(info.fields));
            println!("{} {}", colors::label("Facets:  "), names(info.facets));
        }
    }

    Ok(())
}
