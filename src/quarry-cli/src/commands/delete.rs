//! Delete command - remove documents from the index

use super::{report, RequestOutcome};
use crate::output::OutputFormat;
use clap::Args;
use quarry_rs::Client;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// URIs of the documents to delete
    #[arg(required = true)]
    pub uris: Vec<String>,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let mut outcomes = Vec::with_capacity(args.uris.len());
    for uri in args.uris {
        let result = client.delete(&uri).await;
        outcomes.push(RequestOutcome::from_result(uri, result));
    }

    report(&outcomes, format)
}
