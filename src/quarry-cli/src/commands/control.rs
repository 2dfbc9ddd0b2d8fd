//! Commit and rollback commands

use super::{report, RequestOutcome};
use crate::output::OutputFormat;
use quarry_rs::Client;

pub async fn commit(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let target = client.commit_endpoint().unwrap_or("commit").to_string();
    let outcome = RequestOutcome::from_result(target, client.commit().await);
    report(&[outcome], format)
}

pub async fn rollback(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let target = client.rollback_endpoint().unwrap_or("rollback").to_string();
    let outcome = RequestOutcome::from_result(target, client.rollback().await);
    report(&[outcome], format)
}
