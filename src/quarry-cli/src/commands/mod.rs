//! Command implementations
//!
//! Each subcommand takes its parsed arguments, a connected client and the
//! output format.

pub mod control;
pub mod delete;
pub mod index;
pub mod info;
pub mod search;

use serde::Serialize;

/// Outcome of one request in a batch (index or delete)
#[derive(Debug, Serialize)]
pub struct RequestOutcome {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn from_result(target: String, result: quarry_rs::Result<quarry_rs::RawResponse>) -> Self {
        match result {
            Ok(raw) => Self {
                target,
                status: Some(raw.status),
                body: Some(raw.body),
                error: None,
            },
            Err(e) => Self {
                target,
                status: None,
                body: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

/// Print batch outcomes and fail if any request did not succeed
pub fn report(outcomes: &[RequestOutcome], format: crate::output::OutputFormat) -> anyhow::Result<()> {
    use crate::output::{self, colors, OutputFormat};

    match format {
        OutputFormat::Json => output::print_json(outcomes)?,
        OutputFormat::Human => {
            for outcome in outcomes {
                match (&outcome.status, &outcome.error) {
                    (Some(code), _) => {
                        println!("{} {}", output::status(*code), colors::uri(&outcome.target));
                        if !outcome.succeeded() {
                            if let Some(body) = outcome.body.as_deref().filter(|b| !b.is_empty()) {
                                println!("    {}", colors::dim(&output::one_line(body, 200)));
                            }
                        }
                    }
                    (None, Some(error)) => {
                        println!("{} {}", colors::error("ERR"), colors::uri(&outcome.target));
                        println!("    {}", colors::dim(error));
                    }
                    (None, None) => {}
                }
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} request(s) failed", failed, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_rs::{ClientError, RawResponse};

    #[test]
    fn test_outcome_success() {
        let ok = RequestOutcome::from_result(
            "a".to_string(),
            Ok(RawResponse {
                status: 201,
                content_type: None,
                body: String::new(),
            }),
        );
        assert!(ok.succeeded());

        let rejected = RequestOutcome::from_result(
            "b".to_string(),
            Ok(RawResponse {
                status: 400,
                content_type: None,
                body: "bad".to_string(),
            }),
        );
        assert!(!rejected.succeeded());

        let failed = RequestOutcome::from_result(
            "c".to_string(),
            Err(ClientError::Validation("uri is required".to_string())),
        );
        assert!(!failed.succeeded());
        assert!(failed.error.unwrap().contains("uri is required"));
    }

    #[test]
    fn test_report_fails_on_any_failure() {
        let outcomes = vec![
            RequestOutcome {
                target: "a".to_string(),
                status: Some(200),
                body: None,
                error: None,
            },
            RequestOutcome {
                target: "b".to_string(),
                status: Some(500),
                body: Some("boom".to_string()),
                error: None,
            },
        ];
        let err = report(&outcomes, crate::output::OutputFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 request(s) failed");
        assert!(report(&outcomes[..1], crate::output::OutputFormat::Human).is_ok());
    }
}
