use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::analysis::dto::{validate, AnalysisOutcome, RawAnalysisResponse};
use crate::config::AppConfig;
use crate::error::CaptureError;

/// External image-to-macros analysis service. Implementations never panic
/// or return a transport error directly; every failure mode is folded into
/// the outcome so callers have a single channel to deal with.
#[async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    async fn analyze(&self, image: Bytes, content_type: &str) -> AnalysisOutcome;
}

pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAnalyzer {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.analyzer_endpoint.clone(),
            api_key: config.analyzer_api_key.clone(),
        }
    }
}

#[async_trait]
impl NutritionAnalyzer for HttpAnalyzer {
    async fn analyze(&self, image: Bytes, content_type: &str) -> AnalysisOutcome {
        let mut req = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        // no timeout by design: a hung service leaves the submission
        // outstanding rather than fabricating a result
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "analysis request failed to send");
                return AnalysisOutcome::Failure {
                    reason: format!("analysis service unreachable: {e}"),
                };
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "analysis service returned an error status");
            return AnalysisOutcome::Failure {
                reason: format!("analysis service returned {status}"),
            };
        }

        let raw: RawAnalysisResponse = match resp.json().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "analysis response body did not parse");
                return AnalysisOutcome::Failure {
                    reason: "malformed response".into(),
                };
            }
        };

        match validate(raw) {
            Ok(success) => {
                debug!(dish = %success.dish, "analysis succeeded");
                AnalysisOutcome::Success(success)
            }
            Err(CaptureError::ServiceFailure(reason)) => AnalysisOutcome::Failure { reason },
            Err(e) => {
                warn!(error = %e, "analysis success payload rejected");
                AnalysisOutcome::Failure {
                    reason: "malformed response".into(),
                }
            }
        }
    }
}

/// Deterministic analyzer used by `AppState::fake` and the submit-path
/// tests: hands out pre-scripted outcomes in order.
pub struct ScriptedAnalyzer {
    outcomes: tokio::sync::Mutex<VecDeque<AnalysisOutcome>>,
}

impl ScriptedAnalyzer {
    pub fn new(outcomes: impl IntoIterator<Item = AnalysisOutcome>) -> Self {
        Self {
            outcomes: tokio::sync::Mutex::new(outcomes.into_iter().collect()),
        }
    }
}

#[async_trait]
impl NutritionAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, _image: Bytes, _content_type: &str) -> AnalysisOutcome {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(AnalysisOutcome::Failure {
                reason: "no scripted outcome".into(),
            })
    }
}
