//! Hugging Face hosted inference API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InferenceClient, LabelScore, ServiceUnavailable};
use crate::config::InferenceConfig;

/// Calls `{base_url}/models/{model}` with a bearer token.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    base_url: String,
    zero_shot_model: String,
    summary_model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
}

/// The API has answered with both shapes depending on deployment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Ranked { labels: Vec<String>, scores: Vec<f32> },
    Pairs(Vec<LabelScore>),
}

impl ZeroShotResponse {
    fn into_scores(self) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        match self {
            ZeroShotResponse::Ranked { labels, scores } => {
                if labels.len() != scores.len() {
                    return Err(ServiceUnavailable::Malformed(format!(
                        "{} labels but {} scores",
                        labels.len(),
                        scores.len()
                    )));
                }
                Ok(labels
                    .into_iter()
                    .zip(scores)
                    .map(|(label, score)| LabelScore { label, score })
                    .collect())
            }
            ZeroShotResponse::Pairs(pairs) => Ok(pairs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryResponse {
    Many(Vec<SummaryItem>),
    One(SummaryItem),
}

impl SummaryResponse {
    fn into_text(self) -> Result<String, ServiceUnavailable> {
        let text = match self {
            SummaryResponse::Many(items) => items.into_iter().next().map(|item| item.summary_text),
            SummaryResponse::One(item) => Some(item.summary_text),
        };

        text.map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ServiceUnavailable::Malformed("empty summary".to_string()))
    }
}

impl HuggingFaceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, ServiceUnavailable> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ServiceUnavailable::MissingCredential)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ServiceUnavailable::MissingCredential)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ServiceUnavailable::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            zero_shot_model: config.zero_shot_model.clone(),
            summary_model: config.summary_model.clone(),
            timeout: config.timeout,
        })
    }

    async fn post<B, T>(&self, model: &str, body: &B) -> Result<T, ServiceUnavailable>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/models/{}", self.base_url, model);
        debug!(url = %url, "calling inference service");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceUnavailable::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        serde_json::from_slice(&bytes).map_err(|err| ServiceUnavailable::Malformed(err.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> ServiceUnavailable {
        if err.is_timeout() {
            ServiceUnavailable::Timeout(self.timeout)
        } else {
            ServiceUnavailable::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn zero_shot(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, ServiceUnavailable> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };
        let response: ZeroShotResponse = self.post(&self.zero_shot_model, &request).await?;
        response.into_scores()
    }

    async fn summarize(&self, text: &str) -> Result<String, ServiceUnavailable> {
        let request = SummaryRequest { inputs: text };
        let response: SummaryResponse = self.post(&self.summary_model, &request).await?;
        response.into_text()
    }
}
