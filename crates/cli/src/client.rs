//! API client for communicating with the aggregator service

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the aggregator service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request expecting a JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with a JSON body, expecting no content back
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        Ok(())
    }

    /// Trigger an aggregation run
    ///
    /// 204 means full success; a 500 carrying a `failed` list is a
    /// partial failure and is reported rather than treated as a hard
    /// error.
    pub async fn trigger_aggregation(
        &self,
        account: &str,
        window: &str,
    ) -> Result<AggregationOutcome> {
        let path = format!(
            "aggregations?account={}&aggregation_window={}",
            account, window
        );
        let url = self.base_url.join(&path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(AggregationOutcome::Success),
            StatusCode::INTERNAL_SERVER_ERROR => {
                // A 500 is a partial failure only when it carries the
                // failed-namespace list; the service also uses 500 for
                // run-level computation failures with an `error` body.
                let body = response.text().await.unwrap_or_default();
                match serde_json::from_str::<PartialFailureBody>(&body) {
                    Ok(partial) => Ok(AggregationOutcome::PartialFailure(partial.failed)),
                    Err(_) => anyhow::bail!(
                        "API error ({}): {}",
                        StatusCode::INTERNAL_SERVER_ERROR,
                        body
                    ),
                }
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("API error ({}): {}", status, body)
            }
        }
    }
}

/// Result of an aggregation run
#[derive(Debug)]
pub enum AggregationOutcome {
    Success,
    PartialFailure(Vec<FailedNamespace>),
}

#[derive(Debug, Deserialize)]
struct PartialFailureBody {
    failed: Vec<FailedNamespace>,
}

#[derive(Debug, Deserialize)]
pub struct FailedNamespace {
    pub namespace: String,
    pub error: String,
}

// API exchange types

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceRegistration {
    pub account: String,
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub account: String,
    pub namespace: String,
    pub container: String,
    pub timestamp: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub container: String,
    pub window_start: String,
    pub cpu: MetricStats,
    pub memory: MetricStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub account: String,
    pub namespace: String,
    pub window_type: String,
    pub entries: Vec<ReportEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_aggregation_full_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/aggregations?account=a1&aggregation_window=hour")
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let outcome = client.trigger_aggregation("a1", "hour").await.unwrap();

        mock.assert_async().await;
        assert!(matches!(outcome, AggregationOutcome::Success));
    }

    #[tokio::test]
    async fn test_trigger_aggregation_partial_failure_lists_namespaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/aggregations?account=a1&aggregation_window=day")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"failed":[{"namespace":"ns2","error":"store unavailable: outage"}]}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let outcome = client.trigger_aggregation("a1", "day").await.unwrap();

        match outcome {
            AggregationOutcome::PartialFailure(failed) => {
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].namespace, "ns2");
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_trigger_aggregation_run_level_error_surfaces_the_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/aggregations?account=a1&aggregation_window=hour")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"computation failure: grouped key vanished during rollup"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.trigger_aggregation("a1", "hour").await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("computation failure"), "got: {message}");
    }

    #[tokio::test]
    async fn test_get_parses_report_document() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/reports/a1/ns1/hour")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "account": "a1",
                    "namespace": "ns1",
                    "window_type": "hour",
                    "entries": [{
                        "container": "c1",
                        "window_start": "2021-01-01T00:00:00Z",
                        "cpu": {"avg":0.1,"min":0.1,"max":0.1,"p90":0.1,"p95":0.1,"p99":0.1},
                        "memory": {"avg":0.2,"min":0.2,"max":0.2,"p90":0.2,"p95":0.2,"p99":0.2}
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let document: ReportDocument = client.get("reports/a1/ns1/hour").await.unwrap();

        assert_eq!(document.window_type, "hour");
        assert_eq!(document.entries.len(), 1);
        assert_eq!(document.entries[0].cpu.p99, 0.1);
    }

    #[tokio::test]
    async fn test_get_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/reports/a1/ns1/hour")
            .with_status(404)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result: Result<ReportDocument> = client.get("reports/a1/ns1/hour").await;
        assert!(result.is_err());
    }
}
