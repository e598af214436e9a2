//! Async HTTP client wrapping the medis JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use medis_core::{record::Record, submission::RecordForm};
use reqwest::{Client, Response};
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the medis API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the medis JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct DeletedBody {
  deleted: usize,
}

/// Turn a non-success response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = match resp.json::<ErrorBody>().await {
    Ok(body) => body.error,
    Err(_) => status.to_string(),
  };
  Err(anyhow!("{what} → {status}: {message}"))
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/records`
  pub async fn list_records(&self) -> Result<Vec<Record>> {
    let resp = self
      .client
      .get(self.url("/records"))
      .send()
      .await
      .context("GET /records failed")?;
    check(resp, "GET /records")
      .await?
      .json()
      .await
      .context("deserialising records")
  }

  /// `GET /api/records/{id}`
  pub async fn get_record(&self, id: Uuid) -> Result<Record> {
    let resp = self
      .client
      .get(self.url(&format!("/records/{id}")))
      .send()
      .await
      .context("GET /records/{id} failed")?;
    check(resp, "GET /records/{id}")
      .await?
      .json()
      .await
      .context("deserialising record")
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /api/records`
  pub async fn create_record(&self, form: &RecordForm) -> Result<Record> {
    let resp = self
      .client
      .post(self.url("/records"))
      .json(form)
      .send()
      .await
      .context("POST /records failed")?;
    check(resp, "POST /records")
      .await?
      .json()
      .await
      .context("deserialising created record")
  }

  /// `PUT /api/records/{id}`
  pub async fn update_record(&self, id: Uuid, form: &RecordForm) -> Result<Record> {
    let resp = self
      .client
      .put(self.url(&format!("/records/{id}")))
      .json(form)
      .send()
      .await
      .context("PUT /records/{id} failed")?;
    check(resp, "PUT /records/{id}")
      .await?
      .json()
      .await
      .context("deserialising updated record")
  }

  /// `DELETE /api/records/{id}`
  pub async fn delete_record(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/records/{id}")))
      .send()
      .await
      .context("DELETE /records/{id} failed")?;
    check(resp, "DELETE /records/{id}").await?;
    Ok(())
  }

  /// `DELETE /api/records`; returns how many records were removed.
  pub async fn delete_all_records(&self) -> Result<usize> {
    let resp = self
      .client
      .delete(self.url("/records"))
      .send()
      .await
      .context("DELETE /records failed")?;
    let body: DeletedBody = check(resp, "DELETE /records")
      .await?
      .json()
      .await
      .context("deserialising delete count")?;
    Ok(body.deleted)
  }
}
