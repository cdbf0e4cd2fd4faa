//! # Medicine Tracker API client
//!
//! reqwest implementation of [`InventoryApi`] against the Flask backend.
//!
//! Response bodies are read as text and handed to the `medtrack-wire` parsers, so decode
//! errors carry the JSON path of the offending field.

use async_trait::async_trait;
use medtrack_core::{ApiError, ApiResult, CoreConfig, InventoryApi};
use medtrack_wire::{
    BuyList, BuyListItem, ForecastAlert, ForecastAlerts, LogUsageReply, LogUsageRequest,
    MedicineList, RestockForm, StockRecord, StockSummary, SuggestionItem, Suggestions,
    UsageEntry, UsageLog,
};
use reqwest::{Client, Response};
use std::time::Duration;

/// Backend routes, relative to the base URL.
mod routes {
    pub const STOCK_SUMMARY: &str = "/restock";
    pub const FORECAST: &str = "/forecast";
    pub const BUY_LIST: &str = "/buy_list";
    pub const USAGE_LOG: &str = "/usage_log";
    pub const SUGGEST: &str = "/api/items/suggest";
    pub const LOG_USAGE: &str = "/log_usage";
    pub const RESTOCK_MEDICINE: &str = "/restock_medicine";
}

/// HTTP client for the inventory backend.
#[derive(Clone, Debug)]
pub struct HttpInventoryApi {
    client: Client,
    base_url: String,
}

impl HttpInventoryApi {
    /// Build a client from the resolved configuration.
    pub fn new(cfg: &CoreConfig) -> ApiResult<Self> {
        Self::with_timeout(cfg.api_base_url(), cfg.http_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn get_text(&self, route: &str) -> ApiResult<String> {
        tracing::debug!(route, "GET");
        let response = self
            .client
            .get(self.url(route))
            .send()
            .await
            .map_err(transport)?;
        success_body(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn status_error(status: reqwest::StatusCode) -> ApiError {
    ApiError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
    }
}

/// Body of a 2xx response, or `ApiError::Status`.
async fn success_body(response: Response) -> ApiResult<String> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, url = %response.url(), "backend returned an error status");
        return Err(status_error(status));
    }
    response.text().await.map_err(transport)
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn stock_summary(&self) -> ApiResult<Vec<StockRecord>> {
        let body = self.get_text(routes::STOCK_SUMMARY).await?;
        Ok(StockSummary::parse(&body)?)
    }

    async fn forecast(&self) -> ApiResult<Vec<ForecastAlert>> {
        let body = self.get_text(routes::FORECAST).await?;
        Ok(ForecastAlerts::parse(&body)?)
    }

    async fn buy_list(&self) -> ApiResult<Vec<BuyListItem>> {
        let body = self.get_text(routes::BUY_LIST).await?;
        Ok(BuyList::parse(&body)?)
    }

    async fn usage_log(&self) -> ApiResult<Vec<UsageEntry>> {
        let body = self.get_text(routes::USAGE_LOG).await?;
        Ok(UsageLog::parse(&body)?)
    }

    async fn suggest(&self, query: &str) -> ApiResult<Vec<SuggestionItem>> {
        tracing::debug!(query, "GET {}", routes::SUGGEST);
        let response = self
            .client
            .get(self.url(routes::SUGGEST))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(transport)?;
        let body = success_body(response).await?;
        Ok(Suggestions::parse(&body)?)
    }

    /// The backend answers `{success, message}` for rejected lines too (400/500), so the body
    /// is decoded whatever the status. Only an undecodable error response becomes a status
    /// error.
    async fn log_usage(&self, request: &LogUsageRequest) -> ApiResult<LogUsageReply> {
        let response = self
            .client
            .post(self.url(routes::LOG_USAGE))
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        match LogUsageReply::parse(&body) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(status_error(status)),
            Err(err) => Err(err.into()),
        }
    }

    async fn restockable_medicines(&self) -> ApiResult<Vec<String>> {
        let body = self.get_text(routes::RESTOCK_MEDICINE).await?;
        Ok(MedicineList::parse(&body)?)
    }

    async fn restock(&self, form: &RestockForm) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url(routes::RESTOCK_MEDICINE))
            .form(form)
            .send()
            .await
            .map_err(transport)?;
        success_body(response).await.map(|_| ())
    }
}
