//! The backend seam.
//!
//! [`InventoryApi`] is the fixed HTTP contract expressed as a trait, so the controller and
//! dashboard can be driven by the reqwest client in production and by an in-memory fake in
//! tests.

use async_trait::async_trait;
use medtrack_wire::{
    BuyListItem, ForecastAlert, LogUsageReply, LogUsageRequest, RestockForm, StockRecord,
    SuggestionItem, UsageEntry, WireError,
};

/// Failure talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] WireError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Inventory backend operations, one per endpoint.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// `GET /restock`
    async fn stock_summary(&self) -> ApiResult<Vec<StockRecord>>;

    /// `GET /forecast`
    async fn forecast(&self) -> ApiResult<Vec<ForecastAlert>>;

    /// `GET /buy_list`
    async fn buy_list(&self) -> ApiResult<Vec<BuyListItem>>;

    /// `GET /usage_log`
    async fn usage_log(&self) -> ApiResult<Vec<UsageEntry>>;

    /// `GET /api/items/suggest?q=<query>`
    async fn suggest(&self, query: &str) -> ApiResult<Vec<SuggestionItem>>;

    /// `POST /log_usage`. A `success: false` reply is `Ok`; only transport and
    /// undecodable failures are `Err`.
    async fn log_usage(&self, request: &LogUsageRequest) -> ApiResult<LogUsageReply>;

    /// `GET /restock_medicine`
    async fn restockable_medicines(&self) -> ApiResult<Vec<String>>;

    /// `POST /restock_medicine`
    async fn restock(&self, form: &RestockForm) -> ApiResult<()>;
}
