//! In-memory backend and scripted speech source for unit tests.

use crate::api::{ApiError, ApiResult, InventoryApi};
use crate::speech::{RecognitionError, SpeechRecogniser};
use async_trait::async_trait;
use medtrack_wire::{
    BuyListItem, ForecastAlert, LogUsageReply, LogUsageRequest, RestockForm, StockRecord,
    SuggestionItem, UsageEntry,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

fn offline() -> ApiError {
    ApiError::Transport("connection refused".into())
}

#[derive(Default)]
pub(crate) struct FakeInventory {
    pub suggestions: Mutex<HashMap<String, Vec<SuggestionItem>>>,
    pub fail_suggestions: AtomicBool,
    pub stock: Mutex<Vec<StockRecord>>,
    pub fail_stock: AtomicBool,
    pub forecast: Mutex<Vec<ForecastAlert>>,
    pub buy_list: Mutex<Vec<BuyListItem>>,
    pub usage: Mutex<Vec<UsageEntry>>,
    pub medicines: Mutex<Vec<String>>,
    /// `None` makes `log_usage` fail at the transport level.
    pub log_reply: Mutex<Option<LogUsageReply>>,
    pub logged: Mutex<Vec<String>>,
    pub restocked: Mutex<Vec<(String, u32)>>,
    pub stock_calls: AtomicUsize,
    pub suggest_calls: AtomicUsize,
}

impl FakeInventory {
    pub fn with_suggestions(query: &str, names: &[&str]) -> Self {
        let fake = Self::default();
        fake.set_suggestions(query, names);
        fake
    }

    pub fn set_suggestions(&self, query: &str, names: &[&str]) {
        let items = names
            .iter()
            .enumerate()
            .map(|(i, name)| SuggestionItem {
                id: i as i64,
                name: (*name).to_owned(),
            })
            .collect();
        self.suggestions
            .lock()
            .expect("lock")
            .insert(query.to_owned(), items);
    }

    pub fn accept_logs(&self, message: &str) {
        *self.log_reply.lock().expect("lock") = Some(LogUsageReply {
            success: true,
            message: Some(message.to_owned()),
        });
    }
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn stock_summary(&self) -> ApiResult<Vec<StockRecord>> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(self.stock.lock().expect("lock").clone())
    }

    async fn forecast(&self) -> ApiResult<Vec<ForecastAlert>> {
        Ok(self.forecast.lock().expect("lock").clone())
    }

    async fn buy_list(&self) -> ApiResult<Vec<BuyListItem>> {
        Ok(self.buy_list.lock().expect("lock").clone())
    }

    async fn usage_log(&self) -> ApiResult<Vec<UsageEntry>> {
        Ok(self.usage.lock().expect("lock").clone())
    }

    async fn suggest(&self, query: &str) -> ApiResult<Vec<SuggestionItem>> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_suggestions.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(self
            .suggestions
            .lock()
            .expect("lock")
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn log_usage(&self, request: &LogUsageRequest) -> ApiResult<LogUsageReply> {
        self.logged.lock().expect("lock").push(request.text.clone());
        self.log_reply.lock().expect("lock").clone().ok_or_else(offline)
    }

    async fn restockable_medicines(&self) -> ApiResult<Vec<String>> {
        Ok(self.medicines.lock().expect("lock").clone())
    }

    async fn restock(&self, form: &RestockForm) -> ApiResult<()> {
        self.restocked
            .lock()
            .expect("lock")
            .push((form.medicine.to_string(), form.quantity.millilitres()));
        Ok(())
    }
}

/// Speech source that replays a fixed list of results.
pub(crate) struct ScriptedRecogniser {
    available: bool,
    results: Mutex<VecDeque<Result<String, RecognitionError>>>,
}

impl ScriptedRecogniser {
    pub fn saying(utterances: &[&str]) -> Self {
        Self {
            available: true,
            results: Mutex::new(utterances.iter().map(|u| Ok((*u).to_owned())).collect()),
        }
    }

    pub fn failing(error: RecognitionError) -> Self {
        Self {
            available: true,
            results: Mutex::new(VecDeque::from([Err(error)])),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            results: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl SpeechRecogniser for ScriptedRecogniser {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn recognise(&self) -> Result<String, RecognitionError> {
        self.results
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Err(RecognitionError::NoSpeech))
    }
}
