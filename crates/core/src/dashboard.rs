//! Read-side dashboard operations and the restock form.
//!
//! Each operation performs one backend call, logs a failure where it happens and returns it
//! as an [`IntakeError`] for the caller to show as a notice.

use crate::api::InventoryApi;
use crate::constants::RESTOCK_INCOMPLETE_MESSAGE;
use crate::stock::{DashboardStats, SeverityTier, StockThresholds};
use crate::views::{BuyListRow, ForecastRow, HistoryRow, StockCard};
use crate::{IntakeError, IntakeResult};
use medtrack_types::{NonEmptyText, QuantityError, RestockQuantity};
use medtrack_wire::RestockForm;

pub struct Dashboard<'a, A: ?Sized> {
    api: &'a A,
    thresholds: StockThresholds,
}

impl<'a, A> Dashboard<'a, A>
where
    A: InventoryApi + ?Sized,
{
    pub fn new(api: &'a A, thresholds: StockThresholds) -> Self {
        Self { api, thresholds }
    }

    /// Counters for the dashboard header.
    pub async fn stats(&self) -> IntakeResult<DashboardStats> {
        let records = self.api.stock_summary().await.map_err(|e| {
            tracing::error!("failed to fetch stats: {e}");
            IntakeError::Transport(e)
        })?;
        Ok(DashboardStats::from_records(&records, &self.thresholds))
    }

    pub async fn stock_cards(&self) -> IntakeResult<Vec<StockCard>> {
        let records = self.api.stock_summary().await.map_err(|e| {
            tracing::error!("failed to fetch stock data: {e}");
            IntakeError::Transport(e)
        })?;
        Ok(records
            .iter()
            .map(|record| StockCard::from_record(record, &self.thresholds))
            .collect())
    }

    pub async fn forecast(&self) -> IntakeResult<Vec<ForecastRow>> {
        let alerts = self.api.forecast().await.map_err(|e| {
            tracing::error!("failed to fetch forecast: {e}");
            IntakeError::Transport(e)
        })?;
        Ok(alerts.into_iter().map(ForecastRow::from).collect())
    }

    pub async fn buy_list(&self) -> IntakeResult<Vec<BuyListRow>> {
        let items = self.api.buy_list().await.map_err(|e| {
            tracing::error!("failed to fetch buy list: {e}");
            IntakeError::Transport(e)
        })?;
        Ok(items
            .into_iter()
            .map(|item| {
                if SeverityTier::from_colour(&item.colour).is_none() {
                    tracing::warn!(
                        medicine = %item.medicine,
                        colour = item.colour.as_str(),
                        "unrecognised buy list colour; listed as low priority"
                    );
                }
                BuyListRow::from(item)
            })
            .collect())
    }

    pub async fn history(&self) -> IntakeResult<Vec<HistoryRow>> {
        let entries = self.api.usage_log().await.map_err(|e| {
            tracing::error!("failed to fetch usage logs: {e}");
            IntakeError::Transport(e)
        })?;
        Ok(entries.into_iter().map(|entry| HistoryRow { entry }).collect())
    }

    pub async fn restockable_medicines(&self) -> IntakeResult<Vec<String>> {
        self.api.restockable_medicines().await.map_err(|e| {
            tracing::error!("failed to fetch medicines: {e}");
            IntakeError::Transport(e)
        })
    }

    /// Validate and submit the restock form. Returns the success message.
    ///
    /// # Errors
    ///
    /// `Validation` when the medicine or quantity is missing or malformed (nothing is sent),
    /// `Transport` when the backend call fails.
    pub async fn restock(&self, medicine: &str, quantity: &str) -> IntakeResult<String> {
        let form = restock_form(medicine, quantity)?;

        self.api.restock(&form).await.map_err(|e| {
            tracing::error!(medicine = %form.medicine, "failed to restock: {e}");
            IntakeError::Transport(e)
        })?;

        tracing::info!(medicine = %form.medicine, quantity = %form.quantity, "restocked");
        Ok(format!(
            "{}ml of {} restocked successfully",
            form.quantity, form.medicine
        ))
    }
}

fn restock_form(medicine: &str, quantity: &str) -> IntakeResult<RestockForm> {
    let incomplete = || IntakeError::Validation(RESTOCK_INCOMPLETE_MESSAGE.into());

    let medicine = NonEmptyText::new(medicine).map_err(|_| incomplete())?;
    let quantity = RestockQuantity::parse(quantity).map_err(|e| match e {
        QuantityError::Missing => incomplete(),
        other => IntakeError::Validation(other.to_string()),
    })?;

    Ok(RestockForm { medicine, quantity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastReason;
    use crate::testing::FakeInventory;
    use medtrack_wire::{BuyListItem, Colour, ForecastAlert, StockRecord};
    use std::sync::atomic::Ordering;

    fn record(medicine: &str, remaining: f64) -> StockRecord {
        StockRecord {
            medicine: medicine.into(),
            remaining,
            depletion: None,
        }
    }

    #[tokio::test]
    async fn stats_use_configured_thresholds() {
        let api = FakeInventory::default();
        *api.stock.lock().expect("lock") = vec![record("a", 12.0), record("b", 18.0), record("c", 60.0)];

        let default_stats = Dashboard::new(&api, StockThresholds::default())
            .stats()
            .await
            .expect("stats");
        assert_eq!(default_stats.critical_stock, 2);

        let strict = StockThresholds::new(10.0, 15.0, 20.0).expect("thresholds");
        let custom = Dashboard::new(&api, strict).stats().await.expect("stats");
        assert_eq!(custom.critical_stock, 0);
        assert_eq!(custom.low_stock, 2);
        assert_eq!(custom.good_stock, 1);
        assert_eq!(custom.total_medicines, 3);
    }

    #[tokio::test]
    async fn stats_failure_is_transport_error() {
        let api = FakeInventory::default();
        api.fail_stock.store(true, Ordering::SeqCst);
        let err = Dashboard::new(&api, StockThresholds::default())
            .stats()
            .await
            .expect_err("should fail");
        assert!(matches!(err, IntakeError::Transport(_)));
    }

    #[tokio::test]
    async fn forecast_rows_are_assessed() {
        let api = FakeInventory::default();
        *api.forecast.lock().expect("lock") = vec![ForecastAlert {
            medicine: "saline".into(),
            text: "already depleted".into(),
        }];
        let rows = Dashboard::new(&api, StockThresholds::default())
            .forecast()
            .await
            .expect("forecast");
        assert_eq!(rows[0].assessment.reason, ForecastReason::AlreadyDepleted);
    }

    #[tokio::test]
    async fn buy_list_keeps_backend_order() {
        let api = FakeInventory::default();
        *api.buy_list.lock().expect("lock") = vec![
            BuyListItem {
                medicine: "x".into(),
                remaining: 5.0,
                colour: Colour::Red,
            },
            BuyListItem {
                medicine: "y".into(),
                remaining: 35.0,
                colour: Colour::Yellow,
            },
        ];
        let rows = Dashboard::new(&api, StockThresholds::default())
            .buy_list()
            .await
            .expect("buy list");
        let priorities: Vec<_> = rows.iter().map(BuyListRow::priority).collect();
        assert_eq!(priorities, ["Critical", "Medium"]);
    }

    #[tokio::test]
    async fn buy_list_unknown_colour_is_low_priority() {
        let api = FakeInventory::default();
        *api.buy_list.lock().expect("lock") = vec![BuyListItem {
            medicine: "z".into(),
            remaining: 3.0,
            colour: Colour::Other("purple".into()),
        }];
        let rows = Dashboard::new(&api, StockThresholds::default())
            .buy_list()
            .await
            .expect("buy list");
        assert_eq!(rows[0].priority(), "Low");
        assert_eq!(rows[0].tier(), None);
    }

    #[tokio::test]
    async fn restock_posts_validated_form() {
        let api = FakeInventory::default();
        let message = Dashboard::new(&api, StockThresholds::default())
            .restock("betadine", "25")
            .await
            .expect("restock");
        assert_eq!(message, "25ml of betadine restocked successfully");
        assert_eq!(
            *api.restocked.lock().expect("lock"),
            vec![("betadine".to_string(), 25)]
        );
    }

    #[tokio::test]
    async fn restock_rejects_incomplete_form_without_calling_backend() {
        let api = FakeInventory::default();
        let dashboard = Dashboard::new(&api, StockThresholds::default());

        for (medicine, quantity) in [("", "5"), ("betadine", ""), ("  ", "  ")] {
            let err = dashboard
                .restock(medicine, quantity)
                .await
                .expect_err("incomplete form");
            match err {
                IntakeError::Validation(msg) => assert_eq!(msg, RESTOCK_INCOMPLETE_MESSAGE),
                other => panic!("expected Validation error, got {other:?}"),
            }
        }

        let err = dashboard.restock("betadine", "0").await.expect_err("zero");
        assert!(matches!(err, IntakeError::Validation(_)));
        assert!(api.restocked.lock().expect("lock").is_empty());
    }
}
