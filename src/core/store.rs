use crate::core::client::Client;
use crate::core::flatten::flatten_orders;
use crate::core::intervals::{date_intervals, DateInterval};
use crate::domain::model::{OrderTables, StoreId, StoreRecord};
use crate::utils::error::{BrightloomError, Result};
use chrono::{Duration, NaiveDate};
use serde_json::Value;

pub const DEFAULT_CHUNK_DAYS: u32 = 30;

/// One store location, borrowing the client session it was listed from.
#[derive(Debug)]
pub struct Store<'a> {
    client: &'a Client,
    record: StoreRecord,
}

impl<'a> Store<'a> {
    pub fn new(record: StoreRecord, client: &'a Client) -> Self {
        Self { client, record }
    }

    pub fn id(&self) -> &StoreId {
        &self.record.id
    }

    pub fn record(&self) -> &StoreRecord {
        &self.record
    }

    /// Fetch this store's orders created between `start` and `end`, both
    /// inclusive at day granularity, and flatten them into related tables.
    /// Without `end` the range covers the single day `start`. The chunk size
    /// comes from the client (30 days unless configured otherwise).
    pub async fn get_orders(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<OrderTables> {
        self.get_orders_with_chunk_size(start, end, self.client.default_chunk_days())
            .await
    }

    /// Same as [`get_orders`](Self::get_orders), fetching the range in
    /// sub-ranges of at most `chunk_days` days each.
    pub async fn get_orders_with_chunk_size(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
        chunk_days: u32,
    ) -> Result<OrderTables> {
        let end = end.unwrap_or(start);
        if end < start {
            return Err(BrightloomError::ValidationError {
                message: format!("end date {} must not precede start date {}", end, start),
            });
        }

        let intervals = date_intervals(start, end, chunk_days)?;
        let url = format!("{}/order-analytics", self.client.base_url());

        tracing::info!(
            "Fetching orders for store {} across {} chunk(s)",
            self.record.id,
            intervals.len()
        );

        let mut orders: Vec<Value> = Vec::new();
        for interval in &intervals {
            let params = self.order_params(interval);
            let pages = self.client.get_paginated(&url, &params).await?;

            for page in pages {
                let page_orders = page.get("orders").and_then(Value::as_array).ok_or_else(
                    || BrightloomError::MissingFieldError {
                        field: "orders".to_string(),
                        context: "order-analytics response".to_string(),
                    },
                )?;
                orders.extend(page_orders.iter().cloned());
            }
        }

        tracing::info!("Fetched {} orders for store {}", orders.len(), self.record.id);

        flatten_orders(&orders)
    }

    // Upstream created_at filters are exclusive on both sides, so the
    // inclusive chunk [start, end] goes out as (start - 1 day, end + 1 day).
    fn order_params(&self, interval: &DateInterval) -> Vec<(&'static str, String)> {
        let after = interval.start - Duration::days(1);
        let before = interval.end + Duration::days(1);

        vec![
            ("store_id", self.record.id.to_string()),
            ("created_at_after", after.format("%Y-%m-%d").to_string()),
            ("created_at_before", before.format("%Y-%m-%d").to_string()),
        ]
    }
}
