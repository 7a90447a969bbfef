//! Append-only log of saved invoices.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::db::Storage;
use crate::models::Invoice;

/// Storage key holding the whole history as a JSON array.
pub const STORAGE_KEY: &str = "invoiceHistoryDB";

/// Saved invoices in the order they were saved.
pub struct HistoryStore<S> {
    storage: S,
    invoices: Vec<Invoice>,
    /// Stored records that did not decode, with their position in the array.
    /// Written back untouched on every save.
    unreadable: Vec<(usize, Value)>,
}

/// One element of the stored array.
#[derive(Serialize)]
#[serde(untagged)]
enum StoredRecord<'a> {
    Invoice(&'a Invoice),
    Unreadable(&'a Value),
}

impl<S: Storage> HistoryStore<S> {
    /// Reads the stored history.
    ///
    /// A missing key, a storage read failure or a value that is not a JSON
    /// array all give an empty history; the latter two are logged and
    /// otherwise ignored. Single records that do not decode are logged and
    /// set aside without affecting the rest.
    pub async fn load(storage: S) -> Self {
        let (invoices, unreadable) = match storage.get(STORAGE_KEY).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(error = %err, "discarding unreadable invoice history");
                    (Vec::new(), Vec::new())
                }
            },
            Ok(None) => (Vec::new(), Vec::new()),
            Err(err) => {
                warn!(error = %err, "could not read invoice history");
                (Vec::new(), Vec::new())
            }
        };
        info!(
            count = invoices.len(),
            skipped = unreadable.len(),
            "invoice history loaded"
        );

        Self {
            storage,
            invoices,
            unreadable,
        }
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Invoices from the most recently saved to the oldest.
    pub fn recent_first(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter().rev()
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id == id)
    }

    /// Time-based id for a new invoice, kept above every stored id.
    pub fn next_invoice_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.invoices.iter().map(|invoice| invoice.id).max() {
            Some(last) if last >= candidate => last.saturating_add(1),
            _ => candidate,
        }
    }

    /// Adds `invoice` and rewrites the stored history.
    ///
    /// If the write fails the invoice is dropped again, so memory never
    /// holds invoices the storage does not.
    pub async fn append(&mut self, invoice: Invoice) -> Result<()> {
        let id = invoice.id;
        if !invoice.summary.is_finite() {
            bail!("invoice {id} has totals that cannot be stored");
        }
        self.invoices.push(invoice);

        if let Err(err) = self.persist().await {
            self.invoices.pop();
            return Err(err);
        }
        info!(id, count = self.invoices.len(), "invoice saved");

        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let mut records: Vec<StoredRecord> = self.invoices.iter().map(StoredRecord::Invoice).collect();
        for (index, record) in &self.unreadable {
            records.insert((*index).min(records.len()), StoredRecord::Unreadable(record));
        }

        let raw = serde_json::to_string(&records)?;
        self.storage.set(STORAGE_KEY, &raw).await
    }
}

/// Splits the stored array into decodable invoices and the raw records that
/// are not.
fn decode(raw: &str) -> serde_json::Result<(Vec<Invoice>, Vec<(usize, Value)>)> {
    let records: Vec<Value> = serde_json::from_str(raw)?;
    let mut invoices = Vec::with_capacity(records.len());
    let mut unreadable = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match Invoice::deserialize(&record) {
            Ok(invoice) => invoices.push(invoice),
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable invoice record");
                unreadable.push((index, record));
            }
        }
    }

    Ok((invoices, unreadable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::{LineItem, PricingSummary};
    use crate::pricing::summarize;
    use chrono::TimeZone;

    fn invoice(id: i64) -> Invoice {
        let items = vec![LineItem {
            id: 1,
            name: "Widget".to_string(),
            unit_price: 10.0,
            quantity: 2,
        }];
        let summary = summarize(&items);
        Invoice::new(id, Utc.timestamp_millis_opt(id).unwrap(), items, summary)
    }

    #[tokio::test]
    async fn empty_storage_loads_empty_history() {
        let history = HistoryStore::load(MemoryStorage::new()).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn corrupt_storage_loads_empty_history() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "{not json").await.unwrap();

        let history = HistoryStore::load(storage).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn append_persists_whole_collection() {
        let storage = MemoryStorage::new();
        let mut history = HistoryStore::load(storage.clone()).await;
        history.append(invoice(1_000)).await.unwrap();
        history.append(invoice(2_000)).await.unwrap();

        let reloaded = HistoryStore::load(storage).await;
        assert_eq!(reloaded.invoices(), history.invoices());
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("read-only"))
        }
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let mut history = HistoryStore::load(ReadOnlyStorage).await;
        assert!(history.append(invoice(1_000)).await.is_err());
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn find_by_id_and_order() {
        let mut history = HistoryStore::load(MemoryStorage::new()).await;
        history.append(invoice(1_000)).await.unwrap();
        history.append(invoice(2_000)).await.unwrap();

        assert_eq!(history.find_by_id(2_000).map(|i| i.id), Some(2_000));
        assert!(history.find_by_id(3_000).is_none());

        let order: Vec<i64> = history.recent_first().map(|i| i.id).collect();
        assert_eq!(order, vec![2_000, 1_000]);
    }

    #[tokio::test]
    async fn next_id_stays_unique_within_a_millisecond() {
        let mut history = HistoryStore::load(MemoryStorage::new()).await;
        let now = Utc.timestamp_millis_opt(5_000).unwrap();

        let first = history.next_invoice_id(now);
        history.append(invoice(first)).await.unwrap();
        let second = history.next_invoice_id(now);

        assert_eq!(first, 5_000);
        assert_eq!(second, 5_001);
    }

    #[tokio::test]
    async fn next_id_saturates_at_the_largest_stored_id() {
        let storage = MemoryStorage::new();
        let mut last = invoice(1_000);
        last.id = i64::MAX;
        let raw = serde_json::to_string(&[last]).unwrap();
        storage.set(STORAGE_KEY, &raw).await.unwrap();

        let history = HistoryStore::load(storage).await;
        assert_eq!(history.next_invoice_id(Utc::now()), i64::MAX);
    }

    #[tokio::test]
    async fn non_finite_totals_are_never_written() {
        let storage = MemoryStorage::new();
        let mut history = HistoryStore::load(storage.clone()).await;
        history.append(invoice(1_000)).await.unwrap();

        let items = vec![LineItem {
            id: 1,
            name: "Huge".to_string(),
            unit_price: 1e308,
            quantity: 2,
        }];
        let summary = summarize(&items);
        assert!(!summary.is_finite());
        let huge = Invoice::new(2_000, Utc.timestamp_millis_opt(2_000).unwrap(), items, summary);

        assert!(history.append(huge).await.is_err());
        assert_eq!(history.len(), 1);

        let reloaded = HistoryStore::load(storage).await;
        assert_eq!(reloaded.invoices(), history.invoices());
    }

    #[tokio::test]
    async fn unreadable_records_do_not_hide_the_rest() {
        let raw = r#"[{"id":1000,"date":"2024-06-10T06:13:20.000Z",
            "products":[{"id":1,"name":"Widget","price":10,"quantity":2}],
            "subtotal":20,"discount":1,"iva":3.61,"total":22.61},
            {"id":2000,"date":"2024-06-10T06:15:00.000Z",
            "products":[{"id":1,"name":"Rope","price":4,"quantity":1.5}],
            "subtotal":6,"discount":0.3,"iva":1.083,"total":6.783},
            {"id":3000,"date":"2024-06-10T06:20:00.000Z",
            "products":[{"id":1,"name":"Bolt","price":1,"quantity":3}],
            "subtotal":null,"discount":null,"iva":null,"total":null}]"#;
        let storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, raw).await.unwrap();

        let mut history = HistoryStore::load(storage.clone()).await;
        let ids: Vec<i64> = history.invoices().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1000]);

        // A later save keeps the set-aside records in place.
        history.append(invoice(4_000)).await.unwrap();
        let stored = storage.get(STORAGE_KEY).await.unwrap().unwrap();
        let records: Vec<Value> = serde_json::from_str(&stored).unwrap();
        let stored_ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(stored_ids, vec![1000, 2000, 3000, 4_000]);
        assert_eq!(records[1]["products"][0]["quantity"], 1.5);

        let reloaded = HistoryStore::load(storage).await;
        assert_eq!(reloaded.invoices(), history.invoices());
    }

    #[test]
    fn record_uses_stored_field_names() {
        let invoice = Invoice::new(
            7,
            Utc.timestamp_millis_opt(7).unwrap(),
            vec![LineItem {
                id: 1,
                name: "Widget".to_string(),
                unit_price: 10.0,
                quantity: 2,
            }],
            PricingSummary {
                subtotal: 20.0,
                discount: 1.0,
                tax: 3.61,
                total: 22.61,
            },
        );
        let value = serde_json::to_value(&invoice).unwrap();

        assert_eq!(value["products"][0]["price"], 10.0);
        assert_eq!(value["iva"], 3.61);
        assert_eq!(value["total"], 22.61);
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn reads_records_written_by_the_browser_version() {
        let raw = r#"[{"id":1718000000000,"date":"2024-06-10T06:13:20.000Z",
            "products":[{"id":1,"name":"Widget","price":10,"quantity":2}],
            "subtotal":20,"discount":1,"iva":3.61,"total":22.61}]"#;
        let invoices: Vec<Invoice> = serde_json::from_str(raw).unwrap();

        assert_eq!(invoices[0].line_items[0].unit_price, 10.0);
        assert_eq!(invoices[0].summary.tax, 3.61);
    }
}
