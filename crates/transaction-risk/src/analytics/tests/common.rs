use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::analytics::domain::{AnalysisResult, Transaction, TransactionKind, User, UserId};
use crate::analytics::notify::{NotifyError, ResultNotifier, WebhookPayload};
use crate::analytics::store::{AnalyticsStore, StoreError, StoredResult};
use crate::analytics::AnalysisService;

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid date")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

fn tx(kind: TransactionKind, date: DateTime<Utc>, amount: f64, category: &str) -> Transaction {
    Transaction {
        date,
        description: format!("{category} {amount}"),
        amount,
        kind,
        category: category.to_string(),
        channel: None,
    }
}

pub(super) fn credit(date: DateTime<Utc>, amount: f64, category: &str) -> Transaction {
    tx(TransactionKind::Credit, date, amount, category)
}

pub(super) fn debit(date: DateTime<Utc>, amount: f64, category: &str) -> Transaction {
    tx(TransactionKind::Debit, date, amount, category)
}

/// Three steady months: salary in, mostly essential spending, modest
/// discretionary weekend spending.
pub(super) fn steady_history() -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for month in 1..=3u32 {
        transactions.push(credit(at(2024, month, 1), 5000.0, "salary"));
        transactions.push(debit(at(2024, month, 3), 1200.0, "rent"));
        transactions.push(debit(at(2024, month, 8), 600.0, "groceries"));
        transactions.push(debit(at(2024, month, 12), 300.0, "utilities"));
        // 2024-01-06, 2024-02-03, 2024-03-02 are all Saturdays.
        let weekend_day = match month {
            1 => 6,
            2 => 3,
            _ => 2,
        };
        transactions.push(debit(at(2024, month, weekend_day), 200.0, "entertainment"));
    }
    transactions
}

/// A recent two-month history, dated relative to now so it always falls
/// inside the analysis window.
pub(super) fn recent_history() -> Vec<Transaction> {
    vec![
        credit(days_ago(55), 5000.0, "salary"),
        debit(days_ago(50), 1500.0, "rent"),
        debit(days_ago(45), 700.0, "groceries"),
        credit(days_ago(25), 5000.0, "salary"),
        debit(days_ago(20), 1500.0, "rent"),
        debit(days_ago(15), 700.0, "groceries"),
    ]
}

pub(super) fn sample_user() -> User {
    User {
        id: UserId("user-001".to_string()),
        name: "Asha".to_string(),
        account_no: "1234567890".to_string(),
        ifsc_code: "TEST0000001".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) users: Arc<Mutex<Vec<User>>>,
    pub(super) transactions: Arc<Mutex<HashMap<UserId, Vec<Transaction>>>>,
    pub(super) results: Arc<Mutex<HashMap<UserId, Vec<StoredResult>>>>,
}

impl MemoryStore {
    pub(super) fn seeded(user: User, transactions: Vec<Transaction>) -> Self {
        let store = Self::default();
        store
            .transactions
            .lock()
            .expect("store mutex poisoned")
            .insert(user.id.clone(), transactions);
        store.users.lock().expect("store mutex poisoned").push(user);
        store
    }
}

impl AnalyticsStore for MemoryStore {
    fn find_user(&self, account_no: &str, ifsc_code: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("store mutex poisoned");
        Ok(users
            .iter()
            .find(|user| user.account_no == account_no && user.ifsc_code == ifsc_code)
            .cloned())
    }

    fn list_transactions(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        let transactions = self.transactions.lock().expect("store mutex poisoned");
        Ok(transactions
            .get(user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|transaction| transaction.date >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn save_result(
        &self,
        user_id: &UserId,
        result: &AnalysisResult,
    ) -> Result<StoredResult, StoreError> {
        let stored = StoredResult::from_analysis(user_id.clone(), result);
        let mut results = self.results.lock().expect("store mutex poisoned");
        results
            .entry(user_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn latest_result(&self, user_id: &UserId) -> Result<Option<StoredResult>, StoreError> {
        let results = self.results.lock().expect("store mutex poisoned");
        Ok(results
            .get(user_id)
            .and_then(|rows| rows.last())
            .cloned())
    }
}

pub(super) struct UnavailableStore;

impl AnalyticsStore for UnavailableStore {
    fn find_user(&self, _: &str, _: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn list_transactions(
        &self,
        _: &UserId,
        _: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn save_result(&self, _: &UserId, _: &AnalysisResult) -> Result<StoredResult, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn latest_result(&self, _: &UserId) -> Result<Option<StoredResult>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    deliveries: Arc<Mutex<Vec<(String, WebhookPayload)>>>,
}

impl MemoryNotifier {
    pub(super) fn deliveries(&self) -> Vec<(String, WebhookPayload)> {
        self.deliveries.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ResultNotifier for MemoryNotifier {
    async fn deliver(&self, endpoint: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        self.deliveries
            .lock()
            .expect("notifier mutex poisoned")
            .push((endpoint.to_string(), payload.clone()));
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl ResultNotifier for FailingNotifier {
    async fn deliver(&self, _: &str, _: &WebhookPayload) -> Result<(), NotifyError> {
        Err(NotifyError::Upstream(503))
    }
}

pub(super) fn build_service(
    webhook_url: Option<String>,
) -> (
    Arc<AnalysisService<MemoryStore, MemoryNotifier>>,
    MemoryStore,
    MemoryNotifier,
) {
    let store = MemoryStore::seeded(sample_user(), recent_history());
    let notifier = MemoryNotifier::default();
    let service = Arc::new(AnalysisService::new(
        Arc::new(store.clone()),
        Arc::new(notifier.clone()),
        180,
        webhook_url,
    ));
    (service, store, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
