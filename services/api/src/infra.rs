use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use transaction_risk::analytics::{
    AnalysisResult, AnalyticsStore, StoreError, StoredResult, Transaction, TransactionKind, User,
    UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded map store standing in for the production database.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalyticsStore {
    users: Arc<Mutex<Vec<User>>>,
    transactions: Arc<Mutex<HashMap<UserId, Vec<Transaction>>>>,
    results: Arc<Mutex<HashMap<UserId, Vec<StoredResult>>>>,
}

impl InMemoryAnalyticsStore {
    pub(crate) fn with_demo_fixtures() -> Self {
        let store = Self::default();
        let user = demo_user();
        store
            .transactions
            .lock()
            .expect("store mutex poisoned")
            .insert(user.id.clone(), demo_history(6));
        store.users.lock().expect("store mutex poisoned").push(user);
        store
    }
}

impl AnalyticsStore for InMemoryAnalyticsStore {
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
        self.results
            .lock()
            .expect("store mutex poisoned")
            .entry(user_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn latest_result(&self, user_id: &UserId) -> Result<Option<StoredResult>, StoreError> {
        let results = self.results.lock().expect("store mutex poisoned");
        Ok(results.get(user_id).and_then(|rows| rows.last()).cloned())
    }
}

pub(crate) fn demo_user() -> User {
    User {
        id: UserId("demo-user".to_string()),
        name: "Demo Account Holder".to_string(),
        account_no: "1234567890".to_string(),
        ifsc_code: "DEMO0001234".to_string(),
    }
}

/// Deterministic sample history: steady salary, essential-heavy spending,
/// a little discretionary weekend activity, dated relative to now so it
/// always falls inside the analysis window.
pub(crate) fn demo_history(months: u32) -> Vec<Transaction> {
    let mut history = Vec::new();
    for month in 0..months.min(6) as i64 {
        let anchor = Utc::now() - Duration::days(month * 30 + 5);
        let entry = |offset: i64, amount: f64, kind: TransactionKind, category: &str| Transaction {
            date: anchor - Duration::days(offset),
            description: format!("{category} payment"),
            amount,
            kind,
            category: category.to_string(),
            channel: Some("upi".to_string()),
        };

        history.push(entry(0, 52_000.0, TransactionKind::Credit, "salary"));
        history.push(entry(1, 15_000.0, TransactionKind::Debit, "rent"));
        history.push(entry(3, 4_200.0, TransactionKind::Debit, "groceries"));
        history.push(entry(6, 2_000.0, TransactionKind::Debit, "utilities"));
        history.push(entry(9, 1_500.0, TransactionKind::Debit, "fuel"));
        history.push(entry(12, 2_400.0, TransactionKind::Debit, "entertainment"));
        history.push(entry(15, 1_800.0, TransactionKind::Debit, "restaurant"));
    }
    history
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use transaction_risk::analytics::{NotifyError, ResultNotifier, WebhookPayload};

    #[derive(Default, Clone)]
    pub(crate) struct RecordingNotifier {
        deliveries: Arc<Mutex<Vec<(String, WebhookPayload)>>>,
    }

    impl RecordingNotifier {
        pub(crate) fn deliveries(&self) -> Vec<(String, WebhookPayload)> {
            self.deliveries
                .lock()
                .expect("notifier mutex poisoned")
                .clone()
        }
    }

    impl ResultNotifier for RecordingNotifier {
        async fn deliver(
            &self,
            endpoint: &str,
            payload: &WebhookPayload,
        ) -> Result<(), NotifyError> {
            self.deliveries
                .lock()
                .expect("notifier mutex poisoned")
                .push((endpoint.to_string(), payload.clone()));
            Ok(())
        }
    }
}
