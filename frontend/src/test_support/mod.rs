#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::{Transaction, User};
    use chrono::{TimeZone, Utc};

    pub fn verified_user() -> User {
        User {
            id: 1,
            name: "Alice Example".into(),
            email: "alice@example.com".into(),
            email_verified_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).single(),
            balance: Some("150.00".into()),
        }
    }

    pub fn unverified_user() -> User {
        User {
            email_verified_at: None,
            ..verified_user()
        }
    }

    pub fn transaction(id: Option<i64>) -> Transaction {
        Transaction {
            id,
            sender_id: 1,
            receiver_id: 2,
            amount: "25.00".into(),
            commission_fee: "0.38".into(),
            sender_name: Some("Alice Example".into()),
            receiver_name: Some("Bob Example".into()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).single(),
        }
    }
}
