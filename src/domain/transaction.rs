//! Transaction types
//!
//! Aggregator transactions and transfer records, both flattened into the
//! single `Transaction` view the history page renders.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money movement relative to the viewed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Debit,
    Credit,
}

/// Transaction view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub payment_channel: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub account_id: String,
    pub amount: Decimal,
    pub pending: bool,
    pub category: String,
    pub date: NaiveDate,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalFinanceCategory {
    pub primary: String,
}

/// Transaction as reported by the aggregator
///
/// Positive amounts move money out of the account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregatedTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub name: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub payment_channel: String,
    #[serde(default)]
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    #[serde(default)]
    pub category: Option<Vec<String>>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl From<AggregatedTransaction> for Transaction {
    fn from(t: AggregatedTransaction) -> Self {
        let category = t
            .personal_finance_category
            .map(|c| c.primary)
            .or_else(|| t.category.and_then(|c| c.into_iter().next()))
            .unwrap_or_default();

        let transaction_type = if t.amount > Decimal::ZERO {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        };

        Self {
            id: t.transaction_id,
            name: t.merchant_name.unwrap_or(t.name),
            payment_channel: t.payment_channel,
            transaction_type,
            account_id: t.account_id,
            amount: t.amount,
            pending: t.pending,
            category,
            date: t.date,
            image: t.logo_url,
        }
    }
}

/// Transfer record from the transaction collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub category: String,
    pub sender_bank_id: String,
    pub receiver_bank_id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// View of this transfer from the side of `bank_id`
    pub fn to_transaction(&self, bank_id: &str) -> Transaction {
        let transaction_type = if self.sender_bank_id == bank_id {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        };

        Transaction {
            id: self.id.clone(),
            name: self.name.clone(),
            payment_channel: self.channel.clone(),
            transaction_type,
            account_id: bank_id.to_string(),
            amount: self.amount,
            pending: false,
            category: self.category.clone(),
            date: self.created_at.date_naive(),
            image: None,
        }
    }
}

/// Sort newest first; ties keep their original order
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn aggregated(amount: Decimal) -> AggregatedTransaction {
        serde_json::from_value(serde_json::json!({
            "transaction_id": "tx-1",
            "account_id": "acc-1",
            "amount": amount.to_string().parse::<f64>().unwrap(),
            "name": "UNITED AIRLINES 123",
            "merchant_name": "United Airlines",
            "date": "2024-03-01",
            "pending": false,
            "payment_channel": "in store",
            "personal_finance_category": { "primary": "TRAVEL" },
            "category": ["Travel", "Airlines"],
            "logo_url": null
        }))
        .unwrap()
    }

    #[test]
    fn test_outflow_is_debit() {
        let tx = Transaction::from(aggregated(dec!(500)));
        assert_eq!(tx.transaction_type, TransactionType::Debit);
        assert_eq!(tx.name, "United Airlines");
        assert_eq!(tx.category, "TRAVEL");
    }

    #[test]
    fn test_inflow_is_credit() {
        let tx = Transaction::from(aggregated(dec!(-4.22)));
        assert_eq!(tx.transaction_type, TransactionType::Credit);
        assert_eq!(tx.amount, dec!(-4.22));
    }

    #[test]
    fn test_legacy_category_fallback() {
        let mut raw = aggregated(dec!(1));
        raw.personal_finance_category = None;
        let tx = Transaction::from(raw);
        assert_eq!(tx.category, "Travel");
    }

    #[test]
    fn test_transfer_direction_depends_on_side() {
        let record: TransferRecord = serde_json::from_value(serde_json::json!({
            "$id": "t-1",
            "name": "Rent",
            "amount": "750.00",
            "channel": "online",
            "category": "Transfer",
            "senderBankId": "bank-a",
            "receiverBankId": "bank-b",
            "$createdAt": "2024-04-02T10:00:00.000+00:00"
        }))
        .unwrap();

        let sent = record.to_transaction("bank-a");
        let received = record.to_transaction("bank-b");

        assert_eq!(sent.transaction_type, TransactionType::Debit);
        assert_eq!(received.transaction_type, TransactionType::Credit);
        assert_eq!(sent.amount, dec!(750.00));
        assert_eq!(sent.date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut older = Transaction::from(aggregated(dec!(1)));
        older.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let newer = Transaction::from(aggregated(dec!(2)));

        let mut list = vec![older.clone(), newer.clone()];
        sort_newest_first(&mut list);
        assert_eq!(list, vec![newer, older]);
    }
}
