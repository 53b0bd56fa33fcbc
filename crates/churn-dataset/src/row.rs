//! One historical customer observation

use churn_core::{
    AccountType, ChurnLabel, CustomerRecord, Gender, InvalidInput, Location, SmsAlerts,
};
use serde::{Deserialize, Serialize};

/// A row of the historical dataset
///
/// Categorical columns keep their user-facing labels so exports read the
/// same as the source file. `churn` is the observed outcome; only the
/// 0/1 codes of [`ChurnLabel`] decode, anything else fails the row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub age: u32,
    pub gender: String,
    pub location: String,
    pub account_type: String,
    pub transactions_last_30d: u32,
    pub avg_transaction_value: f64,
    pub failed_transactions: u32,
    pub sms_alerts: String,
    pub complaints_logged: u32,
    pub customer_tenure_months: u32,
    pub churn: ChurnLabel,
}

impl DatasetRow {
    pub fn churned(&self) -> bool {
        self.churn == ChurnLabel::Churn
    }

    /// Convert to a validated record, e.g. for re-scoring against the
    /// current model
    pub fn to_record(&self) -> Result<CustomerRecord, InvalidInput> {
        Ok(CustomerRecord {
            age: self.age,
            gender: self.gender.parse::<Gender>()?,
            location: self.location.parse::<Location>()?,
            account_type: self.account_type.parse::<AccountType>()?,
            transactions_last_30d: self.transactions_last_30d,
            avg_transaction_value: self.avg_transaction_value,
            failed_transactions: self.failed_transactions,
            sms_alerts: self.sms_alerts.parse::<SmsAlerts>()?,
            complaints_logged: self.complaints_logged,
            customer_tenure_months: self.customer_tenure_months,
        })
    }
}
