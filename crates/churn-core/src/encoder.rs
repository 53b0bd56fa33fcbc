//! Feature encoding: customer records into the model's numeric schema
//!
//! The field order and categorical codes here are exactly what the
//! classifier artifact was trained on. They are deliberately not derived
//! from enum declaration order: the account-type codes (Current 0,
//! Mobile Wallet 1, Savings 2) predate this crate and must track the
//! artifact, not the type system. Artifacts record
//! [`FEATURE_SCHEMA_VERSION`] and the exact field order, and loaders
//! refuse anything that disagrees.

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::record::{AccountType, CustomerRecord, Gender, Location, SmsAlerts};

/// Number of features the classifier consumes
pub const NUM_FEATURES: usize = 10;

/// Version of the feature schema below, shared with trained artifacts
///
/// Bumped whenever the field order or a categorical code changes.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Feature names in training order
///
/// Never reorder independently of the model artifact.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "age",
    "gender",
    "location",
    "account_type",
    "transactions_last_30d",
    "avg_transaction_value",
    "failed_transactions",
    "sms_alerts",
    "complaints_logged",
    "customer_tenure_months",
];

/// A fixed-order numeric feature vector
///
/// Created fresh per prediction request and never mutated afterwards.
/// Position `i` holds the value for `FEATURE_NAMES[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    /// Wrap a raw array already in [`FEATURE_NAMES`] order
    pub fn from_array(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        self.0
    }

    /// Value for a named feature, if the name is part of the schema
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

fn gender_code(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    }
}

fn location_code(location: Location) -> f64 {
    match location {
        Location::Urban => 1.0,
        Location::Rural => 0.0,
    }
}

fn account_type_code(account_type: AccountType) -> f64 {
    // Non-alphabetical on purpose; see the module docs.
    match account_type {
        AccountType::Current => 0.0,
        AccountType::MobileWallet => 1.0,
        AccountType::Savings => 2.0,
    }
}

fn sms_alerts_code(sms_alerts: SmsAlerts) -> f64 {
    match sms_alerts {
        SmsAlerts::Yes => 1.0,
        SmsAlerts::No => 0.0,
    }
}

/// Encode a record into the model's feature order
///
/// Pure and deterministic: equal records always encode to equal vectors.
/// The record is validated first, so a rejected record never reaches the
/// classifier.
pub fn encode(record: &CustomerRecord) -> Result<FeatureVector, InvalidInput> {
    record.validate()?;

    Ok(FeatureVector([
        f64::from(record.age),
        gender_code(record.gender),
        location_code(record.location),
        account_type_code(record.account_type),
        f64::from(record.transactions_last_30d),
        record.avg_transaction_value,
        f64::from(record.failed_transactions),
        sms_alerts_code(record.sms_alerts),
        f64::from(record.complaints_logged),
        f64::from(record.customer_tenure_months),
    ]))
}
