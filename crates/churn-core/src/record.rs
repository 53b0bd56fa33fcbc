//! Customer record domain model
//!
//! The raw attributes an intake form collects for one USSD customer,
//! before any numeric encoding. Categorical fields are proper enums so a
//! well-typed record can never carry an unknown category; the string
//! conversions exist for the CSV/JSON boundary and fail with
//! `InvalidInput` on anything the model was not trained on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Minimum accepted customer age
pub const AGE_MIN: u32 = 18;
/// Maximum accepted customer age
pub const AGE_MAX: u32 = 70;
/// Minimum customer tenure in months
pub const TENURE_MIN_MONTHS: u32 = 1;

/// Input ranges used by intake forms, as (min, max, default)
///
/// Only the bounds checked by [`CustomerRecord::validate`] are contract;
/// the rest are display hints for slider widgets.
pub mod form_ranges {
    pub const AGE: (u32, u32, u32) = (18, 70, 30);
    pub const TRANSACTIONS_LAST_30D: (u32, u32, u32) = (0, 100, 15);
    pub const AVG_TRANSACTION_VALUE: (f64, f64, f64) = (50.0, 10_000.0, 2_000.0);
    pub const FAILED_TRANSACTIONS: (u32, u32, u32) = (0, 20, 2);
    pub const COMPLAINTS_LOGGED: (u32, u32, u32) = (0, 10, 1);
    pub const CUSTOMER_TENURE_MONTHS: (u32, u32, u32) = (1, 60, 12);
}

/// Customer gender as captured by the intake form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// All form choices, in display order
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(InvalidInput::UnknownCategory {
                field: "gender",
                value: other.to_string(),
                expected: Gender::ALL.iter().map(Gender::as_str).collect(),
            }),
        }
    }
}

/// Customer location class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Urban,
    Rural,
}

impl Location {
    /// All form choices, in display order
    pub const ALL: [Location; 2] = [Location::Urban, Location::Rural];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Urban => "Urban",
            Location::Rural => "Rural",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Urban" => Ok(Location::Urban),
            "Rural" => Ok(Location::Rural),
            other => Err(InvalidInput::UnknownCategory {
                field: "location",
                value: other.to_string(),
                expected: Location::ALL.iter().map(Location::as_str).collect(),
            }),
        }
    }
}

/// Account product the customer transacts from
///
/// The user-facing spelling of the wallet product is "Mobile Wallet"
/// (two words); that spelling is what forms, CSVs, and JSON carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Current,
    #[serde(rename = "Mobile Wallet")]
    MobileWallet,
}

impl AccountType {
    /// All form choices, in display order
    pub const ALL: [AccountType; 3] = [
        AccountType::Savings,
        AccountType::Current,
        AccountType::MobileWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Current => "Current",
            AccountType::MobileWallet => "Mobile Wallet",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Savings" => Ok(AccountType::Savings),
            "Current" => Ok(AccountType::Current),
            "Mobile Wallet" | "MobileWallet" => Ok(AccountType::MobileWallet),
            other => Err(InvalidInput::UnknownCategory {
                field: "account_type",
                value: other.to_string(),
                expected: AccountType::ALL.iter().map(AccountType::as_str).collect(),
            }),
        }
    }
}

/// Whether the customer subscribed to SMS transaction alerts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmsAlerts {
    Yes,
    No,
}

impl SmsAlerts {
    /// All form choices, in display order
    pub const ALL: [SmsAlerts; 2] = [SmsAlerts::Yes, SmsAlerts::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            SmsAlerts::Yes => "Yes",
            SmsAlerts::No => "No",
        }
    }
}

impl fmt::Display for SmsAlerts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmsAlerts {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(SmsAlerts::Yes),
            "No" => Ok(SmsAlerts::No),
            other => Err(InvalidInput::UnknownCategory {
                field: "sms_alerts",
                value: other.to_string(),
                expected: SmsAlerts::ALL.iter().map(SmsAlerts::as_str).collect(),
            }),
        }
    }
}

/// Raw attributes for one customer, one prediction request
///
/// Constructed per interaction and discarded after scoring. Unsigned
/// integer fields make the ≥0 constraints structural; [`validate`]
/// enforces the remaining ranges.
///
/// [`validate`]: CustomerRecord::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Age in years, 18–70
    pub age: u32,
    pub gender: Gender,
    pub location: Location,
    pub account_type: AccountType,
    /// Completed transactions in the trailing 30 days
    pub transactions_last_30d: u32,
    /// Mean transaction value in naira
    pub avg_transaction_value: f64,
    /// Failed transactions in the trailing 30 days
    pub failed_transactions: u32,
    pub sms_alerts: SmsAlerts,
    /// Complaints the customer has logged with support
    pub complaints_logged: u32,
    /// Months since account opening, ≥1
    pub customer_tenure_months: u32,
}

impl CustomerRecord {
    /// Check the numeric ranges the encoder relies on
    ///
    /// Intake forms constrain these already; direct callers get the same
    /// guarantees here.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !(AGE_MIN..=AGE_MAX).contains(&self.age) {
            return Err(InvalidInput::OutOfRange {
                field: "age",
                value: i64::from(self.age),
                min: i64::from(AGE_MIN),
                max: i64::from(AGE_MAX),
            });
        }

        if self.customer_tenure_months < TENURE_MIN_MONTHS {
            return Err(InvalidInput::BelowMinimum {
                field: "customer_tenure_months",
                value: f64::from(self.customer_tenure_months),
                min: f64::from(TENURE_MIN_MONTHS),
            });
        }

        if !self.avg_transaction_value.is_finite() {
            return Err(InvalidInput::NotFinite {
                field: "avg_transaction_value",
            });
        }

        if self.avg_transaction_value < 0.0 {
            return Err(InvalidInput::BelowMinimum {
                field: "avg_transaction_value",
                value: self.avg_transaction_value,
                min: 0.0,
            });
        }

        Ok(())
    }
}

impl Default for CustomerRecord {
    /// The intake form's initial state
    fn default() -> Self {
        Self {
            age: form_ranges::AGE.2,
            gender: Gender::Male,
            location: Location::Urban,
            account_type: AccountType::Savings,
            transactions_last_30d: form_ranges::TRANSACTIONS_LAST_30D.2,
            avg_transaction_value: form_ranges::AVG_TRANSACTION_VALUE.2,
            failed_transactions: form_ranges::FAILED_TRANSACTIONS.2,
            sms_alerts: SmsAlerts::Yes,
            complaints_logged: form_ranges::COMPLAINTS_LOGGED.2,
            customer_tenure_months: form_ranges::CUSTOMER_TENURE_MONTHS.2,
        }
    }
}
