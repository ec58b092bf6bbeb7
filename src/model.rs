use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_type: AccountType,
    pub balance: BigDecimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Premium,
    Business,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::Premium,
        AccountType::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Premium => "premium",
            AccountType::Business => "business",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Case-insensitive match against the fixed account type set.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        AccountType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("Invalid account type: {normalized}"))
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    CustomerValidation,
    AccountValidation,
    DuplicateUsername,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::CustomerValidation => "customer_validation",
            ErrorCategory::AccountValidation => "account_validation",
            ErrorCategory::DuplicateUsername => "duplicate_username",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected input row. Recorded once per row and never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    pub line_number: usize,
    pub category: ErrorCategory,
    pub message: String,
    pub raw_row: String,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {} - {}: {}",
            self.line_number, self.category, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_parses_case_insensitively() {
        assert_eq!("Checking".parse::<AccountType>(), Ok(AccountType::Checking));
        assert_eq!(" PREMIUM ".parse::<AccountType>(), Ok(AccountType::Premium));
        assert_eq!(
            "loan".parse::<AccountType>(),
            Err("Invalid account type: loan".to_string())
        );
    }

    #[test]
    fn error_category_uses_snake_case_labels() {
        assert_eq!(
            ErrorCategory::DuplicateUsername.to_string(),
            "duplicate_username"
        );
        let json = serde_json::to_string(&ErrorCategory::AccountValidation).unwrap();
        assert_eq!(json, "\"account_validation\"");
    }
}
