//! Header contract and per-field validation for combined customer/account rows.
//!
//! Every input row carries one customer and one account. The two halves are
//! validated separately so the importer can report which half failed:
//!
//! - [`validate_customer`] checks the id, required text fields and length
//!   limits, trimming and truncating the optional fields.
//! - [`validate_account`] checks both ids, the account type enumeration and a
//!   non-negative decimal balance.
//!
//! Lengths are measured in characters, not bytes.

use std::{num::IntErrorKind, str::FromStr};

use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::model::{AccountRecord, AccountType, CustomerRecord};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_CONTACT_LEN: usize = 50;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_PASSWORD_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CustomerId,
    CustomerName,
    CustomerAddress,
    CustomerContact,
    CustomerUsername,
    CustomerPassword,
    AccountId,
    AccountType,
    AccountBalance,
}

impl Field {
    pub const REQUIRED: [Field; 9] = [
        Field::CustomerId,
        Field::CustomerName,
        Field::CustomerAddress,
        Field::CustomerContact,
        Field::CustomerUsername,
        Field::CustomerPassword,
        Field::AccountId,
        Field::AccountType,
        Field::AccountBalance,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Field::CustomerId => "customer_id",
            Field::CustomerName => "customer_name",
            Field::CustomerAddress => "customer_address",
            Field::CustomerContact => "customer_contact",
            Field::CustomerUsername => "customer_username",
            Field::CustomerPassword => "customer_password",
            Field::AccountId => "account_id",
            Field::AccountType => "account_type",
            Field::AccountBalance => "account_balance",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {field}: '{value}' is not an integer")]
    InvalidInteger { field: &'static str, value: String },
    #[error("Invalid {field}: '{value}' is out of range")]
    IdOutOfRange { field: &'static str, value: String },
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),
    #[error("Username too long: {0} characters")]
    UsernameTooLong(usize),
    #[error("Name too long: {0} characters")]
    NameTooLong(usize),
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),
    #[error("Negative balance not allowed: {0}")]
    NegativeBalance(BigDecimal),
    #[error("Invalid balance: {0}")]
    InvalidBalance(String),
}

/// Column positions of the required fields within one input file.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: [usize; 9],
}

impl HeaderIndex {
    /// Resolves every required field against the header row. On failure the
    /// missing names are returned in canonical order. Extra columns are ignored.
    pub fn from_headers(headers: &[String]) -> Result<Self, Vec<String>> {
        let mut positions = [0usize; 9];
        let mut missing = Vec::new();
        for field in Field::REQUIRED {
            match headers
                .iter()
                .position(|header| header.trim() == field.header())
            {
                Some(idx) => positions[field.slot()] = idx,
                None => missing.push(field.header().to_string()),
            }
        }
        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(missing)
        }
    }

    pub fn row<'a>(&'a self, fields: &'a [String]) -> RowView<'a> {
        RowView {
            index: self,
            fields,
        }
    }
}

/// Field access for one decoded row. Cells past the end of a short row read
/// as empty.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    index: &'a HeaderIndex,
    fields: &'a [String],
}

impl<'a> RowView<'a> {
    pub fn get(&self, field: Field) -> &'a str {
        self.fields
            .get(self.index.positions[field.slot()])
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn validate_customer(row: &RowView<'_>) -> Result<CustomerRecord, ValidationError> {
    let customer_id = parse_id(row, Field::CustomerId)?;

    for field in [
        Field::CustomerName,
        Field::CustomerUsername,
        Field::CustomerPassword,
    ] {
        if row.get(field).trim().is_empty() {
            return Err(ValidationError::EmptyField(field.header()));
        }
    }

    let username = row.get(Field::CustomerUsername).trim();
    let username_len = username.chars().count();
    if username_len > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong(username_len));
    }

    let name = row.get(Field::CustomerName).trim();
    let name_len = name.chars().count();
    if name_len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(name_len));
    }

    Ok(CustomerRecord {
        customer_id,
        name: name.to_string(),
        address: truncate_chars(row.get(Field::CustomerAddress).trim(), MAX_ADDRESS_LEN),
        contact: truncate_chars(row.get(Field::CustomerContact).trim(), MAX_CONTACT_LEN),
        username: username.to_string(),
        password: truncate_chars(row.get(Field::CustomerPassword).trim(), MAX_PASSWORD_LEN),
    })
}

pub fn validate_account(row: &RowView<'_>) -> Result<AccountRecord, ValidationError> {
    let account_id = parse_id(row, Field::AccountId)?;
    let customer_id = parse_id(row, Field::CustomerId)?;

    let raw_type = row.get(Field::AccountType);
    let account_type = AccountType::from_str(raw_type)
        .map_err(|_| ValidationError::InvalidAccountType(raw_type.trim().to_lowercase()))?;

    let balance = parse_balance(row.get(Field::AccountBalance))?;

    Ok(AccountRecord {
        account_id,
        customer_id,
        account_type,
        balance,
    })
}

/// Parses a balance as an arbitrary-precision decimal, keeping every digit and
/// the literal's scale. Negative zero is accepted.
pub fn parse_balance(raw: &str) -> Result<BigDecimal, ValidationError> {
    let balance = BigDecimal::from_str(raw.trim())
        .map_err(|_| ValidationError::InvalidBalance(raw.to_string()))?;
    if balance < BigDecimal::from(0) {
        return Err(ValidationError::NegativeBalance(balance));
    }
    Ok(balance)
}

fn parse_id(row: &RowView<'_>, field: Field) -> Result<i64, ValidationError> {
    let raw = row.get(field);
    raw.trim().parse::<i64>().map_err(|err| {
        let field = field.header();
        let value = raw.to_string();
        match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                ValidationError::IdOutOfRange { field, value }
            }
            _ => ValidationError::InvalidInteger { field, value },
        }
    })
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}
