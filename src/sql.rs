//! PostgreSQL script rendering for accepted customers and accounts.
//!
//! Both scripts share one layout: a comment header with generation metadata,
//! a single multi-row `INSERT` wrapped in `BEGIN;`/`COMMIT;`, and a trailing
//! `COMMENT ON TABLE`. An empty table renders a comment in place of the insert
//! so the script stays complete and runnable.

use std::{borrow::Cow, fmt::Write as _};

use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::{
    model::{AccountRecord, CustomerRecord},
    stats::RunStatistics,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Doubles every single quote. Nothing else is altered.
pub fn escape_literal(value: &str) -> Cow<'_, str> {
    if value.contains('\'') {
        Cow::Owned(value.replace('\'', "''"))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

struct Script<'a> {
    file_name: &'a str,
    description: &'a str,
    count_label: &'a str,
    count: usize,
    errors: usize,
    section: &'a str,
    insert_header: &'a str,
    empty_comment: &'a str,
    table: &'a str,
    table_comment: &'a str,
}

impl Script<'_> {
    fn render(&self, rows: &[String], generated_at: NaiveDateTime) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "-- {}", self.file_name);
        let _ = writeln!(
            output,
            "-- Generated automatically on {}",
            generated_at.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(output, "-- {}", self.description);
        let _ = writeln!(output, "-- {}: {}", self.count_label, self.count);
        let _ = writeln!(output, "-- Errors found: {}", self.errors);
        output.push('\n');
        output.push_str("-- Begin transaction\nBEGIN;\n\n");
        let _ = writeln!(output, "-- {}", self.section);

        if rows.is_empty() {
            let _ = writeln!(output, "-- {}", self.empty_comment);
        } else {
            let _ = writeln!(output, "{}", self.insert_header);
            output.push_str(&rows.iter().map(|row| format!("    {row}")).join(",\n"));
            output.push_str(";\n");
        }
        output.push('\n');

        output.push_str("-- Commit transaction\nCOMMIT;\n\n");
        output.push_str("-- Import annotations\n");
        let _ = writeln!(
            output,
            "COMMENT ON TABLE {} IS {};",
            self.table,
            quote_literal(self.table_comment)
        );
        output
    }
}

pub fn customer_values(customer: &CustomerRecord) -> String {
    format!(
        "({}, {}, {}, {}, {}, {})",
        customer.customer_id,
        quote_literal(&customer.name),
        quote_literal(&customer.address),
        quote_literal(&customer.contact),
        quote_literal(&customer.username),
        quote_literal(&customer.password)
    )
}

/// Type and balance come from the fixed enumeration and a decimal parse, so
/// neither needs escaping.
pub fn account_values(account: &AccountRecord) -> String {
    format!(
        "({}, {}, '{}', {})",
        account.account_id, account.customer_id, account.account_type, account.balance
    )
}

pub fn render_customers_sql(
    customers: &[CustomerRecord],
    stats: &RunStatistics,
    generated_at: NaiveDateTime,
) -> String {
    let rows = customers.iter().map(customer_values).collect_vec();
    Script {
        file_name: "customers.sql",
        description: "Customer data imported from CSV",
        count_label: "Unique customers",
        count: stats.unique_customers,
        errors: stats.errors,
        section: "Insert customer data",
        insert_header: "INSERT INTO customer (customer_id, name, address, contact, username, password) VALUES",
        empty_comment: "No valid customer data to insert",
        table: "customer",
        table_comment: "Customer table imported from CSV",
    }
    .render(&rows, generated_at)
}

pub fn render_accounts_sql(
    accounts: &[AccountRecord],
    stats: &RunStatistics,
    generated_at: NaiveDateTime,
) -> String {
    let rows = accounts.iter().map(account_values).collect_vec();
    Script {
        file_name: "accounts.sql",
        description: "Account data imported from CSV",
        count_label: "Total accounts",
        count: stats.total_accounts,
        errors: stats.errors,
        section: "Insert account data",
        insert_header: "INSERT INTO account (account_id, customer_id, type, balance) VALUES",
        empty_comment: "No valid account data to insert",
        table: "account",
        table_comment: "Account table imported from CSV",
    }
    .render(&rows, generated_at)
}
