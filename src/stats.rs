use serde::{Deserialize, Serialize};

/// Counters accumulated while an input file is processed.
///
/// Each data row is counted once in `total_rows` and then lands in exactly one
/// of `processed_rows` (fully accepted) or `errors` (rejected).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_rows: usize,
    pub processed_rows: usize,
    pub unique_customers: usize,
    pub total_accounts: usize,
    pub errors: usize,
}

impl RunStatistics {
    /// Label/value pairs in display order, shared by the error report and the
    /// console summary.
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("Total rows read", self.total_rows),
            ("Valid rows", self.processed_rows),
            ("Unique customers", self.unique_customers),
            ("Accounts accepted", self.total_accounts),
            ("Errors found", self.errors),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_counter_names() {
        let stats = RunStatistics {
            total_rows: 3,
            processed_rows: 2,
            unique_customers: 1,
            total_accounts: 2,
            errors: 1,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["unique_customers"], 1);
        assert_eq!(json["total_accounts"], 2);
        assert_eq!(json["errors"], 1);
    }
}
