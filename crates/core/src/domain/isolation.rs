// Transaction isolation levels

use serde::{Deserialize, Serialize};

/// Concurrency guarantee requested for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IsolationLevel {
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// SQL spelling, as used in `SET TRANSACTION ISOLATION LEVEL ...`
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl std::fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_spelling() {
        assert_eq!(IsolationLevel::RepeatableRead.as_sql(), "REPEATABLE READ");
        assert_eq!(IsolationLevel::Serializable.to_string(), "SERIALIZABLE");
    }
}
