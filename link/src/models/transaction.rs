use serde::{Deserialize, Serialize};

/// Interactive transaction step requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    Start,
    Commit,
    Rollback,
}

impl TransactionAction {
    pub fn gerund(&self) -> &'static str {
        match self {
            TransactionAction::Start => "starting",
            TransactionAction::Commit => "committing",
            TransactionAction::Rollback => "rolling back",
        }
    }
}

/// Options of an interactive transaction start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// Milliseconds to wait for a connection. Default: 2000
    pub max_wait: u64,
    /// Milliseconds the transaction may stay open. Default: 5000
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation_level: Option<String>,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            max_wait: 2000,
            timeout: 5000,
            isolation_level: None,
        }
    }
}

/// Handle of a started interactive transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub id: String,
}
