use super::strategy::Strategy;

/// One successfully rewritten constructor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncRecord {
    pub category: Strategy,
    pub symbol: String,
}

impl SyncRecord {
    pub fn new(category: Strategy, symbol: impl Into<String>) -> Self {
        Self {
            category,
            symbol: symbol.into(),
        }
    }
}

impl std::fmt::Display for SyncRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.category, self.symbol)
    }
}
