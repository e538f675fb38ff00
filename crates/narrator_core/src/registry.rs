use crate::ConversionResult;

/// Session-scoped, append-only record of completed conversions.
///
/// Entries are kept in insertion order and are never removed, reordered, or
/// rewritten within a session. Two results reporting the same name are both
/// retained. There is no capacity bound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRegistry {
    entries: Vec<ConversionResult>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: ConversionResult) {
        self.entries.push(result);
    }

    /// Read-only snapshot in insertion order.
    pub fn list(&self) -> &[ConversionResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
