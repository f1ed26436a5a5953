//! Symbol frequency analysis.

use std::collections::BTreeMap;

use crate::symbol::Symbol;

/// Occurrence count per distinct symbol, ordered by symbol value.
///
/// Built once per encode and never modified afterwards. The sum of all counts
/// equals the length of the analyzed input; the table is empty iff the input
/// was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Count every symbol in a single pass.
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let mut counts = BTreeMap::new();
        for &symbol in symbols {
            *counts.entry(symbol).or_insert(0u64) += 1;
        }
        Self {
            counts,
            total: symbols.len() as u64,
        }
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_total() {
        let table = FrequencyTable::from_symbols(&[3, 1, 3, 3, 200, 1]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        assert_eq!(table.get(3), 3);
        assert_eq!(table.get(1), 2);
        assert_eq!(table.get(200), 1);
        assert_eq!(table.get(7), 0);
    }

    #[test]
    fn test_iterates_in_symbol_order() {
        let table = FrequencyTable::from_symbols(&[900, 5, 42, 5]);
        let order: Vec<_> = table.iter().collect();
        assert_eq!(order, vec![(5, 2), (42, 1), (900, 1)]);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_symbols(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }
}
