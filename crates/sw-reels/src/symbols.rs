//! Symbol definitions and populations

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Symbol identifier as stored in the grid
pub type SymbolId = u32;

/// Symbol classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymbolKind {
    /// Regular paying symbol
    Regular = 0,
    /// Wild - substitutes for others in payline evaluation
    Wild = 1,
}

/// A symbol definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Symbol name (e.g., "salmon", "bear_big", "wild")
    pub name: String,
    /// Symbol kind
    pub kind: SymbolKind,
}

impl Symbol {
    /// Create a regular symbol
    pub fn regular(id: SymbolId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: SymbolKind::Regular,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: SymbolId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: SymbolKind::Wild,
        }
    }

    /// Is this a wild?
    pub fn is_wild(&self) -> bool {
        self.kind == SymbolKind::Wild
    }
}

/// An ordered symbol population
///
/// The full set is the normal population; [`SymbolSet::bonus_subset`] carves
/// out the reduced, higher-value population used while the bonus is active.
/// Ordering matters: the first symbols are the highest-value faces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Create a set, validating that ids are unique and the set is non-empty
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(SlotError::Config("symbol set is empty".into()));
        }
        for (i, a) in symbols.iter().enumerate() {
            if symbols[i + 1..].iter().any(|b| b.id == a.id) {
                return Err(SlotError::Config(format!(
                    "duplicate symbol id {} ({})",
                    a.id, a.name
                )));
            }
        }
        Ok(Self { symbols })
    }

    /// Standard hunter-themed set: ten regular faces plus one wild
    pub fn standard() -> Self {
        let symbols = vec![
            Symbol::regular(1, "bear_big"),
            Symbol::regular(2, "bear_small"),
            Symbol::regular(3, "salmon"),
            Symbol::regular(4, "seal"),
            Symbol::regular(5, "rifle"),
            Symbol::regular(6, "claws"),
            Symbol::regular(7, "bag"),
            Symbol::regular(8, "cave"),
            Symbol::regular(9, "rock"),
            Symbol::regular(10, "snow"),
            Symbol::wild(11, "wild"),
        ];
        Self { symbols }
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Is this ID a wild?
    pub fn is_wild(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(Symbol::is_wild)
    }

    /// First wild ID, if the set has one
    pub fn wild_id(&self) -> Option<SymbolId> {
        self.symbols.iter().find(|s| s.is_wild()).map(|s| s.id)
    }

    /// All symbols, in order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All regular symbol IDs, in order
    pub fn regular_ids(&self) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Regular)
            .map(|s| s.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The reduced bonus population: the first `count` regular faces.
    ///
    /// Falls back to the full set when `count` is zero or exceeds the
    /// regular symbol count, so a bonus swap can never produce an empty
    /// population.
    pub fn bonus_subset(&self, count: usize) -> SymbolSet {
        let regulars: Vec<Symbol> = self
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Regular)
            .take(count)
            .cloned()
            .collect();
        if count == 0 || regulars.is_empty() {
            return self.clone();
        }
        SymbolSet { symbols: regulars }
    }

    /// Uniformly sample one symbol ID
    pub fn sample(&self, rng: &mut impl Rng) -> SymbolId {
        let idx = rng.random_range(0..self.symbols.len());
        self.symbols[idx].id
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_standard_set() {
        let set = SymbolSet::standard();
        assert!(set.wild_id().is_some());
        assert_eq!(set.regular_ids().len(), 10);
        assert!(set.is_wild(11));
        assert!(!set.is_wild(3));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = SymbolSet::new(vec![
            Symbol::regular(1, "a"),
            Symbol::regular(1, "b"),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(SymbolSet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_bonus_subset_takes_leading_regulars() {
        let set = SymbolSet::standard();
        let subset = set.bonus_subset(3);
        assert_eq!(subset.len(), 3);
        assert_eq!(
            subset.symbols().iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(subset.wild_id().is_none());
    }

    #[test]
    fn test_bonus_subset_never_empty() {
        let set = SymbolSet::standard();
        assert_eq!(set.bonus_subset(0).len(), set.len());
        assert_eq!(set.bonus_subset(500).len(), 10);
    }

    #[test]
    fn test_sample_stays_in_set() {
        let set = SymbolSet::standard();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let id = set.sample(&mut rng);
            assert!(set.get(id).is_some());
        }
    }
}
