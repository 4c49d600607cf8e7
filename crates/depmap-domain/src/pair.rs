//! Candidate pair enumeration and the interview cursor.

use crate::error::ElicitError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered (source, target) variable tuple under consideration for a
/// directed dependency. A pair and its reverse are distinct: the interview
/// asks about directed influence, not symmetric association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// Influencing variable
    pub source: String,
    /// Influenced variable
    pub target: String,
}

impl Pair {
    /// Create a pair from source and target names
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Enumerate all N·(N−1) ordered pairs over the given variables.
///
/// Canonical order is row-major over the N×N matrix excluding the diagonal:
/// outer loop over the source index, inner loop over the target index,
/// skipping source == target. Deterministic for a given input order.
///
/// Fails with [`ElicitError::InsufficientVariables`] for fewer than two
/// variables. Name uniqueness is the submitter's contract (see
/// [`crate::variable::validate_variables`]); the diagonal is skipped by
/// index, so duplicate names would not be collapsed here.
pub fn enumerate_pairs(variables: &[String]) -> Result<Vec<Pair>, ElicitError> {
    let n = variables.len();
    if n < 2 {
        return Err(ElicitError::InsufficientVariables(n));
    }

    let mut pairs = Vec::with_capacity(n * (n - 1));
    for (i, source) in variables.iter().enumerate() {
        for (j, target) in variables.iter().enumerate() {
            if i != j {
                pairs.push(Pair::new(source.clone(), target.clone()));
            }
        }
    }
    Ok(pairs)
}

/// Position within a fixed pair sequence.
///
/// The cursor is monotonically non-decreasing for the lifetime of a
/// sequence; it only resets by regenerating the sequence itself. The
/// terminal state (position == length) is stable and idempotent to query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCursor {
    pairs: Vec<Pair>,
    index: usize,
}

impl PairCursor {
    /// Create a cursor at the start of the given sequence
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs, index: 0 }
    }

    /// The pair currently under the cursor, or `None` once exhausted
    pub fn current(&self) -> Option<&Pair> {
        self.pairs.get(self.index)
    }

    /// Advance past the current pair.
    ///
    /// Callers must check [`current`](Self::current) first; advancing past
    /// the terminal position fails with [`ElicitError::CursorExhausted`].
    pub fn advance(&mut self) -> Result<(), ElicitError> {
        if self.index >= self.pairs.len() {
            return Err(ElicitError::CursorExhausted);
        }
        self.index += 1;
        Ok(())
    }

    /// Number of pairs already answered
    pub fn position(&self) -> usize {
        self.index
    }

    /// Total number of pairs in the sequence
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Whether every pair has been answered
    pub fn is_complete(&self) -> bool {
        self.index >= self.pairs.len()
    }

    /// The full, fixed pair sequence
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enumerate_requires_two_variables() {
        assert_eq!(
            enumerate_pairs(&[]),
            Err(ElicitError::InsufficientVariables(0))
        );
        assert_eq!(
            enumerate_pairs(&vars(&["A"])),
            Err(ElicitError::InsufficientVariables(1))
        );
    }

    #[test]
    fn test_enumerate_two_variables() {
        let pairs = enumerate_pairs(&vars(&["Price", "Demand"])).unwrap();
        assert_eq!(
            pairs,
            vec![Pair::new("Price", "Demand"), Pair::new("Demand", "Price")]
        );
    }

    #[test]
    fn test_enumerate_three_variables_canonical_order() {
        let pairs = enumerate_pairs(&vars(&["A", "B", "C"])).unwrap();
        assert_eq!(
            pairs,
            vec![
                Pair::new("A", "B"),
                Pair::new("A", "C"),
                Pair::new("B", "A"),
                Pair::new("B", "C"),
                Pair::new("C", "A"),
                Pair::new("C", "B"),
            ]
        );
    }

    #[test]
    fn test_cursor_walk() {
        let pairs = enumerate_pairs(&vars(&["A", "B"])).unwrap();
        let mut cursor = PairCursor::new(pairs);

        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some(&Pair::new("A", "B")));

        cursor.advance().unwrap();
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.current(), Some(&Pair::new("B", "A")));

        cursor.advance().unwrap();
        assert!(cursor.is_complete());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_cursor_terminal_is_stable() {
        let mut cursor = PairCursor::new(vec![Pair::new("A", "B")]);
        cursor.advance().unwrap();

        // Repeated queries at terminal return no pair without error
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.current(), None);
        assert!(cursor.is_complete());

        // Advancing past terminal is a programming error
        assert_eq!(cursor.advance(), Err(ElicitError::CursorExhausted));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_empty_sequence_is_immediately_complete() {
        let mut cursor = PairCursor::new(Vec::new());
        assert!(cursor.is_complete());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(), Err(ElicitError::CursorExhausted));
    }

    #[test]
    fn test_pair_display() {
        assert_eq!(Pair::new("Rain", "Traffic").to_string(), "Rain -> Traffic");
    }
}
