//! Responsive column counts keyed by width thresholds.
//!
//! Thresholds are consulted in ascending order and the first one strictly
//! wider than the measured width wins. A width equal to a threshold does not
//! match it. When nothing matches, the caller's default column count applies.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{MasonryError, Result};

/// Mapping from a width threshold to the column count used below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointTable {
    entries: BTreeMap<u32, NonZeroUsize>,
}

impl BreakpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the column count for `threshold`.
    pub fn insert(&mut self, threshold: u32, columns: usize) -> Result<()> {
        let columns = NonZeroUsize::new(columns).ok_or(MasonryError::InvalidColumns(columns))?;
        self.entries.insert(threshold, columns);
        Ok(())
    }

    pub fn with(mut self, threshold: u32, columns: usize) -> Result<Self> {
        self.insert(threshold, columns)?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending threshold order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, NonZeroUsize)> + '_ {
        self.entries.iter().map(|(threshold, columns)| (*threshold, *columns))
    }

    pub fn resolve(&self, measured_width: f64, default: NonZeroUsize) -> NonZeroUsize {
        resolve(measured_width, self, default)
    }
}

/// Column count for `measured_width`.
pub fn resolve(measured_width: f64, table: &BreakpointTable, default: NonZeroUsize) -> NonZeroUsize {
    table
        .iter()
        .find(|(threshold, _)| measured_width < f64::from(*threshold))
        .map(|(_, columns)| columns)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn mobile_first() -> BreakpointTable {
        BreakpointTable::new()
            .with(900, 2)
            .unwrap()
            .with(600, 1)
            .unwrap()
    }

    #[test]
    fn empty_table_uses_default() {
        let table = BreakpointTable::new();
        assert_eq!(table.resolve(320.0, cols(4)), cols(4));
    }

    #[test]
    fn first_wider_threshold_wins() {
        let table = mobile_first();
        assert_eq!(table.resolve(500.0, cols(3)), cols(1));
        assert_eq!(table.resolve(750.0, cols(3)), cols(2));
        assert_eq!(table.resolve(1000.0, cols(3)), cols(3));
    }

    #[test]
    fn width_equal_to_threshold_does_not_match() {
        let table = mobile_first();
        assert_eq!(table.resolve(600.0, cols(3)), cols(2));
        assert_eq!(table.resolve(900.0, cols(3)), cols(3));
        assert_eq!(table.resolve(599.5, cols(3)), cols(1));
    }

    #[test]
    fn wider_never_yields_fewer_columns_for_mobile_first_tables() {
        let table = BreakpointTable::new()
            .with(480, 1)
            .unwrap()
            .with(768, 2)
            .unwrap()
            .with(1024, 3)
            .unwrap();
        let mut previous = table.resolve(0.0, cols(4));
        for width in (0..1600).step_by(7) {
            let current = table.resolve(f64::from(width), cols(4));
            assert!(current >= previous, "width {width} regressed");
            previous = current;
        }
    }

    #[test]
    fn zero_columns_are_rejected() {
        let err = BreakpointTable::new().with(600, 0).unwrap_err();
        assert!(matches!(err, MasonryError::InvalidColumns(0)));
    }

    #[test]
    fn deserializes_from_string_keyed_json() {
        let table: BreakpointTable = serde_json::from_str(r#"{"900": 2, "600": 1}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.iter().map(|(t, _)| t).collect::<Vec<_>>(),
            vec![600, 900]
        );
        assert!(serde_json::from_str::<BreakpointTable>(r#"{"600": 0}"#).is_err());
    }
}
