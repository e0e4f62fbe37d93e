//! Grid partitioning - splits the ordered item sequence into fixed-size rows.
//!
//! Items are placed row-major: each row is filled left to right before the
//! next one starts. Every row holds exactly `columns` items except the last,
//! which may be shorter. Nothing is reordered or filtered.
//!
//! # Example
//! ```
//! use std::num::NonZeroUsize;
//! use masonry_layout::layout::grid::partition;
//!
//! let items = [0, 1, 2, 3, 4];
//! let rows = partition(&items, NonZeroUsize::new(2).unwrap());
//!
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].items, &[4]);
//! ```

use std::num::NonZeroUsize;

/// Transient slice of consecutive items sharing one row.
#[derive(Debug, PartialEq, Eq)]
pub struct Row<'a, T> {
    /// Zero-based row number.
    pub index: usize,
    pub items: &'a [T],
}

impl<'a, T> Row<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item occupying `column`, if this row reaches that far.
    pub fn get(&self, column: usize) -> Option<&'a T> {
        self.items.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        self.items.iter().enumerate()
    }
}

/// Split `items` into rows of `columns` items.
pub fn partition<T>(items: &[T], columns: NonZeroUsize) -> Vec<Row<'_, T>> {
    items
        .chunks(columns.get())
        .enumerate()
        .map(|(index, items)| Row { index, items })
        .collect()
}

/// Number of rows `partition` yields for `item_count` items.
pub fn row_count(item_count: usize, columns: NonZeroUsize) -> usize {
    item_count.div_ceil(columns.get())
}
