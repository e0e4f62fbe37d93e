use std::num::NonZeroUsize;

use blake3::Hash;
use serde::Serialize;

use crate::geometry::{Gutter, Length, PositionMode};
use crate::layout::grid::Row;
use crate::surface::{ItemIndex, Measure, Surface};

/// Geometry assigned to one item by a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGeometry {
    pub item: ItemIndex,
    pub row: usize,
    pub column: usize,
    pub top: Length,
    pub left: Length,
    pub width: Length,
    /// `top` resolved to pixels, relative to the container origin.
    pub top_px: f64,
    /// `left` resolved to pixels, relative to the container origin.
    pub left_px: f64,
    /// Rendered height read from the surface at the assigned width.
    pub height_px: f64,
}

impl ItemGeometry {
    pub fn bottom_px(&self) -> f64 {
        self.top_px + self.height_px
    }
}

/// Output of one position calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub columns: NonZeroUsize,
    pub gutter: Gutter,
    /// Per-item geometry in row-major order.
    pub items: Vec<ItemGeometry>,
    pub container_height: Length,
    pub container_height_px: f64,
}

impl LayoutResult {
    pub fn get(&self, item: ItemIndex) -> Option<&ItemGeometry> {
        self.items.iter().find(|geometry| geometry.item == item)
    }

    pub fn row_count(&self) -> usize {
        self.items.last().map(|geometry| geometry.row + 1).unwrap_or(0)
    }

    /// Fingerprint of the committed geometry, used to spot passes that
    /// changed nothing.
    pub fn digest(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.columns.get() as u64).to_le_bytes());
        hasher.update(self.gutter.to_string().as_bytes());
        for geometry in &self.items {
            for value in [geometry.item, geometry.row, geometry.column] {
                hasher.update(&(value as u64).to_le_bytes());
            }
            for value in [geometry.top_px, geometry.left_px, geometry.height_px] {
                hasher.update(&value.to_bits().to_le_bytes());
            }
            hasher.update(geometry.top.to_string().as_bytes());
            hasher.update(geometry.left.to_string().as_bytes());
            hasher.update(geometry.width.to_string().as_bytes());
        }
        hasher.update(&self.container_height_px.to_bits().to_le_bytes());
        hasher.finalize()
    }

    /// Write the result to the rendering surface.
    pub fn commit<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_container_position(PositionMode::Relative);
        for geometry in &self.items {
            surface.place_item(geometry.item, geometry);
        }
        surface.set_container_height(Some(&self.container_height));
    }
}

/// Compute top, left and width for every item plus the container height.
///
/// Rows must arrive in order: a row's tops depend on the settled heights of
/// the row above it. Columns inside a row are independent of each other's
/// heights, but each left offset reads the rendered width of its immediate
/// predecessor instead of assuming it.
pub fn compute<M>(
    rows: &[Row<'_, ItemIndex>],
    gutter: &Gutter,
    columns: NonZeroUsize,
    measure: &M,
) -> LayoutResult
where
    M: Measure + ?Sized,
{
    let gutter_px = measure.resolve_gutter(gutter);
    let width = Length::column_width(columns, gutter);

    let mut items: Vec<ItemGeometry> = Vec::with_capacity(rows.iter().map(Row::len).sum());
    let mut previous_row: Option<std::ops::Range<usize>> = None;
    let mut max_bottom: Option<f64> = None;

    for row in rows {
        let row_start = items.len();

        for (column, &item) in row.iter() {
            let height_px = measure.rendered_height(item);

            let above = previous_row
                .as_ref()
                .filter(|range| column < range.len())
                .map(|range| &items[range.start + column]);
            let (top, top_px) = match above {
                Some(above) if row.index > 0 => {
                    let px = above.top_px + above.height_px;
                    (Length::offset(px, 1, gutter), px + gutter_px)
                }
                _ => (Length::Zero, 0.0),
            };

            let (left, left_px) = if column == 0 {
                (Length::Zero, 0.0)
            } else {
                let steps = column as u32;
                let px = measure.rendered_width(row.items[column - 1]) * column as f64;
                (
                    Length::offset(px, steps, gutter),
                    px + gutter_px * column as f64,
                )
            };

            let bottom = top_px + height_px;
            max_bottom = Some(max_bottom.map_or(bottom, |current| current.max(bottom)));

            items.push(ItemGeometry {
                item,
                row: row.index,
                column,
                top,
                left,
                width: width.clone(),
                top_px,
                left_px,
                height_px,
            });
        }

        previous_row = Some(row_start..items.len());
    }

    let (container_height, container_height_px) = match max_bottom {
        Some(bottom) => (Length::offset(bottom, 1, gutter), bottom + gutter_px),
        None => (Length::Zero, 0.0),
    };

    LayoutResult {
        columns,
        gutter: gutter.clone(),
        items,
        container_height,
        container_height_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::partition;

    struct FixedMeasure {
        heights: Vec<f64>,
        width: f64,
    }

    impl Measure for FixedMeasure {
        fn rendered_height(&self, item: ItemIndex) -> f64 {
            self.heights[item]
        }

        fn rendered_width(&self, _item: ItemIndex) -> f64 {
            self.width
        }

        fn resolve_gutter(&self, gutter: &Gutter) -> f64 {
            gutter.value
        }
    }

    fn cols(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn run(heights: &[f64], columns: usize, width: f64) -> LayoutResult {
        let measure = FixedMeasure {
            heights: heights.to_vec(),
            width,
        };
        let items: Vec<ItemIndex> = (0..heights.len()).collect();
        let rows = partition(&items, cols(columns));
        compute(&rows, &Gutter::px(10.0), cols(columns), &measure)
    }

    #[test]
    fn five_items_in_two_columns() {
        let result = run(&[100.0, 80.0, 120.0, 60.0, 50.0], 2, 195.0);
        assert_eq!(result.row_count(), 3);

        let i0 = result.get(0).unwrap();
        assert_eq!((i0.top_px, i0.left_px), (0.0, 0.0));
        assert_eq!(i0.top, Length::Zero);

        let i1 = result.get(1).unwrap();
        assert_eq!(i1.top_px, 0.0);
        assert_eq!(i1.left_px, 195.0 + 10.0);
        assert_eq!(i1.left.to_string(), "calc(195px + 10px)");

        let i2 = result.get(2).unwrap();
        assert_eq!(i2.top_px, 100.0 + 10.0);
        assert_eq!(i2.top.to_string(), "calc(100px + 10px)");
        assert_eq!(i2.left_px, 0.0);

        let i3 = result.get(3).unwrap();
        assert_eq!(i3.top_px, 80.0 + 10.0);

        let i4 = result.get(4).unwrap();
        assert_eq!(i4.top_px, i2.bottom_px() + 10.0);
        assert_eq!(i4.left_px, 0.0);
        assert_eq!((i4.row, i4.column), (2, 0));
    }

    #[test]
    fn every_item_shares_the_column_width() {
        let result = run(&[10.0; 7], 3, 100.0);
        assert!(
            result
                .items
                .iter()
                .all(|g| g.width.to_string() == "calc(33.333333333333336% - 10px)")
        );
    }

    #[test]
    fn lefts_scale_with_the_predecessor_width() {
        let result = run(&[10.0; 4], 4, 90.0);
        let lefts: Vec<f64> = result.items.iter().map(|g| g.left_px).collect();
        assert_eq!(lefts, vec![0.0, 100.0, 200.0, 300.0]);
        assert_eq!(result.items[3].left.to_string(), "calc(270px + 30px)");
    }

    #[test]
    fn container_height_covers_tall_items_in_earlier_rows() {
        // Column 0 holds a very tall item in row 0; the last row only reaches column 1.
        let result = run(&[500.0, 20.0, 20.0, 20.0, 20.0], 3, 50.0);
        let max_bottom = result
            .items
            .iter()
            .map(ItemGeometry::bottom_px)
            .fold(0.0, f64::max);
        assert_eq!(max_bottom, 500.0 + 10.0 + 20.0);
        assert_eq!(result.container_height_px, max_bottom + 10.0);
        assert!(
            result
                .items
                .iter()
                .all(|g| g.bottom_px() <= result.container_height_px)
        );
        assert_eq!(result.container_height.to_string(), "calc(530px + 10px)");
    }

    #[test]
    fn tops_follow_the_item_directly_above() {
        let heights = [30.0, 50.0, 70.0, 11.0, 13.0, 17.0, 19.0];
        let result = run(&heights, 3, 60.0);
        for geometry in result.items.iter().filter(|g| g.row > 0) {
            let above = &result.items[geometry.item - 3];
            assert_eq!(geometry.top_px, above.top_px + above.height_px + 10.0);
        }
    }

    #[test]
    fn empty_container_has_zero_height() {
        let result = run(&[], 4, 100.0);
        assert!(result.items.is_empty());
        assert_eq!(result.container_height, Length::Zero);
        assert_eq!(result.container_height_px, 0.0);
    }

    #[test]
    fn identical_inputs_produce_identical_digests() {
        let a = run(&[40.0, 60.0, 80.0], 2, 100.0);
        let b = run(&[40.0, 60.0, 80.0], 2, 100.0);
        let c = run(&[40.0, 61.0, 80.0], 2, 100.0);
        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }
}
