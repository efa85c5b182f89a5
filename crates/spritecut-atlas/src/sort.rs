//! Margin-tolerant grid ordering of cells.
//!
//! Auto-detected cell boundaries are a few pixels off from a clean grid. The
//! comparator treats two cells whose primary-axis edges lie within `margin`
//! pixels as sharing a row (or column) and orders them along the cross axis
//! instead.
//!
//! The row and column branches break ties in opposite directions: rows tie on
//! descending `uv_left`, columns tie on ascending `uv_up`. This matches the
//! behaviour existing atlases were generated with and is kept as is.
//!
//! With `margin > 0` the predicate is not guaranteed to be transitive, so the
//! ordering is done by [`sort_by_precedence`], a stable merge sort that only
//! asks "does `a` go before `b`" and never panics on an inconsistent answer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spritecut_common::UvRect;

/// Primary axis for grid ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Group by row, then order within the row
    #[default]
    Rows,
    /// Group by column, then order within the column
    Columns,
}

impl SortOrder {
    /// Maps the numeric selector used by the auto-generate dialog: `0` is rows,
    /// anything else columns.
    #[must_use]
    pub const fn from_selector(selector: u32) -> Self {
        if selector == 0 {
            Self::Rows
        } else {
            Self::Columns
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Columns => f.write_str("columns"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" | "row" | "0" => Ok(Self::Rows),
            "columns" | "column" | "cols" | "1" => Ok(Self::Columns),
            other => Err(format!("unknown sort order '{other}' (expected rows or columns)")),
        }
    }
}

/// Grid comparator bound to a texture size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridComparator {
    order: SortOrder,
    margin: f32,
    width: f32,
    height: f32,
}

impl GridComparator {
    /// Creates a comparator for a `width × height` texture with `margin` in pixels.
    #[must_use]
    pub fn new(order: SortOrder, margin: u32, width: u32, height: u32) -> Self {
        Self {
            order,
            margin: margin as f32,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Returns true when `a` goes strictly before `b`.
    #[must_use]
    pub fn precedes(&self, a: &UvRect, b: &UvRect) -> bool {
        match self.order {
            SortOrder::Rows => {
                let gap = (a.uv_up - b.uv_up).abs() * self.height;
                if gap < self.margin {
                    a.uv_left > b.uv_left
                } else {
                    a.uv_up > b.uv_up
                }
            },
            SortOrder::Columns => {
                let gap = (a.uv_left - b.uv_left).abs() * self.width;
                if gap < self.margin {
                    a.uv_up < b.uv_up
                } else {
                    a.uv_left > b.uv_left
                }
            },
        }
    }
}

/// Something that can be placed on the grid and told its rank.
pub trait GridCell {
    /// UV rectangle used for ordering.
    fn uv(&self) -> &UvRect;

    /// Stores the cell's rank after sorting.
    fn set_index(&mut self, index: usize);
}

impl<T: GridCell + ?Sized> GridCell for &mut T {
    fn uv(&self) -> &UvRect {
        (**self).uv()
    }

    fn set_index(&mut self, index: usize) {
        (**self).set_index(index);
    }
}

/// Stable merge sort driven by a strict "goes before" predicate.
///
/// An element from the right half only jumps ahead of one from the left half
/// when `precedes(right, left)` holds.
pub fn sort_by_precedence<T, F>(items: Vec<T>, precedes: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= 1 {
        return items;
    }

    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = sort_by_precedence(left, precedes);
    let right = sort_by_precedence(right, precedes);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut right = right.into_iter().peekable();
    for item in left {
        while let Some(next) = right.next_if(|candidate| precedes(candidate, &item)) {
            merged.push(next);
        }
        merged.push(item);
    }
    merged.extend(right);
    merged
}

/// Sorts cells on the grid and writes each cell's rank into its index.
///
/// Cells that compare as co-located keep their input order.
pub fn sort_and_index<T: GridCell>(cells: Vec<T>, comparator: &GridComparator) -> Vec<T> {
    let mut sorted = sort_by_precedence(cells, &|a: &T, b: &T| comparator.precedes(a.uv(), b.uv()));
    for (rank, cell) in sorted.iter_mut().enumerate() {
        cell.set_index(rank);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct TestCell {
        id: usize,
        uv: UvRect,
        index: usize,
    }

    impl GridCell for TestCell {
        fn uv(&self) -> &UvRect {
            &self.uv
        }

        fn set_index(&mut self, index: usize) {
            self.index = index;
        }
    }

    fn cell(id: usize, uv_left: f32, uv_up: f32) -> TestCell {
        TestCell {
            id,
            uv: UvRect {
                uv_left,
                uv_right: uv_left,
                uv_up,
                uv_down: uv_up,
            },
            index: usize::MAX,
        }
    }

    fn ids(cells: &[TestCell]) -> Vec<usize> {
        cells.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(SortOrder::from_selector(0), SortOrder::Rows);
        assert_eq!(SortOrder::from_selector(1), SortOrder::Columns);
        assert_eq!(SortOrder::from_selector(7), SortOrder::Columns);
        assert_eq!("Columns".parse::<SortOrder>(), Ok(SortOrder::Columns));
        assert!("diagonal".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Rows.to_string(), "rows");
    }

    #[test]
    fn test_row_gap_within_margin_ties_on_column() {
        // 0.51 vs 0.50 on a 100px texture is a 1px row gap
        let a = cell(0, 0.2, 0.51);
        let b = cell(1, 0.6, 0.50);

        let loose = GridComparator::new(SortOrder::Rows, 5, 100, 100);
        assert!(loose.precedes(&b.uv, &a.uv));
        assert!(!loose.precedes(&a.uv, &b.uv));

        let strict = GridComparator::new(SortOrder::Rows, 0, 100, 100);
        assert!(strict.precedes(&a.uv, &b.uv));
        assert!(!strict.precedes(&b.uv, &a.uv));
    }

    #[test]
    fn test_column_branch_tie_is_ascending_row() {
        let a = cell(0, 0.30, 0.2);
        let b = cell(1, 0.31, 0.8);
        let cmp = GridComparator::new(SortOrder::Columns, 5, 100, 100);
        assert!(cmp.precedes(&a.uv, &b.uv));

        let far = cell(2, 0.9, 0.5);
        assert!(cmp.precedes(&far.uv, &a.uv));
    }

    #[test]
    fn test_rows_sort_on_grid() {
        // 2×2 grid, rows at uv_up 0.9 and 0.4, jitter of 1px inside each row
        let cells = vec![
            cell(0, 0.1, 0.40),
            cell(1, 0.6, 0.91),
            cell(2, 0.6, 0.41),
            cell(3, 0.1, 0.90),
        ];
        let cmp = GridComparator::new(SortOrder::Rows, 4, 100, 100);
        let sorted = sort_and_index(cells, &cmp);

        assert_eq!(ids(&sorted), vec![1, 3, 2, 0]);
        assert_eq!(sorted.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_sort_by_precedence_is_stable() {
        let items = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        let sorted = sort_by_precedence(items, &|a: &(i32, char), b: &(i32, char)| a.0 < b.0);
        assert_eq!(sorted, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn test_sort_survives_intransitive_margin() {
        // a~b and b~c are within margin, a and c are not
        let cells = vec![cell(0, 0.1, 0.50), cell(1, 0.5, 0.53), cell(2, 0.9, 0.56)];
        let cmp = GridComparator::new(SortOrder::Rows, 4, 100, 100);
        let sorted = sort_and_index(cells, &cmp);
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let cmp = GridComparator::new(SortOrder::Rows, 4, 100, 100);
        assert!(sort_and_index(Vec::<TestCell>::new(), &cmp).is_empty());

        let sorted = sort_and_index(vec![cell(7, 0.5, 0.5)], &cmp);
        assert_eq!(sorted[0].index, 0);
    }

    proptest! {
        #[test]
        fn prop_zero_margin_orders_strictly_by_row(
            ups in proptest::collection::vec(0u32..1000, 0..40),
        ) {
            let cells: Vec<_> = ups
                .iter()
                .enumerate()
                .map(|(i, &up)| cell(i, 0.5, up as f32 / 1000.0))
                .collect();
            let cmp = GridComparator::new(SortOrder::Rows, 0, 64, 64);
            let sorted = sort_and_index(cells, &cmp);

            for pair in sorted.windows(2) {
                prop_assert!(pair[0].uv.uv_up >= pair[1].uv.uv_up);
            }
        }

        #[test]
        fn prop_zero_margin_orders_strictly_by_column(
            lefts in proptest::collection::vec(0u32..1000, 0..40),
        ) {
            let cells: Vec<_> = lefts
                .iter()
                .enumerate()
                .map(|(i, &left)| cell(i, left as f32 / 1000.0, 0.5))
                .collect();
            let cmp = GridComparator::new(SortOrder::Columns, 0, 64, 64);
            let sorted = sort_and_index(cells, &cmp);

            for pair in sorted.windows(2) {
                prop_assert!(pair[0].uv.uv_left >= pair[1].uv.uv_left);
            }
        }

        #[test]
        fn prop_indices_are_a_permutation(
            points in proptest::collection::vec((0u32..100, 0u32..100), 0..40),
            margin in 0u32..20,
            columns in any::<bool>(),
        ) {
            let cells: Vec<_> = points
                .iter()
                .enumerate()
                .map(|(i, &(l, u))| cell(i, l as f32 / 100.0, u as f32 / 100.0))
                .collect();
            let order = if columns { SortOrder::Columns } else { SortOrder::Rows };
            let cmp = GridComparator::new(order, margin, 100, 100);
            let sorted = sort_and_index(cells, &cmp);

            let mut seen: Vec<_> = sorted.iter().map(|c| c.index).collect();
            prop_assert_eq!(seen.clone(), (0..points.len()).collect::<Vec<_>>());
            seen = ids(&sorted);
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..points.len()).collect::<Vec<_>>());
        }
    }
}
