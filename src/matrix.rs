use core::ops::Index;

/// View over one row of a column-major matrix: every `stride`-th element
/// starting at `start`.
pub struct StridedVecView<'a, A: 'a> {
    pub data: &'a [A],
    pub start: usize,
    pub stride: usize,
}

impl<'a, A: 'a> StridedVecView<'a, A> {
    pub fn new(data: &'a [A], start: usize, stride: usize) -> Self {
        Self {
            data,
            start,
            stride,
        }
    }

    /// A contiguous slice seen as a single row.
    pub fn from_slice(data: &'a [A]) -> Self {
        Self {
            data,
            start: 0,
            stride: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&'a self) -> impl Iterator<Item = &A> {
        (0..self.len()).map(move |pos| &self[pos])
    }
}

impl<'a, A: 'a> Index<usize> for StridedVecView<'a, A> {
    type Output = A;
    fn index(&self, pos: usize) -> &A {
        &self.data[self.start + pos * self.stride]
    }
}

/// Dense matrix stored column by column.
///
/// The feature table is written once at encoding time and then read both
/// ways: row views for predictions, column slices for the partial
/// derivatives. Column-major keeps the per-column reads contiguous.
pub struct ColumnMajorMatrix<A> {
    n_rows: usize,
    n_cols: usize,
    /// Values, column after column.
    values: Vec<A>,
}

impl<A> ColumnMajorMatrix<A> {
    pub fn from_columns(columns: Vec<Vec<A>>) -> Self {
        let (n_cols, n_rows) = (columns.len(), columns[0].len());
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for column in columns {
            assert_eq!(column.len(), n_rows);
            values.extend(column);
        }
        Self {
            n_rows,
            n_cols,
            values,
        }
    }

    pub fn column(&self, col: usize) -> &[A] {
        let start = col * self.n_rows;
        &self.values[start..start + self.n_rows]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[A]> {
        self.values.chunks(self.n_rows)
    }

    pub fn row(&self, row: usize) -> StridedVecView<A> {
        StridedVecView::new(&self.values, row, self.n_rows)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
}

impl<A: Clone> ColumnMajorMatrix<A> {
    pub fn from_rows(rows: Vec<Vec<A>>) -> Self {
        let (n_rows, n_cols) = (rows.len(), rows[0].len());
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for col in 0..n_cols {
            for row in &rows {
                assert_eq!(row.len(), n_cols);
                values.push(row[col].clone());
            }
        }
        Self {
            n_rows,
            n_cols,
            values,
        }
    }
}

impl<A> Index<(usize, usize)> for ColumnMajorMatrix<A> {
    type Output = A;
    fn index(&self, (row, col): (usize, usize)) -> &A {
        // An out-of-range col falls off the buffer on its own
        assert!(row < self.n_rows);
        &self.values[row + col * self.n_rows]
    }
}
