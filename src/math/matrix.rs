use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Result, SwanError};

/// Dense row-major matrix of `f32` values.
///
/// The buffer always holds exactly `rows * cols` elements. A matrix with zero
/// rows or zero columns is valid and simply holds nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(SwanError::ShapeMismatch {
                expected: (rows, cols),
                found: (1, data.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Matrix> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);

        for row in rows {
            if row.len() != n_cols {
                return Err(SwanError::ShapeMismatch {
                    expected: (1, n_cols),
                    found: (1, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Matrix { rows: n_rows, cols: n_cols, data })
    }

    /// A single-row matrix, the shape a network takes for one example.
    pub fn row_vector(values: Vec<f32>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Writes one element. Out-of-range coordinates are reported, not ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(SwanError::DimensionMismatch {
                op: "set",
                lhs: self.shape(),
                rhs: (row, col),
            });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Replaces every element `x` with `functor(x)`, in place.
    pub fn apply<F>(&mut self, functor: F)
    where
        F: Fn(f32) -> f32,
    {
        for x in self.data.iter_mut() {
            *x = functor(*x);
        }
    }

    /// Overwrites every element with a value drawn uniformly from `[-1, 1]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for x in self.data.iter_mut() {
            *x = rng.gen_range(-1.0..=1.0);
        }
    }

    /// Standard matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(SwanError::DimensionMismatch {
                op: "multiply",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both `rhs` and `res` rows contiguously.
        for i in 0..self.rows {
            let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, b) in out.iter_mut().zip(rhs_row) {
                    *o += a * b;
                }
            }
        }

        Ok(res)
    }

    /// Element-wise `dest = a + b`. All three must share one shape.
    ///
    /// When the destination is one of the operands, use [`Matrix::add_assign`].
    pub fn add_into(a: &Matrix, b: &Matrix, dest: &mut Matrix) -> Result<()> {
        if a.shape() != b.shape() {
            return Err(SwanError::DimensionMismatch {
                op: "add",
                lhs: a.shape(),
                rhs: b.shape(),
            });
        }
        if dest.shape() != a.shape() {
            return Err(SwanError::DimensionMismatch {
                op: "add",
                lhs: a.shape(),
                rhs: dest.shape(),
            });
        }

        for ((d, x), y) in dest.data.iter_mut().zip(&a.data).zip(&b.data) {
            *d = x + y;
        }
        Ok(())
    }

    /// Element-wise `self += rhs`.
    pub fn add_assign(&mut self, rhs: &Matrix) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(SwanError::DimensionMismatch {
                op: "add",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        for (x, y) in self.data.iter_mut().zip(&rhs.data) {
            *x += y;
        }
        Ok(())
    }

    /// Adds a `1 x cols` row to every row of `self`.
    pub fn add_row_broadcast(&mut self, row: &Matrix) -> Result<()> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(SwanError::DimensionMismatch {
                op: "broadcast add",
                lhs: self.shape(),
                rhs: row.shape(),
            });
        }
        if self.cols == 0 {
            return Ok(());
        }

        for out in self.data.chunks_exact_mut(self.cols) {
            for (x, b) in out.iter_mut().zip(&row.data) {
                *x += b;
            }
        }
        Ok(())
    }

    /// Deep-copies `src` into `self`, which must already have the same shape.
    pub fn copy_from(&mut self, src: &Matrix) -> Result<()> {
        if self.shape() != src.shape() {
            return Err(SwanError::ShapeMismatch {
                expected: self.shape(),
                found: src.shape(),
            });
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Checks the length invariant; used after deserializing untrusted input.
    pub(crate) fn is_consistent(&self) -> bool {
        self.data.len() == self.rows * self.cols
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn identity(n: usize) -> Matrix {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0).unwrap();
        }
        m
    }

    #[test]
    fn zeros_has_consistent_length() {
        let m = Matrix::zeros(3, 4);
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.as_slice().len(), 12);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));

        let empty = Matrix::zeros(0, 5);
        assert!(empty.is_empty());
        assert_eq!(empty.cols(), 5);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(1, 0), Some(3.0));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, SwanError::ShapeMismatch { .. }));
    }

    #[test]
    fn fill_and_apply_touch_every_element() {
        let mut m = Matrix::zeros(2, 3);
        m.fill(2.0);
        m.apply(|x| x * x + 1.0);
        assert!(m.as_slice().iter().all(|&x| x == 5.0));
    }

    #[test]
    fn set_out_of_range_is_an_error() {
        let mut m = Matrix::zeros(2, 2);
        assert!(m.set(2, 0, 1.0).is_err());
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn multiply_shape_and_values() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]).unwrap();
        let c = a.multiply(&b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn multiply_by_identity_reproduces_input() {
        let a = Matrix::from_rows(vec![vec![1.5, -2.0, 0.25], vec![3.0, 0.0, -7.0]]).unwrap();
        assert_eq!(a.multiply(&identity(3)).unwrap(), a);
        assert_eq!(identity(2).multiply(&a).unwrap(), a);
    }

    #[test]
    fn multiply_rejects_incompatible_operands() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        match a.multiply(&b) {
            Err(SwanError::DimensionMismatch { op, lhs, rhs }) => {
                assert_eq!(op, "multiply");
                assert_eq!(lhs, (2, 3));
                assert_eq!(rhs, (2, 3));
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn multiply_with_empty_inner_dimension_is_zero() {
        let a = Matrix::zeros(2, 0);
        let b = Matrix::zeros(0, 3);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c.shape(), (2, 3));
        assert!(c.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn add_into_checks_all_shapes() {
        let a = Matrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
        let b = Matrix::from_vec(1, 2, vec![3.0, 4.0]).unwrap();
        let mut dest = Matrix::zeros(1, 2);
        Matrix::add_into(&a, &b, &mut dest).unwrap();
        assert_eq!(dest.as_slice(), &[4.0, 6.0]);

        let mut wrong = Matrix::zeros(2, 1);
        assert!(Matrix::add_into(&a, &b, &mut wrong).is_err());
        assert!(Matrix::add_into(&a, &Matrix::zeros(2, 2), &mut dest).is_err());
    }

    #[test]
    fn add_is_commutative_and_associative() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut a = Matrix::zeros(3, 3);
        let mut b = Matrix::zeros(3, 3);
        let mut c = Matrix::zeros(3, 3);
        a.randomize(&mut rng);
        b.randomize(&mut rng);
        c.randomize(&mut rng);

        let mut ab = Matrix::zeros(3, 3);
        let mut ba = Matrix::zeros(3, 3);
        Matrix::add_into(&a, &b, &mut ab).unwrap();
        Matrix::add_into(&b, &a, &mut ba).unwrap();
        assert_eq!(ab, ba);

        let mut ab_c = ab.clone();
        ab_c.add_assign(&c).unwrap();
        let mut bc = b.clone();
        bc.add_assign(&c).unwrap();
        let mut a_bc = a.clone();
        a_bc.add_assign(&bc).unwrap();
        for (x, y) in ab_c.as_slice().iter().zip(a_bc.as_slice()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn add_to_itself_doubles() {
        let mut a = Matrix::from_vec(2, 2, vec![1.0, -2.0, 0.5, 4.0]).unwrap();
        let same = a.clone();
        a.add_assign(&same).unwrap();
        assert_eq!(a.as_slice(), &[2.0, -4.0, 1.0, 8.0]);
    }

    #[test]
    fn broadcast_adds_row_to_each_row() {
        let mut m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let bias = Matrix::row_vector(vec![10.0, 20.0]);
        m.add_row_broadcast(&bias).unwrap();
        assert_eq!(m.as_slice(), &[11.0, 22.0, 13.0, 24.0, 15.0, 26.0]);

        assert!(m.add_row_broadcast(&Matrix::row_vector(vec![1.0])).is_err());
    }

    #[test]
    fn copy_from_requires_same_shape() {
        let src = Matrix::row_vector(vec![1.0, 2.0, 3.0]);
        let mut dest = Matrix::zeros(1, 3);
        dest.copy_from(&src).unwrap();
        assert_eq!(dest, src);
        assert!(Matrix::zeros(3, 1).copy_from(&src).is_err());
    }

    #[test]
    fn randomize_stays_in_unit_interval_and_is_reproducible() {
        let mut first = Matrix::zeros(8, 8);
        let mut second = Matrix::zeros(8, 8);
        first.randomize(&mut StdRng::seed_from_u64(42));
        second.randomize(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert!(first.as_slice().iter().all(|&x| (-1.0..=1.0).contains(&x)));
        assert!(first.as_slice().iter().any(|&x| x != 0.0));
    }
}
