use crate::error::{Error, Result};

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting
pub fn matrix_inverse(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = matrix.len();

    if n == 0 {
        return Err(Error::InvalidInput("matrix is empty".into()));
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(Error::InvalidInput("matrix must be square".into()));
    }

    // Augmented matrix [A|I]
    let mut augmented: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut extended = Vec::with_capacity(2 * n);
            extended.extend_from_slice(row);
            extended.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            extended
        })
        .collect();

    for i in 0..n {
        let mut max_row = i;
        let mut max_val = augmented[i][i].abs();
        for (j, row) in augmented.iter().enumerate().skip(i + 1) {
            if row[i].abs() > max_val {
                max_row = j;
                max_val = row[i].abs();
            }
        }

        if max_val < 1e-12 {
            return Err(Error::ComputationError("matrix is singular".into()));
        }

        augmented.swap(i, max_row);

        let pivot = augmented[i][i];
        for value in augmented[i].iter_mut() {
            *value /= pivot;
        }

        let pivot_row = augmented[i].clone();
        for (j, row) in augmented.iter_mut().enumerate() {
            if j != i {
                let factor = row[i];
                for (value, p) in row.iter_mut().zip(pivot_row.iter()) {
                    *value -= factor * p;
                }
            }
        }
    }

    Ok(augmented.into_iter().map(|row| row[n..].to_vec()).collect())
}
