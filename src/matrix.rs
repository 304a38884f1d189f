//! Pairwise matchup matrix built from sparse simulation observations.

use crate::error::{FormatError, ValidationError};
use crate::table::{Row, Value};

/// One sampled matchup: how often entities `t1` and `t2` were paired across
/// all simulation trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairObservation {
    pub t1: i64,
    pub t2: i64,
    pub total: i64,
}

pub fn observations_from_rows(rows: &[Row]) -> Result<Vec<PairObservation>, FormatError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            Ok(PairObservation {
                t1: int_cell(row, idx, "t1")?,
                t2: int_cell(row, idx, "t2")?,
                total: int_cell(row, idx, "total")?,
            })
        })
        .collect()
}

fn int_cell(row: &Row, idx: usize, column: &'static str) -> Result<i64, FormatError> {
    row.get(column)
        .and_then(Value::as_int)
        .ok_or(FormatError::BadColumn { row: idx, column })
}

/// Square, symmetric percentage matrix with a zero diagonal. Symmetry holds
/// by construction: every observation writes both (i,j) and (j,i), so no
/// downstream stage re-symmetrizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl ProbMatrix {
    pub fn build(
        observations: &[PairObservation],
        n: usize,
        simulations: i64,
    ) -> Result<Self, ValidationError> {
        if simulations <= 0 {
            return Err(ValidationError::NoTrials);
        }
        let mut cells = vec![0.0; n * n];
        for obs in observations {
            let i = checked_index(obs.t1, n)?;
            let j = checked_index(obs.t2, n)?;
            if i == j {
                return Err(ValidationError::SelfPair { index: i });
            }
            let pct = 100.0 * obs.total as f64 / simulations as f64;
            cells[i * n + j] = pct;
            cells[j * n + i] = pct;
        }
        Ok(Self { n, cells })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.n + col]
    }
}

fn checked_index(raw: i64, n: usize) -> Result<usize, ValidationError> {
    if raw < 0 || raw as usize >= n {
        return Err(ValidationError::IndexOutOfRange { index: raw, len: n });
    }
    Ok(raw as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(t1: i64, t2: i64, total: i64) -> PairObservation {
        PairObservation { t1, t2, total }
    }

    #[test]
    fn writes_both_triangles() {
        let m = ProbMatrix::build(&[obs(0, 1, 30), obs(2, 3, 18)], 4, 100).unwrap();
        assert_eq!(m.get(0, 1), 30.0);
        assert_eq!(m.get(1, 0), 30.0);
        assert_eq!(m.get(2, 3), 18.0);
        assert_eq!(m.get(3, 2), 18.0);
    }

    #[test]
    fn unobserved_pairs_stay_zero() {
        let m = ProbMatrix::build(&[obs(0, 1, 30)], 4, 100).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                if (i, j) != (0, 1) && (i, j) != (1, 0) {
                    assert_eq!(m.get(i, j), 0.0, "cell ({i},{j})");
                }
            }
        }
    }

    #[test]
    fn diagonal_is_zero() {
        let m = ProbMatrix::build(&[obs(0, 1, 50)], 4, 100).unwrap();
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = ProbMatrix::build(&[obs(0, 4, 1)], 4, 100).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::IndexOutOfRange { index: 4, len: 4 }
        ));
        let err = ProbMatrix::build(&[obs(-1, 2, 1)], 4, 100).unwrap_err();
        assert!(matches!(err, ValidationError::IndexOutOfRange { .. }));
    }

    #[test]
    fn self_pair_is_rejected() {
        let err = ProbMatrix::build(&[obs(2, 2, 1)], 4, 100).unwrap_err();
        assert!(matches!(err, ValidationError::SelfPair { index: 2 }));
    }

    #[test]
    fn zero_trials_is_rejected() {
        let err = ProbMatrix::build(&[], 4, 0).unwrap_err();
        assert!(matches!(err, ValidationError::NoTrials));
    }
}
