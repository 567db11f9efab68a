use crate::StridedVecView;

/// Sum with a fixed accumulation order, so results are reproducible.
pub fn sum(v: &[f64]) -> f64 {
    let mut o = 0.;
    for e in v.iter() {
        o += *e;
    }
    o
}

pub fn mean(v: &[f64]) -> f64 {
    sum(&v) / (v.len() as f64)
}

/// Dot product of a parameter vector with one feature row.
pub fn dot(params: &[f64], row: &StridedVecView<f64>) -> f64 {
    let mut o = 0.;
    for (j, w) in params.iter().enumerate() {
        o += w * row[j];
    }
    o
}
