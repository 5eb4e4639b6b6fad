pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((expected - predicted)²)
    ///
    /// # Panics
    /// Panics if the slices differ in length.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        assert_eq!(predicted.len(), expected.len(), "predicted and expected must have equal length");
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| (e - p).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient written into `out`: 2·(predicted - expected)
    pub fn derivative_into(predicted: &[f64], expected: &[f64], out: &mut [f64]) {
        assert_eq!(predicted.len(), expected.len(), "predicted and expected must have equal length");
        for ((d, p), e) in out.iter_mut().zip(predicted).zip(expected) {
            *d = 2.0 * (p - e);
        }
    }

    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; predicted.len()];
        MseLoss::derivative_into(predicted, expected, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_zero_loss() {
        let v = [0.3, -0.7, 1.0];
        assert_eq!(MseLoss::loss(&v, &v), 0.0);
    }

    #[test]
    fn loss_is_mean_of_squares() {
        assert!((MseLoss::loss(&[1.0, 0.0], &[0.0, 0.0]) - 0.5).abs() < 1e-12);
        assert_eq!(MseLoss::derivative(&[1.0, 0.0], &[0.0, 0.5]), vec![2.0, -1.0]);
    }

    #[test]
    #[should_panic]
    fn length_mismatch_fails_fast() {
        MseLoss::loss(&[1.0], &[1.0, 2.0]);
    }
}
