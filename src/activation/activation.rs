use serde::{Deserialize, Serialize};

/// Pre-scale applied before the softsign squash.
pub const SOFTSIGN_GAIN: f64 = 6.0;

/// Lower bound on the divisor used by [`normalize`].
pub const NORMALIZE_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// `v = 6x; v / (1 + |v|)`, bounded to `(-1, 1)`. Used on hidden layers.
    ScaledSoftsign,
    /// No squash. Used on the output layer.
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ScaledSoftsign => {
                let v = x * SOFTSIGN_GAIN;
                v / (1.0 + v.abs())
            }
            ActivationFunction::Identity => x,
        }
    }

    /// Exact derivative with respect to the pre-activation value `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ScaledSoftsign => {
                let d = 1.0 + (SOFTSIGN_GAIN * x).abs();
                SOFTSIGN_GAIN / (d * d)
            }
            ActivationFunction::Identity => 1.0,
        }
    }

    /// Derivative evaluated on the activation output `a` instead of the
    /// pre-activation value: `6 / (1 + |a|)^2`.
    ///
    /// This is not the true softsign derivative; it is the formula the
    /// reference trainer uses and is kept for parity. Select
    /// `DerivativeMode::PreActivation` for the exact form.
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        match self {
            ActivationFunction::ScaledSoftsign => {
                let d = 1.0 + a.abs();
                SOFTSIGN_GAIN / (d * d)
            }
            ActivationFunction::Identity => 1.0,
        }
    }
}

/// Which value the backward pass feeds into the activation derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeMode {
    /// `derivative_from_output(activation)`.
    #[default]
    PostActivation,
    /// `derivative(pre_activation)`, using the value retained by the forward pass.
    PreActivation,
}

impl DerivativeMode {
    pub fn evaluate(&self, function: ActivationFunction, pre: f64, post: f64) -> f64 {
        match self {
            DerivativeMode::PostActivation => function.derivative_from_output(post),
            DerivativeMode::PreActivation => function.derivative(pre),
        }
    }
}

/// Divides every value by `max(0.01, max |v|)`, in place.
///
/// An all-zero layer stays all-zero; values below the floor are scaled up by
/// `1 / 0.01`.
pub fn normalize(values: &mut [f64]) {
    let max = values
        .iter()
        .fold(NORMALIZE_FLOOR, |m, v| if v.abs() > m { v.abs() } else { m });
    for v in values.iter_mut() {
        *v /= max;
    }
}

/// Linear min-max rescaling into `[0, 1]`, in place.
///
/// This is not a probability softmax: no exponentials, and the result does
/// not sum to one. A constant (or empty) vector maps to all zeros.
pub fn range_normalize(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = max - min;
    for v in values.iter_mut() {
        *v = if span > 0.0 { (*v - min) / span } else { 0.0 };
    }
}
