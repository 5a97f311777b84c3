//! Single-qubit computational-basis measurement
//!
//! Measurement is split into three pure steps so that callers can inspect
//! or override each one: compute `P(1)`, pick an outcome from a uniform
//! draw, then collapse and renormalize.

use num_complex::Complex64;

/// Outcomes with probability at or below this are never selected
pub const PROBABILITY_EPSILON: f64 = 1e-12;

/// Probability that `qubit` reads 1
pub fn probability_of_one(state: &[Complex64], qubit: usize) -> f64 {
    let mask = 1usize << qubit;
    state
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask != 0)
        .map(|(_, amp)| amp.norm_sqr())
        .sum()
}

/// Pick an outcome for a uniform `draw` in `[0, 1)`
///
/// Returns the outcome and its probability. A branch whose probability is
/// effectively zero is never returned, even if rounding in `p_one` would
/// otherwise select it.
///
/// # Example
/// ```
/// use qexec_state::measurement::select_outcome;
///
/// assert_eq!(select_outcome(0.25, 0.1), (1, 0.25));
/// assert_eq!(select_outcome(0.25, 0.7), (0, 0.75));
/// // P(1) = 0 can never yield 1
/// assert_eq!(select_outcome(0.0, 0.0).0, 0);
/// ```
pub fn select_outcome(p_one: f64, draw: f64) -> (u8, f64) {
    let p_one = p_one.clamp(0.0, 1.0);
    let (outcome, probability) = if draw < p_one {
        (1, p_one)
    } else {
        (0, 1.0 - p_one)
    };

    if probability > PROBABILITY_EPSILON {
        (outcome, probability)
    } else {
        (1 - outcome, 1.0 - probability)
    }
}

/// Project `qubit` onto `outcome` and rescale survivors by `1 / sqrt(probability)`
pub fn collapse(state: &mut [Complex64], qubit: usize, outcome: u8, probability: f64) {
    let mask = 1usize << qubit;
    let wanted = if outcome == 0 { 0 } else { mask };
    let scale = 1.0 / probability.sqrt();

    for (i, amp) in state.iter_mut().enumerate() {
        if i & mask == wanted {
            *amp *= scale;
        } else {
            *amp = Complex64::new(0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plus_zero() -> Vec<Complex64> {
        // (|00> + |01>) / sqrt(2): qubit 0 in |+>, qubit 1 in |0>
        let h = std::f64::consts::FRAC_1_SQRT_2;
        vec![
            Complex64::new(h, 0.0),
            Complex64::new(h, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_probability_of_one() {
        let state = plus_zero();
        assert_relative_eq!(probability_of_one(&state, 0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(probability_of_one(&state, 1), 0.0);
    }

    #[test]
    fn test_select_outcome_thresholds() {
        assert_eq!(select_outcome(0.5, 0.49).0, 1);
        assert_eq!(select_outcome(0.5, 0.5).0, 0);
        assert_eq!(select_outcome(1.0, 0.999).0, 1);
    }

    #[test]
    fn test_zero_probability_branch_is_avoided() {
        // Rounding leaves a sliver of P(1) that the draw lands in
        let (outcome, p) = select_outcome(1e-17, 0.0);
        assert_eq!(outcome, 0);
        assert_relative_eq!(p, 1.0, epsilon = 1e-12);

        let (outcome, _) = select_outcome(1.0 + 1e-15, 0.999_999);
        assert_eq!(outcome, 1);
    }

    #[test]
    fn test_collapse_renormalizes() {
        let mut state = plus_zero();
        collapse(&mut state, 0, 1, 0.5);

        assert_eq!(state[0], Complex64::new(0.0, 0.0));
        assert_relative_eq!(state[1].re, 1.0, epsilon = 1e-12);
        let norm: f64 = state.iter().map(|a| a.norm_sqr()).sum();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
    }
}
