//! Closed-form naive-Bayes weights from aggregated counts.
//!
//! With additive smoothing `s`, for every general tag `g` and character `c`:
//!
//! ```text
//! freq_c  = (gc + s) / (n_c + 2s)                 P(g | c)
//! freq_nc = (n_g - gc + s) / (N - n_c + 2s)       P(g | not c)
//! a[g,c]  = ln freq_c + ln(1 - freq_nc) - ln freq_nc - ln(1 - freq_c)
//! b[c]    = Σ_g ln(1 - freq_c) - ln(1 - freq_nc)
//! ```
//!
//! so that `b[c] + Σ_{g observed} a[g,c]` is the log-likelihood ratio of `c`
//! being present. Calibration optionally divides everything by the mean
//! number of general tags per post, which tames the independence
//! assumption's overconfidence without changing rankings.

use ndarray::{Array1, Array2};

use crate::config::ScoringConfig;
use crate::counting::{GlobalCount, TagCounts};
use crate::error::ScoreError;
use crate::vocabulary::TagId;

use super::model::ScoreModel;

/// Derives a [`ScoreModel`] from a [`GlobalCount`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreDeriver {
    smoothing: f64,
    calibrate: bool,
}

impl ScoreDeriver {
    /// Create a deriver. `smoothing` must be finite and strictly positive,
    /// otherwise some frequencies can reach 0 or 1 and the logarithms blow up.
    pub fn new(smoothing: f64, calibrate: bool) -> Result<Self, ScoreError> {
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(ScoreError::InvalidSmoothing(smoothing));
        }
        Ok(Self {
            smoothing,
            calibrate,
        })
    }

    /// Create a deriver from the `[scoring]` config section.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoreError> {
        Self::new(config.smoothing, config.calibrate)
    }

    /// The additive smoothing constant.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Whether calibration is applied.
    pub fn calibrates(&self) -> bool {
        self.calibrate
    }

    /// Smoothed `(P(g | c), P(g | not c))` for one cell.
    pub fn frequencies(&self, counts: &TagCounts, g: TagId, c: TagId) -> (f64, f64) {
        let s = self.smoothing;
        let total = counts.num_posts() as f64;
        let with_c = f64::from(counts.character_count()[c]);
        let both = f64::from(counts.gc_count()[[g, c]]);
        let with_g = f64::from(counts.general_count()[g]);

        let freq_c = (both + s) / (with_c + 2.0 * s);
        let freq_nc = (with_g - both + s) / (total - with_c + 2.0 * s);
        (freq_c, freq_nc)
    }

    /// Compute the weight matrix and bias vector.
    pub fn derive(&self, counts: &GlobalCount) -> Result<ScoreModel, ScoreError> {
        counts
            .check_invariants()
            .map_err(ScoreError::InconsistentCounts)?;

        let (general_len, character_len) = counts.dims();
        let mut a = Array2::<f64>::zeros((general_len, character_len));
        let mut b = Array1::<f64>::zeros(character_len);

        for c in 0..character_len {
            let mut bias = 0.0;
            for g in 0..general_len {
                let (freq_c, freq_nc) = self.frequencies(counts, g, c);
                // ln(1 - p) via ln_1p keeps precision for tiny frequencies.
                let log_not_c = (-freq_c).ln_1p();
                let log_not_nc = (-freq_nc).ln_1p();
                a[[g, c]] = freq_c.ln() + log_not_nc - freq_nc.ln() - log_not_c;
                bias += log_not_c - log_not_nc;
            }
            b[c] = bias;
        }

        if self.calibrate {
            match counts.mean_general_tags_per_post() {
                Some(mean) if mean > 0.0 => {
                    tracing::debug!("Calibrating weights by mean general tags per post ({mean:.3})");
                    a /= mean;
                    b /= mean;
                }
                _ => tracing::warn!(
                    "Skipping calibration: corpus has no retained posts with general tags"
                ),
            }
        }

        let a = a.mapv(|x| x as f32);
        let b = b.mapv(|x| x as f32);

        if let Some(((g, c), _)) = a.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(ScoreError::NonFinite(format!("a[{g},{c}]")));
        }
        if let Some(c) = b.iter().position(|x| !x.is_finite()) {
            return Err(ScoreError::NonFinite(format!("b[{c}]")));
        }

        tracing::info!(
            "Derived scores for {} characters over {} general tags (smoothing {}, calibration {})",
            character_len,
            general_len,
            self.smoothing,
            if self.calibrate { "on" } else { "off" },
        );

        Ok(ScoreModel::from_parts(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::Aggregator;
    use ndarray::array;

    /// Counts from three posts: {a; X}, {a, b; Y}, and {b; X, Y} excluded.
    fn scenario_counts() -> GlobalCount {
        let counts =
            TagCounts::from_parts(2, array![2, 1], array![1, 1], array![[1, 1], [0, 1]]).unwrap();
        GlobalCount::freeze(counts)
    }

    /// Closed-form reference computed straight from the formulas.
    fn reference(s: f64, counts: &TagCounts) -> (Vec<Vec<f64>>, Vec<f64>) {
        let (gl, cl) = counts.dims();
        let n = counts.num_posts() as f64;
        let mut a = vec![vec![0.0; cl]; gl];
        let mut b = vec![0.0; cl];
        for c in 0..cl {
            for g in 0..gl {
                let gc = f64::from(counts.gc_count()[[g, c]]);
                let nc = f64::from(counts.character_count()[c]);
                let ng = f64::from(counts.general_count()[g]);
                let fc = (gc + s) / (nc + 2.0 * s);
                let fnc = (ng - gc + s) / (n - nc + 2.0 * s);
                a[g][c] = fc.ln() + (1.0 - fnc).ln() - fnc.ln() - (1.0 - fc).ln();
                b[c] += (1.0 - fc).ln() - (1.0 - fnc).ln();
            }
        }
        (a, b)
    }

    #[test]
    fn test_rejects_non_positive_smoothing() {
        assert!(matches!(
            ScoreDeriver::new(0.0, true),
            Err(ScoreError::InvalidSmoothing(_))
        ));
        assert!(ScoreDeriver::new(-1.0, false).is_err());
        assert!(ScoreDeriver::new(f64::INFINITY, false).is_err());
        assert!(ScoreDeriver::new(1e-9, false).is_ok());
    }

    #[test]
    fn test_scenario_matches_closed_form() {
        let counts = scenario_counts();
        let model = ScoreDeriver::new(0.1, false).unwrap().derive(&counts).unwrap();
        let (a, b) = reference(0.1, &counts);

        assert_eq!(model.a().dim(), (2, 2));
        for g in 0..2 {
            for c in 0..2 {
                assert!((f64::from(model.a()[[g, c]]) - a[g][c]).abs() < 1e-5);
            }
        }
        for c in 0..2 {
            assert!((f64::from(model.b()[c]) - b[c]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_scenario_calibrated_divides_by_mean_tags() {
        let counts = scenario_counts();
        let model = ScoreDeriver::new(0.1, true).unwrap().derive(&counts).unwrap();
        let (a, b) = reference(0.1, &counts);
        // (2 + 1) general tag occurrences over 2 posts
        let mean = 1.5;

        for g in 0..2 {
            for c in 0..2 {
                assert!((f64::from(model.a()[[g, c]]) - a[g][c] / mean).abs() < 1e-5);
            }
        }
        for c in 0..2 {
            assert!((f64::from(model.b()[c]) - b[c] / mean).abs() < 1e-5);
        }
    }

    #[test]
    fn test_scenario_weights_have_expected_sign() {
        let model = ScoreDeriver::new(0.1, false)
            .unwrap()
            .derive(&scenario_counts())
            .unwrap();
        // b only ever appears alongside Y, so it is evidence for Y over X.
        assert!(model.a()[[1, 1]] > 0.0);
        assert!(model.a()[[1, 0]] < 0.0);
    }

    #[test]
    fn test_frequencies_strictly_inside_unit_interval() {
        let counts = TagCounts::from_parts(
            5,
            array![5, 0, 3],
            array![5, 0],
            array![[5, 0], [0, 0], [3, 0]],
        )
        .unwrap();
        for s in [1e-6, 0.1, 1.0, 10.0] {
            let deriver = ScoreDeriver::new(s, false).unwrap();
            for g in 0..3 {
                for c in 0..2 {
                    let (fc, fnc) = deriver.frequencies(&counts, g, c);
                    assert!(fc > 0.0 && fc < 1.0, "freq_c={fc} at s={s}");
                    assert!(fnc > 0.0 && fnc < 1.0, "freq_nc={fnc} at s={s}");
                }
            }
            let model = deriver.derive(&GlobalCount::freeze(counts.clone())).unwrap();
            assert!(model.a().iter().all(|x| x.is_finite()));
            assert!(model.b().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_empty_corpus_skips_calibration() {
        let global = Aggregator::merge(2, 2, std::iter::empty()).unwrap();
        let model = ScoreDeriver::new(0.1, true).unwrap().derive(&global).unwrap();
        // Every frequency is 1/2, so every weight and bias is zero.
        assert!(model.a().iter().all(|&x| x.abs() < 1e-6));
        assert!(model.b().iter().all(|&x| x.abs() < 1e-6));
    }

    #[test]
    fn test_inconsistent_counts_rejected() {
        let counts = TagCounts::from_parts(1, array![1], array![1], array![[3]]).unwrap();
        let err = ScoreDeriver::new(0.1, false)
            .unwrap()
            .derive(&GlobalCount::freeze(counts))
            .unwrap_err();
        assert!(matches!(err, ScoreError::InconsistentCounts(_)));
    }
}
