//! The trained score model: per-(general, character) weights and per-character bias.

use ndarray::{Array1, Array2};

use crate::vocabulary::TagId;

/// Linear character scores: `score(c | tags) = b[c] + Σ_{g in tags} a[g, c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreModel {
    a: Array2<f32>,
    b: Array1<f32>,
}

impl ScoreModel {
    /// Build a model, returning `None` when `a` has a different number of
    /// columns than `b` has entries.
    pub fn new(a: Array2<f32>, b: Array1<f32>) -> Option<Self> {
        (a.ncols() == b.len()).then_some(Self { a, b })
    }

    pub(crate) fn from_parts(a: Array2<f32>, b: Array1<f32>) -> Self {
        debug_assert_eq!(a.ncols(), b.len());
        Self { a, b }
    }

    /// Weight matrix, general tags × characters.
    pub fn a(&self) -> &Array2<f32> {
        &self.a
    }

    /// Bias vector, one entry per character.
    pub fn b(&self) -> &Array1<f32> {
        &self.b
    }

    /// `(general, character)` dimensions.
    pub fn dims(&self) -> (usize, usize) {
        self.a.dim()
    }

    /// Score every character given the observed general tags.
    ///
    /// Repeated ids count once; ids outside the model are ignored.
    pub fn score(&self, general: &[TagId]) -> Array1<f32> {
        let mut ids: Vec<TagId> = general
            .iter()
            .copied()
            .filter(|&g| g < self.a.nrows())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let mut scores = self.b.clone();
        for g in ids {
            scores += &self.a.row(g);
        }
        scores
    }

    /// Characters ordered by descending score, ties broken by id.
    pub fn rank(&self, general: &[TagId]) -> Vec<(TagId, f32)> {
        let mut ranked: Vec<(TagId, f32)> =
            self.score(general).iter().copied().enumerate().collect();
        ranked.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
        ranked
    }

    /// A copy with every weight and bias divided by `divisor`.
    pub fn scaled(&self, divisor: f32) -> Self {
        Self {
            a: &self.a / divisor,
            b: &self.b / divisor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> ScoreModel {
        ScoreModel::new(
            array![[2.0, -1.0, 0.5], [-0.5, 1.5, 0.0], [0.0, 0.25, 1.0]],
            array![-1.0, -2.0, 0.75],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_bias() {
        assert!(ScoreModel::new(Array2::zeros((2, 3)), Array1::zeros(2)).is_none());
    }

    #[test]
    fn test_score_adds_rows_to_bias() {
        let scores = model().score(&[0, 2]);
        assert_eq!(scores.to_vec(), vec![1.0, -2.75, 2.25]);
    }

    #[test]
    fn test_score_ignores_duplicates_and_unknown_ids() {
        let m = model();
        assert_eq!(m.score(&[1, 1, 99]), m.score(&[1]));
        assert_eq!(m.score(&[]), m.b().clone());
    }

    #[test]
    fn test_rank_orders_descending() {
        let ranked = model().rank(&[0]);
        let ids: Vec<TagId> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[test]
    fn test_scaling_preserves_ranking() {
        let m = model();
        let queries: [&[TagId]; 5] = [&[], &[0], &[1], &[0, 2], &[0, 1, 2]];
        for divisor in [0.5_f32, 1.5, 3.0, 40.0] {
            let scaled = m.scaled(divisor);
            for query in queries {
                let original: Vec<TagId> = m.rank(query).into_iter().map(|(id, _)| id).collect();
                let rescaled: Vec<TagId> =
                    scaled.rank(query).into_iter().map(|(id, _)| id).collect();
                assert_eq!(original, rescaled, "query {query:?}, divisor {divisor}");
            }
        }
    }
}
