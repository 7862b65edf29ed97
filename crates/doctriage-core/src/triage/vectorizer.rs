use std::collections::HashMap;

use crate::model::TrainedModel;

/// Sparse feature representation: vocabulary index -> tf-idf weight.
pub type FeatureVector = HashMap<usize, f64>;

/// Maps a token sequence to a tf-idf weighted sparse vector over the
/// model's fixed vocabulary.
///
/// Tokens absent from the vocabulary are ignored; that is the unknown-term
/// policy, not an error. The vector is not length-normalized, matching the
/// calibration the linear classifiers were trained against. A token
/// sequence with no vocabulary hits yields an empty (all-zero) vector.
#[must_use]
pub fn vectorize(tokens: &[String], model: &TrainedModel) -> FeatureVector {
    let mut vector: FeatureVector = HashMap::new();

    for token in tokens {
        if let Some(index) = model.term_index(token) {
            *vector.entry(index).or_insert(0.0) += 1.0;
        }
    }

    for (index, weight) in &mut vector {
        *weight *= model.idf_weight(*index);
    }

    vector
}
