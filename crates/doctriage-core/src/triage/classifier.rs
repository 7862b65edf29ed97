use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::model::{LinearClassifier, TrainedModel};

use super::vectorizer::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
}

fn linear_score(classifier: &LinearClassifier, vector: &FeatureVector) -> f64 {
    let dot: f64 = vector
        .iter()
        .map(|(&index, &weight)| classifier.weights.get(index).copied().unwrap_or(0.0) * weight)
        .sum();
    dot + classifier.bias
}

/// Picks the highest-scoring category and attaches a softmax confidence.
///
/// Categories are visited in name order and the running best is replaced
/// only on a strictly greater score, so an exact tie resolves to the
/// lexicographically smaller category name. An all-zero feature vector
/// scores every category at its bias alone and is classified normally;
/// there is no special "unknown" outcome and this function never fails.
#[must_use]
pub fn classify(vector: &FeatureVector, model: &TrainedModel) -> ClassificationResult {
    let mut scores = Vec::with_capacity(model.category_count());
    let mut best: Option<(Category, f64)> = None;

    for (category, classifier) in model.classifiers() {
        let score = linear_score(classifier, vector);
        scores.push(score);

        let replace = match best {
            Some((_, top)) => score > top,
            None => true,
        };
        if replace {
            best = Some((category, score));
        }
    }

    // A validated model always carries at least one classifier.
    let (category, top) = best.unwrap_or((Category::Report, 0.0));

    // Softmax share of the winning score, shifted by the maximum so large
    // margins cannot overflow exp. The winner's own term is exp(0) = 1, so
    // the denominator is always >= 1.
    let denominator: f64 = scores.iter().map(|score| (score - top).exp()).sum();
    let confidence = 1.0 / denominator;

    ClassificationResult {
        category,
        confidence,
    }
}

/// Full softmax distribution over every category the model knows.
#[must_use]
pub fn score_all(vector: &FeatureVector, model: &TrainedModel) -> BTreeMap<Category, f64> {
    let raw: BTreeMap<Category, f64> = model
        .classifiers()
        .map(|(category, classifier)| (category, linear_score(classifier, vector)))
        .collect();

    let max = raw.values().fold(f64::NEG_INFINITY, |acc, &score| acc.max(score));
    let mut shares: BTreeMap<Category, f64> = raw
        .into_iter()
        .map(|(category, score)| (category, (score - max).exp()))
        .collect();

    let sum: f64 = shares.values().sum();
    if sum > 0.0 {
        for share in shares.values_mut() {
            *share /= sum;
        }
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::{normalize, vectorize};

    #[test]
    fn test_indicator_term_wins() {
        let model = TrainedModel::fixture();
        let vector = vectorize(&normalize("please pay this invoice"), &model);

        let result = classify(&vector, &model);

        assert_eq!(result.category, Category::Invoice);
        assert!(result.confidence > 0.2);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let model = TrainedModel::fixture();
        let vector = vectorize(&normalize("court report invoice"), &model);

        let distribution = score_all(&vector, &model);
        let sum: f64 = distribution.values().sum();

        assert_eq!(distribution.len(), model.category_count());
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_agrees_with_distribution_argmax() {
        let model = TrainedModel::fixture();
        let vector = vectorize(&normalize("report on quarterly results"), &model);

        let result = classify(&vector, &model);
        let distribution = score_all(&vector, &model);

        let argmax = distribution
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(category, _)| *category)
            .unwrap();
        let top_share = distribution[&argmax];

        assert_eq!(result.category, argmax);
        assert!((result.confidence - top_share).abs() < 1e-12);
    }

    #[test]
    fn test_equal_scores_resolve_to_smaller_name() {
        // One "contract" and one "invoice" occurrence score those two
        // categories identically; contract must win every time.
        let model = TrainedModel::fixture();
        let vector = vectorize(&normalize("contract invoice"), &model);

        for _ in 0..10 {
            let result = classify(&vector, &model);
            assert_eq!(result.category, Category::Contract);
        }
    }

    #[test]
    fn test_all_zero_vector_classified_on_biases() {
        let model = TrainedModel::fixture();
        let vector = FeatureVector::new();

        let result = classify(&vector, &model);

        // All biases are zero in the fixture: a five-way tie, resolved to
        // the lexicographically smallest name with uniform confidence.
        assert_eq!(result.category, Category::Contract);
        assert!((result.confidence - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_in_unit_interval() {
        let model = TrainedModel::fixture();
        for text in ["", "invoice", "invoice invoice invoice court report"] {
            let vector = vectorize(&normalize(text), &model);
            let result = classify(&vector, &model);
            assert!(result.confidence > 0.0 && result.confidence <= 1.0);
        }
    }
}
