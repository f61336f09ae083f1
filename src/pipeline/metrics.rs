//! Hold-out evaluation metrics

use serde::Serialize;

use super::target::TargetMapping;

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Averaged metrics across classes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class report on the held-out rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Non-event class first, then the event class
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    /// `[[true_neg, false_pos], [false_neg, true_pos]]`
    pub confusion_matrix: [[usize; 2]; 2],
}

/// Fraction of matching labels; 0.0 for empty input
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Ratio that falls back to 0.0 when the denominator is zero
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl ClassificationReport {
    pub fn new(y_true: &[u8], y_pred: &[u8], mapping: &TargetMapping) -> Self {
        let mut matrix = [[0usize; 2]; 2];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            matrix[(t == 1) as usize][(p == 1) as usize] += 1;
        }

        let classes: Vec<ClassMetrics> = (0..2)
            .map(|class| {
                let tp = matrix[class][class] as f64;
                let predicted = (matrix[0][class] + matrix[1][class]) as f64;
                let support = matrix[class][0] + matrix[class][1];

                let precision = safe_ratio(tp, predicted);
                let recall = safe_ratio(tp, support as f64);
                let f1_score = safe_ratio(2.0 * precision * recall, precision + recall);

                ClassMetrics {
                    label: mapping.label(class as u8).to_string(),
                    precision,
                    recall,
                    f1_score,
                    support,
                }
            })
            .collect();

        let total: usize = classes.iter().map(|c| c.support).sum();
        let n_classes = classes.len() as f64;

        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |f: fn(&ClassMetrics) -> f64| {
            safe_ratio(
                classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>(),
                total as f64,
            )
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Self {
            accuracy: accuracy(y_true, y_pred),
            classes,
            macro_avg,
            weighted_avg,
            confusion_matrix: matrix,
        }
    }
}
