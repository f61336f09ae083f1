//! CART decision tree for binary targets
//!
//! Splits are chosen by Gini impurity reduction over a random subset of
//! features, the way a random forest grows its members. Leaves store the
//! fraction of event rows that reached them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Minimum impurity reduction for a split to be accepted
const MIN_GAIN: f64 = 1e-12;

/// Values closer than this are treated as equal (no split between them)
const VALUE_TOLERANCE: f64 = 1e-10;

/// Growth limits for one tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split before settling for the best one found
    pub max_features: usize,
}

/// Tree node stored in a flat arena
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        /// Probability of the event class
        probability: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        /// Rows with `value <= threshold` go left
        threshold: f64,
        left: usize,
        right: usize,
        samples: usize,
    },
}

/// A fitted decision tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Impurity decrease per feature, normalized to sum to 1 (all zero for a stump)
    importances: Vec<f64>,
}

/// Calculate Gini impurity for a set of samples
///
/// For binary classification: Gini = 2 * p * (1 - p)
/// where p is the proportion of positive class (events).
pub fn gini_impurity(events: f64, non_events: f64) -> f64 {
    let total = events + non_events;
    if total == 0.0 {
        return 0.0;
    }
    let p = events / total;
    2.0 * p * (1.0 - p)
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    target: &'a [u8],
    params: TreeParams,
    rng: StdRng,
    n_features: usize,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed).
    pub fn fit(
        features: &[Vec<f64>],
        target: &[u8],
        mut samples: Vec<usize>,
        params: TreeParams,
        rng: StdRng,
    ) -> Self {
        let n_features = features.first().map_or(0, |row| row.len());
        let mut builder = TreeBuilder {
            features,
            target,
            params,
            rng,
            n_features,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };

        if samples.is_empty() {
            builder.nodes.push(Node::Leaf {
                probability: 0.0,
                samples: 0,
            });
        } else {
            builder.grow(&mut samples, 0);
        }

        let mut importances = builder.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Self {
            nodes: builder.nodes,
            importances,
        }
    }

    /// Probability of the event class for one row
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { probability, .. } => return *probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Depth of the deepest leaf (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }
}

impl<'a> TreeBuilder<'a> {
    /// Grow the subtree for `samples` and return its node index
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let n = samples.len();
        let events = samples.iter().filter(|&&i| self.target[i] == 1).count();

        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            probability: events as f64 / n as f64,
            samples: n,
        });

        let impurity = gini_impurity(events as f64, (n - events) as f64);
        if depth >= self.params.max_depth
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || impurity <= MIN_GAIN
        {
            return node_id;
        }

        let Some(split) = self.find_best_split(samples, events, impurity) else {
            return node_id;
        };

        // Partition in place: rows going left first
        let mut mid = 0;
        for i in 0..n {
            if self.features[samples[i]][split.feature] <= split.threshold {
                samples.swap(i, mid);
                mid += 1;
            }
        }

        self.importances[split.feature] += n as f64 * split.gain;

        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            samples: n,
        };

        node_id
    }

    /// Find the split that maximizes Gini reduction.
    ///
    /// Features are visited in random order. The search stops after
    /// `max_features` features once a valid split exists, and keeps going
    /// past that limit while none has been found.
    fn find_best_split(
        &mut self,
        samples: &[usize],
        total_events: usize,
        parent_impurity: f64,
    ) -> Option<SplitCandidate> {
        let features = self.features;
        let target = self.target;
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf;

        let mut candidates: Vec<usize> = (0..self.n_features).collect();
        candidates.shuffle(&mut self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, u8)> = Vec::with_capacity(n);

        for (visited, &feature) in candidates.iter().enumerate() {
            if visited >= self.params.max_features && best.is_some() {
                break;
            }

            pairs.clear();
            pairs.extend(samples.iter().map(|&i| (features[i][feature], target[i])));
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            // Constant within this node
            if (pairs[n - 1].0 - pairs[0].0).abs() < VALUE_TOLERANCE {
                continue;
            }

            let mut left_events = 0usize;
            for i in 0..n - 1 {
                if pairs[i].1 == 1 {
                    left_events += 1;
                }

                let left_count = i + 1;
                let right_count = n - left_count;
                if left_count < min_leaf || right_count < min_leaf {
                    continue;
                }

                // Skip if this value equals the next (avoid splitting within same value)
                if (pairs[i + 1].0 - pairs[i].0).abs() < VALUE_TOLERANCE {
                    continue;
                }

                let right_events = total_events - left_events;
                let left_gini =
                    gini_impurity(left_events as f64, (left_count - left_events) as f64);
                let right_gini =
                    gini_impurity(right_events as f64, (right_count - right_events) as f64);

                let weighted_child_gini =
                    (left_count as f64 * left_gini + right_count as f64 * right_gini) / n as f64;
                let gain = parent_impurity - weighted_child_gini;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(pairs[i].0, pairs[i + 1].0),
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Threshold between two adjacent distinct values, never equal to the upper one
fn midpoint(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid >= upper {
        lower
    } else {
        mid
    }
}
