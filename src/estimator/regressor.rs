//! Pre-fitted regressors evaluated on one scaled feature row.

use serde::Deserialize;

use super::scaler::check_len;
use crate::errors::ModelError;
use crate::models::house::N_FEATURES;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear(LinearModel),
    RandomForest(RandomForest),
}

impl Regressor {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Regressor::Linear(model) => check_len("linear coefficients", model.coefficients.len()),
            Regressor::RandomForest(forest) => forest.validate(),
        }
    }

    pub fn predict(&self, row: &[f64; N_FEATURES]) -> f64 {
        match self {
            Regressor::Linear(model) => model.predict(row),
            Regressor::RandomForest(forest) => forest.predict(row),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, row: &[f64; N_FEATURES]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(coef, x)| coef * x)
                .sum::<f64>()
    }
}

/// Bagged regression trees; the prediction is the mean over trees.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("random forest n_features", self.n_features)?;
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }

    pub fn predict(&self, row: &[f64; N_FEATURES]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        total / self.trees.len() as f64
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go left when `row[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

impl Tree {
    /// Children must point forward and stay in bounds, so every walk reaches a leaf.
    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        let invalid = |node: usize, reason: String| ModelError::InvalidTree { tree, node, reason };
        if self.nodes.is_empty() {
            return Err(invalid(0, "tree has no nodes".into()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= N_FEATURES {
                    return Err(invalid(idx, format!("feature {feature} out of range")));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(invalid(idx, format!("child {child} is not a later node")));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64; N_FEATURES]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}
