use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::{cross_entropy::CrossEntropyLoss, mse::MseLoss};

/// Selects how a prediction is scored against its target.
///
/// - `MeanSquaredError` — mean of squared differences.
/// - `CrossEntropy`     — see `CrossEntropyLoss` for the argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    MeanSquaredError,
    CrossEntropy,
}

impl LossType {
    pub fn evaluate(&self, output: &[f32], target: &[f32]) -> Result<f32> {
        match self {
            LossType::MeanSquaredError => MseLoss::loss(output, target),
            LossType::CrossEntropy => CrossEntropyLoss::loss(output, target),
        }
    }
}
