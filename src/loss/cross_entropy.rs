use crate::error::Result;
use crate::loss::check_lengths;

/// Cross-entropy score with Swan's argument order.
///
/// The weighting term is the network *output* and the log is taken of the
/// *target*: `L = -sum(output[i] * ln(max(target[i], 1e-4)))`. This is the
/// reverse of the textbook `-sum(target * ln(output))`; existing scores depend
/// on it, so it is kept as is.
pub struct CrossEntropyLoss;

/// Floor applied to targets before taking the log, keeping `ln` finite.
pub const TARGET_FLOOR: f32 = 1e-4;

impl CrossEntropyLoss {
    pub fn loss(output: &[f32], target: &[f32]) -> Result<f32> {
        check_lengths(output, target)?;
        Ok(output.iter().zip(target.iter())
            .map(|(o, t)| -o * t.max(TARGET_FLOOR).ln())
            .sum())
    }
}
