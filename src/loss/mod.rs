pub mod mse;
pub mod cross_entropy;
pub mod loss_type;

pub use mse::MseLoss;
pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::LossType;

use crate::error::{Result, SwanError};

fn check_lengths(output: &[f32], target: &[f32]) -> Result<()> {
    if output.len() != target.len() {
        return Err(SwanError::DimensionMismatch {
            op: "loss",
            lhs: (1, output.len()),
            rhs: (1, target.len()),
        });
    }
    Ok(())
}
