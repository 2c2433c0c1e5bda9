use crate::error::Result;
use crate::loss::check_lengths;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((target - output)²). An empty pair scores 0.
    pub fn loss(output: &[f32], target: &[f32]) -> Result<f32> {
        check_lengths(output, target)?;
        if output.is_empty() {
            return Ok(0.0);
        }

        let n = output.len() as f32;
        Ok(output.iter().zip(target.iter())
            .map(|(o, t)| (t - o).powi(2))
            .sum::<f32>() / n)
    }
}
