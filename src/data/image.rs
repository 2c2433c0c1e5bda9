use crate::error::{Result, SwanError};
use crate::math::matrix::Matrix;

/// Brightness ramp for terminal previews, darkest first.
const LIGHT_VALUES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lays one image out as a `rows x cols` matrix of raw `0..=255` values.
pub fn image_to_matrix(pixels: &[u8], rows: usize, cols: usize) -> Result<Matrix> {
    Matrix::from_vec(rows, cols, pixels.iter().map(|&px| f32::from(px)).collect())
}

/// Flattens one image into a `1 x n` network input.
///
/// Pixel values stay in `0..=255`; callers wanting `[0, 1]` inputs can
/// `apply(|x| x / 255.0)` to the result.
pub fn image_to_input(pixels: &[u8]) -> Matrix {
    Matrix::row_vector(pixels.iter().map(|&px| f32::from(px)).collect())
}

/// One-hot target row for a class label.
pub fn one_hot(label: u8, classes: usize) -> Result<Vec<f32>> {
    let class = usize::from(label);
    if class >= classes {
        return Err(SwanError::Dataset(format!(
            "label {} is out of range for {} classes",
            label, classes
        )));
    }
    let mut target = vec![0.0; classes];
    target[class] = 1.0;
    Ok(target)
}

/// Renders an image as ASCII art, one line per pixel row.
pub fn render_ascii(pixels: &[u8], rows: usize, cols: usize) -> Result<String> {
    if pixels.len() != rows * cols {
        return Err(SwanError::ShapeMismatch {
            expected: (rows, cols),
            found: (1, pixels.len()),
        });
    }

    let mut out = String::with_capacity(rows * (cols + 1));
    if cols == 0 {
        return Ok(out);
    }
    for row in pixels.chunks_exact(cols) {
        for &px in row {
            let level = (f32::from(px) / 255.0 * 10.0).round() as usize;
            out.push(LIGHT_VALUES[level.min(LIGHT_VALUES.len() - 1)]);
        }
        out.push('\n');
    }
    Ok(out)
}
