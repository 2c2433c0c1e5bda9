pub mod idx;
pub mod image;

pub use idx::{Dataset, IdxImages};
pub use image::{image_to_input, image_to_matrix, one_hot, render_ascii};
