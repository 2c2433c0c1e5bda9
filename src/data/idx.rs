//! Readers for the IDX binary format used by MNIST and its derivatives.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   magic 0x00000803 (2051)
//! bytes  4-7:   N     (number of images)
//! bytes  8-11:  rows  (image height in pixels)
//! bytes 12-15:  cols  (image width in pixels)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   magic 0x00000801 (2049)
//! bytes  4-7:   N     (number of labels)
//! bytes  8..:   N bytes, one class index each
//! ```
//!
//! Header integers are big-endian. Files whose magic reads byte-swapped are
//! accepted too, and their header is then read little-endian.
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SwanError};

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Pixel data of an IDX3 file, kept as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<u8>,
}

impl IdxImages {
    pub fn pixels_per_image(&self) -> usize {
        self.rows * self.cols
    }

    /// Bytes of the `index`-th image, or `None` past the end.
    pub fn image(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let n = self.pixels_per_image();
        self.pixels.get(index * n..(index + 1) * n)
    }
}

/// Images and labels loaded side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub images: IdxImages,
    pub labels: Vec<u8>,
}

impl Dataset {
    /// Reads and cross-checks an image file and its label file.
    pub fn load<P: AsRef<Path>>(images_path: P, labels_path: P) -> Result<Dataset> {
        let image_bytes = std::fs::read(images_path.as_ref())?;
        let label_bytes = std::fs::read(labels_path.as_ref())?;
        Dataset::from_bytes(&image_bytes, &label_bytes)
    }

    pub fn from_bytes(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Dataset> {
        let images = parse_images(image_bytes)?;
        let labels = parse_labels(label_bytes)?;

        if images.count != labels.len() {
            return Err(SwanError::Dataset(format!(
                "image file declares {} items but label file declares {}",
                images.count,
                labels.len()
            )));
        }

        Ok(Dataset { images, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Reads the header word at `offset` honoring the detected byte order.
fn read_u32(bytes: &[u8], offset: usize, big_endian: bool) -> u32 {
    let word = [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]];
    if big_endian {
        u32::from_be_bytes(word)
    } else {
        u32::from_le_bytes(word)
    }
}

/// Returns whether the header is big-endian, or an error for a foreign magic.
fn detect_order(bytes: &[u8], expected: u32, what: &str) -> Result<bool> {
    let magic = read_u32(bytes, 0, true);
    if magic == expected {
        Ok(true)
    } else if magic == expected.swap_bytes() {
        Ok(false)
    } else {
        Err(SwanError::Dataset(format!(
            "{} file: magic number {} (0x{:08X}) is not {}",
            what, magic, magic, expected
        )))
    }
}

pub fn parse_images(bytes: &[u8]) -> Result<IdxImages> {
    if bytes.len() < IMAGE_HEADER_LEN {
        return Err(SwanError::Dataset(format!(
            "image file too short: expected at least {} header bytes, got {}",
            IMAGE_HEADER_LEN,
            bytes.len()
        )));
    }

    let big_endian = detect_order(bytes, IMAGE_MAGIC, "image")?;
    let count = read_u32(bytes, 4, big_endian) as usize;
    let rows = read_u32(bytes, 8, big_endian) as usize;
    let cols = read_u32(bytes, 12, big_endian) as usize;

    let data_len = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(count))
        .ok_or_else(|| {
            SwanError::Dataset(format!(
                "image file: {} images of {}x{} pixels overflow usize",
                count, rows, cols
            ))
        })?;

    let available = bytes.len() - IMAGE_HEADER_LEN;
    if available < data_len {
        return Err(SwanError::Dataset(format!(
            "image file truncated: header declares {} images of {}x{} pixels \
             ({} bytes), but only {} bytes follow the header",
            count, rows, cols, data_len, available
        )));
    }

    debug!(count, rows, cols, big_endian, "parsed IDX image header");

    Ok(IdxImages {
        count,
        rows,
        cols,
        pixels: bytes[IMAGE_HEADER_LEN..IMAGE_HEADER_LEN + data_len].to_vec(),
    })
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < LABEL_HEADER_LEN {
        return Err(SwanError::Dataset(format!(
            "label file too short: expected at least {} header bytes, got {}",
            LABEL_HEADER_LEN,
            bytes.len()
        )));
    }

    let big_endian = detect_order(bytes, LABEL_MAGIC, "label")?;
    let count = read_u32(bytes, 4, big_endian) as usize;

    let available = bytes.len() - LABEL_HEADER_LEN;
    if available < count {
        return Err(SwanError::Dataset(format!(
            "label file truncated: header declares {} labels but only {} bytes follow the header",
            count, available
        )));
    }

    debug!(count, big_endian, "parsed IDX label header");

    Ok(bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + count].to_vec())
}
