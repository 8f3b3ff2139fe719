use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Represents a single decoded video frame reduced to 8-bit grayscale
///
/// This is a thin wrapper around a luma image buffer exposing the per-frame
/// measurements the shot segmenter needs.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: GrayImage,
}

impl Frame {
    /// Create a frame with every pixel set to the given intensity
    pub fn new_filled(width: u32, height: u32, intensity: u8) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Luma([intensity]));
        Self { buffer }
    }

    /// Create a frame from raw row-major grayscale bytes
    pub fn from_gray_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
    }

    /// Convert any decoded image to a grayscale frame
    pub fn from_image(image: DynamicImage) -> Self {
        let buffer = match image {
            DynamicImage::ImageLuma8(img) => img,
            other => other.to_luma8(),
        };
        Self { buffer }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Raw row-major intensities
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Whether two frames share the same geometry
    pub fn same_size(&self, other: &Frame) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }
}

/// Basic stream information reported by a frame source
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Declared frame rate, if the container reports a usable one
    pub fps: Option<f64>,
}
