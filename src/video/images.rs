use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{InputError, Result};
use crate::video::source::FrameSource;
use crate::video::types::Frame;

/// Frame source over a directory of numbered still images (`frame_0001.png`, ...)
///
/// Files are ordered by name. Decoding happens a chunk at a time in parallel;
/// each chunk is collected back in file order before any frame is handed out.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next_index: usize,
    buffered: VecDeque<Frame>,
    chunk_size: usize,
    fps: Option<f64>,
}

impl ImageSequenceSource {
    pub fn open<P: AsRef<Path>>(directory: P, fps: Option<f64>, chunk_size: usize) -> Result<Self> {
        let directory = directory.as_ref();

        if !directory.exists() {
            return Err(InputError::NotFound {
                path: directory.display().to_string(),
            }.into());
        }

        if !directory.is_dir() {
            return Err(InputError::Unreadable {
                path: directory.display().to_string(),
                reason: "not a directory of frame images".to_string(),
            }.into());
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.is_file() && !is_hidden_file(&path) && is_image_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        info!("Found {} frame images in {}", paths.len(), directory.display());

        Ok(Self {
            paths,
            next_index: 0,
            buffered: VecDeque::new(),
            chunk_size: chunk_size.max(1),
            fps,
        })
    }

    /// Total number of frames in the sequence
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn decode_next_chunk(&mut self) -> Result<()> {
        let end = (self.next_index + self.chunk_size).min(self.paths.len());
        let chunk = &self.paths[self.next_index..end];

        let decoded: Vec<Result<Frame>> = chunk
            .par_iter()
            .map(|path| -> Result<Frame> {
                image::open(path)
                    .map(Frame::from_image)
                    .map_err(|e| InputError::Unreadable {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    }.into())
            })
            .collect();

        for frame in decoded {
            self.buffered.push_back(frame?);
        }

        debug!("Decoded frames {}..{}", self.next_index, end);
        self.next_index = end;
        Ok(())
    }
}

impl FrameSource for ImageSequenceSource {
    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.buffered.is_empty() && self.next_index < self.paths.len() {
            self.decode_next_chunk()?;
        }
        Ok(self.buffered.pop_front())
    }
}

/// Whether the path looks like a still image the `image` crate can decode
pub fn is_image_file(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "bmp" | "gif" | "tiff" | "tif" | "webp"
        ),
        None => false,
    }
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectorError;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    fn write_frame(dir: &Path, name: &str, intensity: u8) {
        GrayImage::from_pixel(4, 4, Luma([intensity]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_frames_come_back_in_name_order() {
        let dir = tempdir().unwrap();
        write_frame(dir.path(), "frame_0003.png", 30);
        write_frame(dir.path(), "frame_0001.png", 10);
        write_frame(dir.path(), "frame_0002.png", 20);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();
        write_frame(dir.path(), ".hidden.png", 99);

        let mut source = ImageSequenceSource::open(dir.path(), None, 2).unwrap();
        assert_eq!(source.len(), 3);
        assert!(!source.is_empty());
        assert_eq!(source.fps(), None);

        let mut seen = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            seen.push(frame.pixels()[0]);
        }
        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let result = ImageSequenceSource::open("/no/such/frames", Some(24.0), 4);
        assert!(matches!(
            result,
            Err(DirectorError::Input(InputError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_corrupt_image_is_unreadable() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("frame_0001.png"), b"definitely not a png").unwrap();

        let mut source = ImageSequenceSource::open(dir.path(), None, 4).unwrap();
        assert!(matches!(
            source.next_frame(),
            Err(DirectorError::Input(InputError::Unreadable { .. }))
        ));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.PNG")));
        assert!(is_image_file(Path::new("a.jpeg")));
        assert!(!is_image_file(Path::new("a.mp4")));
        assert!(!is_image_file(Path::new("frame")));
    }
}
