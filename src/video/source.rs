use std::collections::VecDeque;

use crate::error::Result;
use crate::video::types::Frame;

/// Sequential access to the decoded frames of one video
///
/// Implementations must hand out frames in strict index order. A source that
/// cannot tell its frame rate returns `None` from [`FrameSource::fps`] and the
/// caller substitutes its configured default.
pub trait FrameSource {
    /// Declared frames per second, if known
    fn fps(&self) -> Option<f64>;

    /// Next frame in the stream, or `None` once the stream is exhausted
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn fps(&self) -> Option<f64> {
        (**self).fps()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        (**self).next_frame()
    }
}

/// Frame source over frames already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameSource {
    frames: VecDeque<Frame>,
    fps: Option<f64>,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<Frame>, fps: Option<f64>) -> Self {
        Self {
            frames: frames.into(),
            fps,
        }
    }

    /// Frames not yet handed out
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_yields_in_order() {
        let frames = vec![Frame::new_filled(1, 1, 10), Frame::new_filled(1, 1, 20)];
        let mut source = MemoryFrameSource::new(frames, Some(30.0));

        assert_eq!(source.fps(), Some(30.0));
        assert_eq!(source.next_frame().unwrap().unwrap().pixels(), &[10]);
        assert_eq!(source.next_frame().unwrap().unwrap().pixels(), &[20]);
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.remaining(), 0);
    }
}
