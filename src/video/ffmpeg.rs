// src/video/ffmpeg.rs - Streams grayscale frames out of an external FFmpeg process

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use serde::Deserialize;
use tracing::{debug, info, trace, warn};

use crate::error::{AnalysisError, DirectorError, InputError, Result};
use crate::video::source::FrameSource;
use crate::video::types::{Frame, VideoMetadata};

/// Frame source backed by `ffprobe` + `ffmpeg` on the PATH
///
/// The first video stream is decoded to raw 8-bit gray and read from the
/// child's stdout one frame (`width * height` bytes) at a time, so memory use
/// stays flat regardless of video length.
pub struct FfmpegFrameSource {
    path: PathBuf,
    metadata: VideoMetadata,
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_tail: Option<JoinHandle<String>>,
    frame_len: usize,
    frames_read: usize,
    finished: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

impl FfmpegFrameSource {
    /// Probe and start decoding `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::NotFound {
                path: path.display().to_string(),
            }.into());
        }

        let metadata = Self::probe(path)?;
        info!("Video stream: {}x{} @ {}",
              metadata.width, metadata.height,
              metadata.fps.map(|fps| format!("{:.3} fps", fps)).unwrap_or_else(|| "unknown fps".to_string()));

        let mut command = Command::new("ffmpeg");
        command
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "gray", "-"]);

        Self::start(path, metadata, command)
    }

    /// Spawn the decoder and start draining its diagnostics
    fn start(path: &Path, metadata: VideoMetadata, mut command: Command) -> Result<Self> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let stdout = child.stdout.take().ok_or_else(|| AnalysisError::StreamFailed {
            reason: "ffmpeg stdout was not captured".to_string(),
        })?;

        // stderr must be read concurrently or a full pipe stalls the decoder
        let stderr_tail = child.stderr.take().map(drain_stderr);

        let frame_len = metadata.width as usize * metadata.height as usize;
        debug!("Decoding {} bytes per frame from {}", frame_len, path.display());

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            child,
            stdout: BufReader::new(stdout),
            stderr_tail,
            frame_len,
            frames_read: 0,
            finished: false,
        })
    }

    /// Stream geometry and declared frame rate
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn probe(path: &Path) -> Result<VideoMetadata> {
        let output = Command::new("ffprobe")
            .args([
                "-v", "error",
                "-select_streams", "v:0",
                "-show_entries", "stream=width,height,avg_frame_rate,r_frame_rate",
                "-print_format", "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| spawn_error("ffprobe", e))?;

        if !output.status.success() {
            return Err(InputError::Unreadable {
                path: path.display().to_string(),
                reason: first_line(&output.stderr, "ffprobe failed"),
            }.into());
        }

        let json_output = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&json_output).map_err(|reason| InputError::Unreadable {
            path: path.display().to_string(),
            reason,
        }.into())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;

        let status = self.child.wait()?;
        let last_error = self
            .stderr_tail
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            if self.frames_read == 0 {
                let reason = if last_error.is_empty() {
                    "ffmpeg could not decode the video stream".to_string()
                } else {
                    last_error
                };
                return Err(InputError::Unreadable {
                    path: self.path.display().to_string(),
                    reason,
                }.into());
            }
            warn!("ffmpeg exited with {} after {} frames; keeping what was decoded", status, self.frames_read);
        }

        debug!("Decoded {} frames from {}", self.frames_read, self.path.display());
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn fps(&self) -> Option<f64> {
        self.metadata.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        let mut buffer = vec![0u8; self.frame_len];
        let filled = read_full(&mut self.stdout, &mut buffer)?;

        if filled == self.frame_len {
            self.frames_read += 1;
            let frame = Frame::from_gray_bytes(self.metadata.width, self.metadata.height, buffer)
                .ok_or_else(|| AnalysisError::StreamFailed {
                    reason: "frame buffer does not match stream geometry".to_string(),
                })?;
            return Ok(Some(frame));
        }

        if filled > 0 {
            warn!("Discarding truncated trailing frame ({} of {} bytes)", filled, self.frame_len);
        }
        self.finish()?;
        Ok(None)
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Parse `ffprobe -print_format json` output for the first video stream
fn parse_probe_output(json: &str) -> std::result::Result<VideoMetadata, String> {
    let probe: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| format!("invalid ffprobe output: {}", e))?;

    let stream = probe.streams.into_iter().next()
        .ok_or_else(|| "no video stream found".to_string())?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err("video stream has no frame size".to_string()),
    };

    let fps = stream.avg_frame_rate.as_deref().and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate));

    Ok(VideoMetadata { width, height, fps })
}

/// Parse an FFmpeg rational like `30000/1001` (or a plain number)
fn parse_frame_rate(value: &str) -> Option<f64> {
    let fps = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse().ok()?,
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Fill `buffer` as far as the reader allows, returning the number of bytes read
fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Read the decoder's stderr to the end, returning its last non-empty line
fn drain_stderr(pipe: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut last = String::new();
        let mut lines = 0usize;
        for line in BufReader::new(pipe).split(b'\n') {
            let Ok(line) = line else { break };
            let text = String::from_utf8_lossy(&line).trim().to_string();
            if !text.is_empty() {
                trace!("ffmpeg: {}", text);
                lines += 1;
                last = text;
            }
        }
        if lines > 0 {
            debug!("ffmpeg reported {} diagnostic lines", lines);
        }
        last
    })
}

fn spawn_error(tool: &str, err: std::io::Error) -> DirectorError {
    if err.kind() == ErrorKind::NotFound {
        AnalysisError::DecoderUnavailable { tool: tool.to_string() }.into()
    } else {
        AnalysisError::StreamFailed {
            reason: format!("{} could not be started: {}", tool, err),
        }.into()
    }
}

fn first_line(bytes: &[u8], fallback: &str) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
