//! The three file-to-file stages behind the `deadcase` subcommands.
//!
//! Each stage checks its input before doing any work and writes its output
//! only once everything has succeeded, so a failed run leaves nothing behind.

use std::path::Path;

use tracing::{info, warn};

use crate::analysis::{Shot, ShotRecord, ShotSegmenter};
use crate::config::{AnalysisConfig, DirectorConfig};
use crate::director::{EditEvent, EditRuleEngine};
use crate::error::{DirectorError, InputError, Result};
use crate::persist;
use crate::timeline;
use crate::video::open_source;

/// What the edit-map stage produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditMapSummary {
    pub shots: usize,
    pub events: usize,
}

/// Segment `input` and write its shots to `output`
///
/// A source without a single frame is [`InputError::Empty`] and nothing is
/// written. Returns the number of shots written.
pub async fn analyze(
    input: &Path,
    output: &Path,
    fps: Option<f64>,
    config: &AnalysisConfig,
) -> Result<usize> {
    info!("Analyzing {:?}", input);

    // Decoding and segmentation are blocking and strictly ordered
    let source_path = input.to_path_buf();
    let analysis = config.clone();
    let shots = tokio::task::spawn_blocking(move || -> Result<Vec<Shot>> {
        let mut source = open_source(&source_path, fps, &analysis)?;
        ShotSegmenter::new(analysis).segment(&mut source)
    })
    .await
    .map_err(|e| DirectorError::generic(format!("segmentation task failed: {}", e)))??;

    if shots.is_empty() {
        return Err(InputError::Empty {
            path: input.display().to_string(),
        }
        .into());
    }

    let records: Vec<ShotRecord> = shots.iter().map(Shot::to_record).collect();
    persist::write_json(output, &records).await?;
    Ok(records.len())
}

/// Turn the shots in `shots_path` into an edit map at `output`
///
/// An empty shots file is valid and produces an empty edit map.
pub async fn direct(shots_path: &Path, output: &Path, config: &DirectorConfig) -> Result<EditMapSummary> {
    let shots = persist::load_shots(shots_path).await?;

    if shots.is_empty() {
        warn!("{} holds no shots", shots_path.display());
        persist::write_json(output, &[] as &[EditEvent]).await?;
        return Ok(EditMapSummary { shots: 0, events: 0 });
    }

    let style = config.style_preset();
    info!("Directing {} shots in {} style: {}", shots.len(), style, style.description());
    let events = EditRuleEngine::new(config.clone()).generate(&shots, style);

    persist::write_json(output, &events).await?;
    Ok(EditMapSummary { shots: shots.len(), events: events.len() })
}

/// Plan timeline markers for the edit map in `edits` and write them to `output`
pub async fn plan(edits: &Path, output: &Path, project_fps: f64) -> Result<usize> {
    let events = persist::load_event_records(edits).await?;
    let markers = timeline::plan_markers(&events, project_fps);

    persist::write_json(output, &markers).await?;
    Ok(markers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    fn write_frames(dir: &Path, levels: &[u8]) {
        for (i, &level) in levels.iter().enumerate() {
            GrayImage::from_pixel(8, 8, Luma([level]))
                .save(dir.join(format!("frame_{:04}.png", i)))
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_analyze_empty_sequence_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let frames = temp_dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        let output = temp_dir.path().join("shots.json");

        let err = analyze(&frames, &output, None, &AnalysisConfig::default())
            .await
            .unwrap_err();

        assert!(err.is_empty_result());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_analyze_writes_shots() {
        let temp_dir = tempdir().unwrap();
        let frames = temp_dir.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        let mut levels = vec![20u8; 12];
        levels.extend(vec![230u8; 12]);
        write_frames(&frames, &levels);
        let output = temp_dir.path().join("out").join("shots.json");

        let written = analyze(&frames, &output, Some(12.0), &AnalysisConfig::default())
            .await
            .unwrap();

        assert_eq!(written, 2);
        let shots = persist::load_shots(&output).await.unwrap();
        assert_eq!((shots[0].start, shots[0].end), (0.0, 1.0));
        assert_eq!((shots[1].start, shots[1].end), (1.0, 2.0));
    }

    #[tokio::test]
    async fn test_analyze_missing_input() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("shots.json");

        let err = analyze(Path::new("/no/such/clip.mp4"), &output, None, &AnalysisConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DirectorError::Input(InputError::NotFound { .. })));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_direct_without_shots_writes_empty_map() {
        let temp_dir = tempdir().unwrap();
        let shots = temp_dir.path().join("shots.json");
        std::fs::write(&shots, "[]").unwrap();
        let output = temp_dir.path().join("edit_map.json");

        let summary = direct(&shots, &output, &DirectorConfig::default()).await.unwrap();

        assert_eq!(summary, EditMapSummary { shots: 0, events: 0 });
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_direct_then_plan() {
        let temp_dir = tempdir().unwrap();
        let shots = temp_dir.path().join("shots.json");
        std::fs::write(
            &shots,
            r#"[{"start":0,"end":6,"avg_brightness":0.2,"motion":0.8},
                {"start":6,"end":12,"avg_brightness":0.9,"motion":0.1}]"#,
        )
        .unwrap();
        let edits = temp_dir.path().join("edit_map.json");
        let markers = temp_dir.path().join("markers.json");

        let summary = direct(&shots, &edits, &DirectorConfig::default()).await.unwrap();
        assert_eq!(summary, EditMapSummary { shots: 2, events: 5 });

        assert_eq!(plan(&edits, &markers, 24.0).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_direct_missing_shots_file_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("edit_map.json");

        let err = direct(&temp_dir.path().join("missing.json"), &output, &DirectorConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DirectorError::Input(InputError::NotFound { .. })));
        assert!(!output.exists());
    }
}
