use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::TrackerClient;
use crate::TrackerError;
use crate::metric::ScalarReport;
use crate::visual::Visual;

const SCALARS_FILE: &str = "metrics.jsonl";
const MEDIA_INDEX_FILE: &str = "media.jsonl";
const MEDIA_DIR: &str = "media";

/// File backed client writing an offline run directory.
///
/// Scalars are appended to `metrics.jsonl`, one JSON record per step. Images
/// are saved as PNG files under `media/`, with one index record per visual
/// appended to `media.jsonl`.
pub struct FileTrackerClient {
    directory: PathBuf,
    scalars: BufWriter<File>,
    media_index: BufWriter<File>,
}

#[derive(Serialize)]
struct ScalarRecord<'a> {
    step: usize,
    metrics: &'a ScalarReport,
}

#[derive(Serialize)]
struct MediaRecord<'a> {
    step: usize,
    name: &'a str,
    files: Vec<String>,
}

impl FileTrackerClient {
    /// Create a client writing under the given run directory.
    ///
    /// The directory and its `media/` subdirectory are created when missing;
    /// existing record files are appended to.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(directory.join(MEDIA_DIR))?;

        let scalars = open_append(&directory.join(SCALARS_FILE))?;
        let media_index = open_append(&directory.join(MEDIA_INDEX_FILE))?;

        Ok(Self {
            directory,
            scalars,
            media_index,
        })
    }

    fn media_path(&self, name: &str, step: usize, index: usize) -> PathBuf {
        let name = name.replace([' ', '/'], "_");
        self.directory
            .join(MEDIA_DIR)
            .join(format!("{name}-{step}-{index}.png"))
    }
}

fn open_append(path: &Path) -> Result<BufWriter<File>, TrackerError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

impl TrackerClient for FileTrackerClient {
    fn log_scalars(&mut self, scalars: &ScalarReport, step: usize) -> Result<(), TrackerError> {
        let record = ScalarRecord {
            step,
            metrics: scalars,
        };

        serde_json::to_writer(&mut self.scalars, &record)?;
        self.scalars.write_all(b"\n")?;

        Ok(())
    }

    fn log_visual(&mut self, visual: &Visual, step: usize) -> Result<(), TrackerError> {
        let mut files = Vec::with_capacity(visual.payload.len());

        for (index, image) in visual.payload.images().enumerate() {
            let path = self.media_path(&visual.name, step, index);
            image.save_with_format(&path, image::ImageFormat::Png)?;
            files.push(path.to_string_lossy().into_owned());
        }

        let record = MediaRecord {
            step,
            name: &visual.name,
            files,
        };

        serde_json::to_writer(&mut self.media_index, &record)?;
        self.media_index.write_all(b"\n")?;

        Ok(())
    }

    fn finish(&mut self) -> Result<(), TrackerError> {
        self.scalars.flush()?;
        self.media_index.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::VisualPayload;
    use image::DynamicImage;
    use std::collections::HashMap;

    fn report(entries: &[(&str, f64)]) -> ScalarReport {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn writes_one_scalar_record_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FileTrackerClient::new(dir.path()).unwrap();

        client
            .log_scalars(&report(&[("loss/train", 0.5)]), 10)
            .unwrap();
        client
            .log_scalars(&report(&[("loss/train", 0.4)]), 20)
            .unwrap();
        client.finish().unwrap();

        let content = fs::read_to_string(dir.path().join(SCALARS_FILE)).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(2, lines.len());

        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(10, record["step"]);
        assert_eq!(0.5, record["metrics"]["loss/train"]);
    }

    #[test]
    fn saves_each_image_of_a_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FileTrackerClient::new(dir.path()).unwrap();

        let visual = Visual::new(
            "detections".to_string(),
            VisualPayload::Sequence(vec![
                DynamicImage::new_rgb8(4, 4),
                DynamicImage::new_rgb8(4, 4),
            ]),
        );
        client.log_visual(&visual, 30).unwrap();
        client.finish().unwrap();

        let images = fs::read_dir(dir.path().join(MEDIA_DIR)).unwrap().count();
        assert_eq!(2, images);

        let content = fs::read_to_string(dir.path().join(MEDIA_INDEX_FILE)).unwrap();
        let record: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!("detections", record["name"]);
        assert_eq!(30, record["step"]);
        assert_eq!(2, record["files"].as_array().unwrap().len());
    }

    #[test]
    fn sanitizes_visual_names_in_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FileTrackerClient::new(dir.path()).unwrap();

        let visual = Visual::new(
            "proposals/stage 1".to_string(),
            VisualPayload::Single(DynamicImage::new_luma8(2, 2)),
        );
        client.log_visual(&visual, 5).unwrap();
        client.finish().unwrap();

        assert!(dir
            .path()
            .join(MEDIA_DIR)
            .join("proposals_stage_1-5-0.png")
            .exists());
    }
}
