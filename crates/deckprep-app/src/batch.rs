// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver: one flat pass over a source directory,
// classify → (composite) → (resize) → augment → write, per file.

use std::path::{Path, PathBuf};

use deckprep_core::classify::{Classifier, classifier_for};
use deckprep_core::error::{DeckprepError, Result};
use deckprep_core::{ClassLabel, PipelineConfig};
use deckprep_image::{Augmentor, ImageProcessor};
use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument, warn};

use crate::report::BatchReport;
use crate::writer::ClassWriter;

/// Drives one pipeline over a source directory.
pub struct BatchDriver {
    config: PipelineConfig,
    classifier: Box<dyn Classifier>,
    augmentor: Augmentor,
    writer: ClassWriter,
    keep_going: bool,
}

impl BatchDriver {
    /// Build a driver writing under `output`. Fails if the configuration
    /// cannot produce output.
    pub fn new(config: PipelineConfig, output: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: classifier_for(&config),
            augmentor: Augmentor::from_config(&config),
            writer: ClassWriter::from_config(output, &config),
            config,
            keep_going: false,
        })
    }

    /// Skip undecodable sources instead of aborting the run.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn output(&self) -> &Path {
        self.writer.root()
    }

    /// Process every matching file in `source`, in file-name order.
    #[instrument(skip_all, fields(pipeline = %self.config.kind, source = %source.display()))]
    pub fn run(&self, source: &Path) -> Result<BatchReport> {
        let sources = self.list_sources(source)?;
        info!(count = sources.len(), "Source files found");

        std::fs::create_dir_all(self.output())?;
        let mut report = BatchReport::new(self.config.kind, self.output());

        for path in sources {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let Some(label) = self.classifier.classify(&file_name) else {
                println!("  Skip: {file_name}");
                debug!(file = %file_name, "No class for file name");
                report.record_skip(file_name);
                continue;
            };

            let base = match self.prepare_base(&path) {
                Ok(base) => base,
                Err(err @ DeckprepError::Decode { .. }) if self.keep_going => {
                    warn!(file = %file_name, error = %err, "Skipping undecodable source");
                    println!("  Unreadable: {file_name}");
                    report.record_undecodable(file_name);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let count = self.process(&label, &base, &mut report)?;
            println!("  {label}: {count} images");
        }

        info!(
            total = report.total_images,
            classes = report.classes.len(),
            skipped = report.skipped.len(),
            "Batch complete"
        );
        Ok(report)
    }

    /// Regular files in `source` whose extension the pipeline accepts, sorted
    /// by file name.
    fn list_sources(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(source).map_err(|err| DeckprepError::SourceDir {
            path: source.to_path_buf(),
            source: err,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let accepted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.config.accepts_extension(ext));
            if accepted && path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Decode `path` and apply the pipeline's compositing and resize steps.
    fn prepare_base(&self, path: &Path) -> Result<RgbImage> {
        let mut processor = ImageProcessor::open(path)?;
        if self.config.composite_background {
            processor = processor.composite_on(Rgb(self.config.background));
        }
        if let Some(size) = self.config.target_size {
            processor = processor.resize_square(size);
        }
        Ok(processor.into_rgb8())
    }

    /// Augment `base` and persist the capped variants for `label`.
    fn process(
        &self,
        label: &ClassLabel,
        base: &RgbImage,
        report: &mut BatchReport,
    ) -> Result<usize> {
        let variants = self.augmentor.augment(base);
        let written = self.writer.write_class(label, &variants)?;
        let count = written.len();
        report.record_class(label.clone(), written);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckprep_core::PipelineKind;
    use deckprep_image::augment::AUGMENTATION_SEQUENCE;
    use deckprep_image::image::processor::encode_jpeg;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn label(raw: &str) -> ClassLabel {
        ClassLabel::new(raw).expect("valid label")
    }

    /// Files written per class under `config`.
    fn per_class(config: &PipelineConfig) -> usize {
        AUGMENTATION_SEQUENCE.len().min(config.target_per_class)
    }

    /// Transparent card with an opaque coloured face, like the species art.
    fn write_species_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            if x > width / 5 && x < width * 4 / 5 && y > height / 6 && y < height * 5 / 6 {
                Rgba([(x * 3 % 256) as u8, 90, (y * 2 % 256) as u8, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        img.save(dir.join(name)).expect("save png");
    }

    fn write_artwork_jpg(dir: &Path, name: &str) {
        let img = RgbImage::from_fn(60, 84, |x, y| Rgb([x as u8 * 4, y as u8 * 3, 128]));
        let bytes = encode_jpeg(&img, 95).expect("encode");
        std::fs::write(dir.join(name), bytes).expect("write jpg");
    }

    fn species_source() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        write_species_png(dir.path(), "Hearts_2_Espadin.png", 90, 126);
        write_species_png(dir.path(), "COLOURED_PENCIL_001_Spades_A_Tobala.png", 300, 120);
        write_species_png(dir.path(), "random_file.png", 10, 10);
        std::fs::write(dir.path().join("notes.txt"), "not an image").expect("write txt");
        dir
    }

    #[test]
    fn species_run_writes_capped_classes() {
        let source = species_source();
        let out = tempfile::tempdir().expect("tempdir");

        let report = BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        let expected = per_class(&PipelineConfig::species());
        assert_eq!(expected, 14);
        assert_eq!(report.pipeline, PipelineKind::Species);
        assert_eq!(report.total_images, 2 * expected);
        assert_eq!(report.classes[&label("hearts_2")], expected);
        assert_eq!(report.classes[&label("spades_A")], expected);
        assert_eq!(report.skipped, vec!["random_file.png".to_string()]);

        let hearts = out.path().join("hearts_2");
        assert!(hearts.join("hearts_2_00.jpg").is_file());
        assert!(hearts.join("hearts_2_13.jpg").is_file());
        assert!(!hearts.join("hearts_2_14.jpg").exists());
    }

    #[test]
    fn species_variants_are_trainer_sized_jpegs() {
        let source = species_source();
        let out = tempfile::tempdir().expect("tempdir");
        BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        let bytes =
            std::fs::read(out.path().join("spades_A").join("spades_A_05.jpg")).expect("read");
        assert_eq!(
            image::guess_format(&bytes).expect("format"),
            image::ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (224, 224));
    }

    #[test]
    fn transparent_margin_becomes_white() {
        let source = species_source();
        let out = tempfile::tempdir().expect("tempdir");
        BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        let identity = image::open(out.path().join("hearts_2").join("hearts_2_00.jpg"))
            .expect("decode")
            .to_rgb8();
        let corner = identity.get_pixel(2, 2).0;
        assert!(corner.iter().all(|&c| c > 240), "corner was {corner:?}");
    }

    #[test]
    fn artwork_run_excludes_promos_and_keeps_size() {
        let source = tempfile::tempdir().expect("tempdir");
        write_artwork_jpg(source.path(), "001_spades_A.jpg");
        write_artwork_jpg(source.path(), "054_joker_black.jpg");
        write_artwork_jpg(source.path(), "055_promo_front.jpg");
        write_artwork_jpg(source.path(), "cover.jpg");
        let out = tempfile::tempdir().expect("tempdir");

        let report = BatchDriver::new(PipelineConfig::artwork(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        assert_eq!(report.total_images, 2 * per_class(&PipelineConfig::artwork()));
        assert_eq!(
            report.classes.keys().map(|l| l.as_str()).collect::<Vec<_>>(),
            vec!["joker_black", "spades_A"]
        );
        assert_eq!(
            report.skipped,
            vec!["055_promo_front.jpg".to_string(), "cover.jpg".to_string()]
        );
        assert!(!out.path().join("promo_front").exists());

        let decoded =
            image::open(out.path().join("spades_A").join("spades_A_00.jpg")).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (60, 84));
    }

    #[test]
    fn species_files_are_encoded_at_quality_92() {
        let source = species_source();
        let out = tempfile::tempdir().expect("tempdir");
        let config = PipelineConfig::species();
        BatchDriver::new(config.clone(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        let base = ImageProcessor::open(source.path().join("Hearts_2_Espadin.png"))
            .expect("open")
            .composite_on(Rgb([255, 255, 255]))
            .resize_square(224)
            .into_rgb8();
        let variant = Augmentor::from_config(&config).apply(AUGMENTATION_SEQUENCE[3], &base);

        let written = std::fs::read(out.path().join("hearts_2").join("hearts_2_03.jpg"))
            .expect("read");
        assert_eq!(written, encode_jpeg(&variant, 92).expect("encode"));
        assert_ne!(written, encode_jpeg(&variant, 90).expect("encode"));
    }

    #[test]
    fn artwork_files_are_encoded_at_quality_90() {
        let source = tempfile::tempdir().expect("tempdir");
        write_artwork_jpg(source.path(), "012_hearts_Q.jpg");
        let out = tempfile::tempdir().expect("tempdir");
        let config = PipelineConfig::artwork();
        BatchDriver::new(config.clone(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        let base = ImageProcessor::open(source.path().join("012_hearts_Q.jpg"))
            .expect("open")
            .into_rgb8();
        let variant = Augmentor::from_config(&config).apply(AUGMENTATION_SEQUENCE[5], &base);

        let written = std::fs::read(out.path().join("hearts_Q").join("hearts_Q_05.jpg"))
            .expect("read");
        assert_eq!(written, encode_jpeg(&variant, 90).expect("encode"));
        assert_ne!(written, encode_jpeg(&variant, 92).expect("encode"));
    }

    #[test]
    fn cap_truncates_sequence() {
        let source = species_source();
        let out = tempfile::tempdir().expect("tempdir");
        let config = PipelineConfig {
            target_per_class: 5,
            ..PipelineConfig::species()
        };

        let report = BatchDriver::new(config, out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");

        assert_eq!(report.total_images, 10);
        let mut names: Vec<String> = std::fs::read_dir(out.path().join("hearts_2"))
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            (0..5).map(|i| format!("hearts_2_{i:02}.jpg")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn reruns_are_byte_identical() {
        let source = species_source();
        let first_out = tempfile::tempdir().expect("tempdir");
        let second_out = tempfile::tempdir().expect("tempdir");

        let first = BatchDriver::new(PipelineConfig::species(), first_out.path())
            .expect("driver")
            .run(source.path())
            .expect("first run");
        let second = BatchDriver::new(PipelineConfig::species(), second_out.path())
            .expect("driver")
            .run(source.path())
            .expect("second run");

        assert!(first.same_output_as(&second));
        assert_eq!(first.total_images, second.total_images);
    }

    #[test]
    fn uppercase_extension_is_accepted() {
        let source = tempfile::tempdir().expect("tempdir");
        write_species_png(source.path(), "Diamonds_K_Tepeztate.PNG", 20, 28);
        let out = tempfile::tempdir().expect("tempdir");

        let report = BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .run(source.path())
            .expect("run");
        assert_eq!(
            report.classes[&label("diamonds_K")],
            per_class(&PipelineConfig::species())
        );
    }

    #[test]
    fn undecodable_source_is_fatal_by_default() {
        let source = tempfile::tempdir().expect("tempdir");
        std::fs::write(source.path().join("Hearts_3_Madrecuixe.png"), b"garbage").expect("write");
        let out = tempfile::tempdir().expect("tempdir");

        let result = BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .run(source.path());
        assert!(matches!(result, Err(DeckprepError::Decode { .. })));
    }

    #[test]
    fn keep_going_skips_undecodable_source() {
        let source = species_source();
        std::fs::write(source.path().join("Hearts_3_Madrecuixe.png"), b"garbage").expect("write");
        let out = tempfile::tempdir().expect("tempdir");

        let report = BatchDriver::new(PipelineConfig::species(), out.path())
            .expect("driver")
            .keep_going(true)
            .run(source.path())
            .expect("run");

        assert_eq!(report.undecodable, vec!["Hearts_3_Madrecuixe.png".to_string()]);
        assert_eq!(report.total_images, 2 * per_class(&PipelineConfig::species()));
        assert!(!out.path().join("hearts_3").exists());
    }

    #[test]
    fn missing_source_directory_is_reported() {
        let out = tempfile::tempdir().expect("tempdir");
        let missing = out.path().join("does-not-exist");
        let result = BatchDriver::new(PipelineConfig::artwork(), out.path().join("training_data"))
            .expect("driver")
            .run(&missing);
        assert!(matches!(result, Err(DeckprepError::SourceDir { .. })));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PipelineConfig {
            jpeg_quality: 101,
            ..PipelineConfig::artwork()
        };
        assert!(matches!(
            BatchDriver::new(config, "unused"),
            Err(DeckprepError::InvalidConfig(_))
        ));
    }
}
