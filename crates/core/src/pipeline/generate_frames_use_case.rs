use std::fs;
use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::blurring::infrastructure::blurrer_factory::create_blurrer;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::shared::constants::frame_file_name;
use crate::shared::error::SpoilerError;
use crate::shared::spoiler_config::{ShimmerSettings, SpoilerConfig};
use crate::shimmer::domain::even_padding::pad_to_even;
use crate::shimmer::domain::frame_compositor::render_frame;
use crate::shimmer::domain::shimmer_dot::{dot_count, generate_dots};
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::infrastructure::image_file_reader::ImageFileReader;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

/// Frame generation pipeline: read → pad → blur → scatter dots → render
/// and write every frame.
///
/// Frames are rendered and written one at a time. A failure aborts the run
/// and leaves frames already written on disk.
pub struct GenerateFramesUseCase {
    reader: Box<dyn ImageReader>,
    blurrer: Box<dyn FrameBlurrer>,
    image_writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl GenerateFramesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        blurrer: Box<dyn FrameBlurrer>,
        image_writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            blurrer,
            image_writer,
            logger,
        }
    }

    /// Writes `settings.frame_count` numbered frames into `output_dir` and
    /// returns how many were written.
    pub fn execute<R: Rng + ?Sized>(
        &mut self,
        source_path: &Path,
        output_dir: &Path,
        settings: &ShimmerSettings,
        rng: &mut R,
    ) -> Result<usize, SpoilerError> {
        validate_settings(settings)?;

        let source = self
            .reader
            .read(source_path)
            .map_err(|source| SpoilerError::Load {
                path: source_path.to_path_buf(),
                source,
            })?;
        let (src_w, src_h) = (source.width(), source.height());
        let mut base = pad_to_even(source);
        let (width, height) = (base.width(), base.height());
        if (width, height) != (src_w, src_h) {
            log::debug!("Padded {src_w}x{src_h} to {width}x{height}");
        }

        let count = dot_count(width, height, settings.dot_density);
        if count < 1 {
            return Err(SpoilerError::InvalidConfig(format!(
                "dot count must be at least 1 ({width}x{height} at density {} gives 0)",
                settings.dot_density
            )));
        }

        let started = Instant::now();
        self.blurrer
            .blur(&mut base)
            .map_err(|source| SpoilerError::Blur { source })?;
        self.logger.timing("blur", elapsed_ms(started));

        let dots = generate_dots(rng, width, height, count, settings.gray_range.clone());
        self.logger.metric("dots", count as f64);
        self.logger.info(&format!(
            "Rendering {} frames at {width}x{height} with {count} shimmer dots",
            settings.frame_count
        ));

        fs::create_dir_all(output_dir).map_err(|e| SpoilerError::io(output_dir, e))?;

        let total = settings.frame_count;
        for index in 0..total {
            let started = Instant::now();
            let frame = render_frame(&base, &dots, index, settings);
            self.logger.timing("composite", elapsed_ms(started));

            let path = output_dir.join(frame_file_name(index));
            let started = Instant::now();
            self.image_writer
                .write(&path, &frame)
                .map_err(|source| SpoilerError::Io { path, source })?;
            self.logger.timing("write", elapsed_ms(started));
            self.logger.progress(index + 1, total);
        }

        self.logger.summary();
        Ok(total)
    }
}

fn validate_settings(settings: &ShimmerSettings) -> Result<(), SpoilerError> {
    if settings.frame_count == 0 {
        return Err(SpoilerError::InvalidConfig(
            "frame count must be at least 1".into(),
        ));
    }
    if settings.dot_size == 0 {
        return Err(SpoilerError::InvalidConfig(
            "dot size must be at least 1".into(),
        ));
    }
    if settings.gray_range.is_empty() {
        return Err(SpoilerError::InvalidConfig(
            "dot gray range is empty".into(),
        ));
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Seeded RNG for a run, plus the seed actually used.
///
/// Without an explicit seed one is drawn from OS entropy, so any run can be
/// reproduced from its logged seed.
pub fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (StdRng::seed_from_u64(seed), seed)
}

/// Generates spoiler frames with the default file reader, CPU blur and PNG
/// writer.
pub fn generate_spoiler_frames<R: Rng + ?Sized>(
    source_path: &Path,
    output_dir: &Path,
    config: &SpoilerConfig,
    rng: &mut R,
) -> Result<usize, SpoilerError> {
    let mut use_case = GenerateFramesUseCase::new(
        Box::new(ImageFileReader::new()),
        create_blurrer(config.blur_sigma),
        Box::new(ImageFileWriter::new()),
        Box::new(NullPipelineLogger),
    );
    use_case.execute(source_path, output_dir, &config.shimmer_settings(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubImageReader {
        frame: Frame,
    }

    impl ImageReader for StubImageReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(self.frame.clone())
        }
    }

    struct FailingReader;

    impl ImageReader for FailingReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Err("unsupported image format".into())
        }
    }

    struct RecordingWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
        fail_at: Option<usize>,
    }

    impl RecordingWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                fail_at: None,
            }
        }

        fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Self::new()
            }
        }
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            let mut written = self.written.lock().unwrap();
            if self.fail_at == Some(written.len()) {
                return Err("disk full".into());
            }
            written.push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct CountingBlurrer {
        calls: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl CountingBlurrer {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FrameBlurrer for CountingBlurrer {
        fn blur(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.calls
                .lock()
                .unwrap()
                .push((frame.width(), frame.height()));
            Ok(())
        }
    }

    /// Keeps every metric and the last progress report.
    struct RecordingLogger {
        metrics: Arc<Mutex<Vec<(String, f64)>>>,
        progress: Arc<Mutex<Option<(usize, usize)>>>,
    }

    impl RecordingLogger {
        fn new() -> Self {
            Self {
                metrics: Arc::new(Mutex::new(Vec::new())),
                progress: Arc::new(Mutex::new(None)),
            }
        }
    }

    impl PipelineLogger for RecordingLogger {
        fn progress(&mut self, current: usize, total: usize) {
            *self.progress.lock().unwrap() = Some((current, total));
        }
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn metric(&mut self, name: &str, value: f64) {
            self.metrics.lock().unwrap().push((name.to_string(), value));
        }
        fn info(&mut self, _message: &str) {}
    }

    // --- Helpers ---

    fn gray_frame(w: u32, h: u32) -> Frame {
        let mut frame = Frame::black(w, h);
        for px in frame.data_mut().chunks_exact_mut(4) {
            px[..3].copy_from_slice(&[128, 128, 128]);
        }
        frame
    }

    fn settings(frame_count: usize, dot_density: f64) -> ShimmerSettings {
        ShimmerSettings {
            frame_count,
            dot_density,
            ..ShimmerSettings::default()
        }
    }

    fn use_case(
        frame: Frame,
        blurrer: CountingBlurrer,
        writer: RecordingWriter,
    ) -> GenerateFramesUseCase {
        GenerateFramesUseCase::new(
            Box::new(StubImageReader { frame }),
            Box::new(blurrer),
            Box::new(writer),
            Box::new(NullPipelineLogger),
        )
    }

    // --- Tests ---

    #[test]
    fn test_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordingWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(gray_frame(20, 10), CountingBlurrer::new(), writer);

        let n = uc
            .execute(
                Path::new("in.png"),
                dir.path(),
                &settings(3, 0.01),
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();

        assert_eq!(n, 3);
        let written = written.lock().unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["frame_0000.png", "frame_0001.png", "frame_0002.png"]);
        for (i, (path, frame)) in written.iter().enumerate() {
            assert_eq!(path.parent().unwrap(), dir.path());
            assert_eq!(frame.index(), i);
        }
    }

    #[test]
    fn test_blurs_padded_image_once() {
        let dir = tempfile::tempdir().unwrap();
        let blurrer = CountingBlurrer::new();
        let calls = blurrer.calls.clone();
        let writer = RecordingWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(gray_frame(101, 100), blurrer, writer);

        uc.execute(
            Path::new("in.png"),
            dir.path(),
            &settings(4, 0.004),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![(102, 100)]);
        for (_, frame) in written.lock().unwrap().iter() {
            assert_eq!((frame.width(), frame.height()), (102, 100));
        }
    }

    #[test]
    fn test_zero_dot_count_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let blurrer = CountingBlurrer::new();
        let calls = blurrer.calls.clone();
        let writer = RecordingWriter::new();
        let written = writer.written.clone();
        let mut uc = use_case(gray_frame(10, 10), blurrer, writer);

        let err = uc
            .execute(
                Path::new("in.png"),
                &out,
                &settings(5, 0.001),
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();

        assert!(matches!(err, SpoilerError::InvalidConfig(_)));
        assert!(written.lock().unwrap().is_empty());
        assert!(calls.lock().unwrap().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn test_zero_frames_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordingWriter::new();
        let mut uc = use_case(gray_frame(10, 10), CountingBlurrer::new(), writer);
        let err = uc
            .execute(
                Path::new("in.png"),
                dir.path(),
                &settings(0, 0.5),
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();
        assert!(matches!(err, SpoilerError::InvalidConfig(_)));
    }

    #[test]
    fn test_reader_failure_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut uc = GenerateFramesUseCase::new(
            Box::new(FailingReader),
            Box::new(CountingBlurrer::new()),
            Box::new(RecordingWriter::new()),
            Box::new(NullPipelineLogger),
        );
        let err = uc
            .execute(
                Path::new("broken.png"),
                dir.path(),
                &settings(2, 0.5),
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();
        match err {
            SpoilerError::Load { path, .. } => assert_eq!(path, PathBuf::from("broken.png")),
            other => panic!("expected Load, got {other:?}"),
        }
    }

    #[test]
    fn test_write_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RecordingWriter::failing_at(2);
        let written = writer.written.clone();
        let mut uc = use_case(gray_frame(10, 10), CountingBlurrer::new(), writer);

        let err = uc
            .execute(
                Path::new("in.png"),
                dir.path(),
                &settings(5, 0.1),
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap_err();

        match err {
            SpoilerError::Io { path, .. } => {
                assert_eq!(path, dir.path().join("frame_0002.png"))
            }
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_same_seed_renders_identical_frames() {
        let render = |seed: u64| {
            let dir = tempfile::tempdir().unwrap();
            let writer = RecordingWriter::new();
            let written = writer.written.clone();
            let mut uc = use_case(gray_frame(16, 16), CountingBlurrer::new(), writer);
            uc.execute(
                Path::new("in.png"),
                dir.path(),
                &settings(3, 0.05),
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();
            let frames: Vec<Frame> = written
                .lock()
                .unwrap()
                .iter()
                .map(|(_, f)| f.clone())
                .collect();
            frames
        };
        assert_eq!(render(9), render(9));
        assert_ne!(render(9), render(10));
    }

    #[test]
    fn test_seeded_rng_reports_seed() {
        let (mut a, seed) = seeded_rng(Some(77));
        assert_eq!(seed, 77);
        let (mut b, _) = seeded_rng(Some(77));
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    // --- End to end with real image files ---

    fn write_source(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("source.png");
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 2) as u8, (y * 2) as u8, 90])
        });
        img.save(&path).unwrap();
        path
    }

    fn small_config(fps: u32, dot_density: f64) -> SpoilerConfig {
        SpoilerConfig {
            fps,
            duration_secs: 1,
            dot_density,
            darken_fraction: 0.3,
            ..SpoilerConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_odd_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 101, 100);
        let out = dir.path().join("frames");

        let config = small_config(5, 0.004);
        let logger = RecordingLogger::new();
        let metrics = logger.metrics.clone();
        let progress = logger.progress.clone();
        let mut uc = GenerateFramesUseCase::new(
            Box::new(ImageFileReader::new()),
            create_blurrer(config.blur_sigma),
            Box::new(ImageFileWriter::new()),
            Box::new(logger),
        );

        let n = uc
            .execute(
                &source,
                &out,
                &config.shimmer_settings(),
                &mut StdRng::seed_from_u64(3),
            )
            .unwrap();

        assert_eq!(n, 5);
        assert_eq!(*metrics.lock().unwrap(), vec![("dots".to_string(), 40.0)]);
        assert_eq!(*progress.lock().unwrap(), Some((5, 5)));
        let mut files: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(
            files,
            [
                "frame_0000.png",
                "frame_0001.png",
                "frame_0002.png",
                "frame_0003.png",
                "frame_0004.png"
            ]
        );
        for name in files {
            let img = image::open(out.join(name)).unwrap();
            assert_eq!((img.width(), img.height()), (102, 100));
        }
    }

    #[test]
    fn test_end_to_end_too_sparse_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), 101, 100);
        let out = dir.path().join("frames");

        let err = generate_spoiler_frames(
            &source,
            &out,
            &small_config(5, 0.00001),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap_err();

        assert!(matches!(err, SpoilerError::InvalidConfig(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_end_to_end_missing_source_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_spoiler_frames(
            &dir.path().join("missing.png"),
            &dir.path().join("frames"),
            &small_config(2, 0.004),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap_err();
        assert!(matches!(err, SpoilerError::Load { .. }));
    }
}
