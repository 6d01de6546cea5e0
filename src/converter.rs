//! Core conversion engine for heic2jpg
//!
//! A [`Pipeline`] walks the top level of a source directory and, for every
//! file, either re-encodes a HEIC/HEIF image as JPEG or copies the file
//! verbatim into the destination. Work happens lazily: [`Pipeline::start`]
//! hands back a [`Conversion`] iterator that processes one file per call to
//! `next` and yields a [`ProgressEvent`] for it.

use crate::{
    decoder::{default_decoder, HeifDecoder},
    enumerate::list_files,
    error::{ConvertError, Result, ResultExt},
    stats::ConversionStats,
};
use image::codecs::jpeg::JpegEncoder;
use std::{
    ffi::OsStr,
    fs::{self, File, FileTimes},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Highest quality the JPEG encoder accepts
pub const JPEG_QUALITY: u8 = 100;

/// What the pipeline does with a file, decided by its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Convert,
    Copy,
}

impl FileAction {
    pub fn for_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match ext.as_deref() {
            Some("heic") | Some("heif") => FileAction::Convert,
            _ => FileAction::Copy,
        }
    }
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted { output: PathBuf },
    Copied { output: PathBuf },
    Failed { error: String },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Emitted once per file, after it has been handled
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub file_name: String,
    pub outcome: FileOutcome,
    /// Counters as they stood right after this file
    pub stats: ConversionStats,
}

/// Configured source/destination pair, ready to start
pub struct Pipeline {
    source: PathBuf,
    destination: PathBuf,
    decoder: Box<dyn HeifDecoder + Send>,
}

impl Pipeline {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            decoder: default_decoder(),
        }
    }

    /// Replace the HEIF decoder
    pub fn with_decoder(mut self, decoder: Box<dyn HeifDecoder + Send>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Check that the source is a directory with at least one file in it.
    ///
    /// Front-ends call this before [`Pipeline::start`] so a mistyped source
    /// never gets a destination folder created for it. Returns the number of
    /// files that would be processed.
    pub fn preflight(&self) -> Result<usize> {
        if !self.source.is_dir() {
            return Err(ConvertError::SourceNotFound {
                path: self.source.display().to_string(),
            }
            .into());
        }

        let total = list_files(&self.source).len();
        if total == 0 {
            return Err(ConvertError::NoFiles {
                path: self.source.display().to_string(),
            }
            .into());
        }

        Ok(total)
    }

    /// Create the destination, list the source and return the lazy run.
    ///
    /// Nothing is converted or copied until the returned iterator is polled.
    pub fn start(self) -> Result<Conversion> {
        if !self.destination.exists() {
            fs::create_dir_all(&self.destination)
                .with_path_context("create output directory", &self.destination)?;
            info!("Created output directory: {}", self.destination.display());
        }

        let files = list_files(&self.source);
        info!(
            "Starting conversion of {} files from {} into {}",
            files.len(),
            self.source.display(),
            self.destination.display()
        );

        Ok(Conversion {
            stats: ConversionStats::new(files.len()),
            files: files.into_iter(),
            source: self.source,
            destination: self.destination,
            decoder: self.decoder,
        })
    }

    /// Process every file and return the final counters
    pub fn run(self) -> Result<ConversionStats> {
        let mut conversion = self.start()?;
        conversion.by_ref().for_each(drop);
        Ok(conversion.stats())
    }
}

/// An in-progress run; each `next` processes exactly one file
pub struct Conversion {
    files: std::vec::IntoIter<String>,
    source: PathBuf,
    destination: PathBuf,
    decoder: Box<dyn HeifDecoder + Send>,
    stats: ConversionStats,
}

impl Conversion {
    /// Counters so far
    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    pub fn total_files(&self) -> usize {
        self.stats.total_files
    }

    fn process_file(&mut self, file_name: &str) -> FileOutcome {
        let source_path = self.source.join(file_name);

        match FileAction::for_name(file_name) {
            FileAction::Convert => match self.convert_file(&source_path, file_name) {
                Ok(output) => {
                    self.stats.record_converted();
                    debug!("Converted {} -> {}", file_name, output.display());
                    FileOutcome::Converted { output }
                }
                Err(e) => self.fail(file_name, e),
            },
            FileAction::Copy => match self.copy_file(&source_path, file_name) {
                Ok(output) => {
                    self.stats.record_copied();
                    debug!("Copied {} -> {}", file_name, output.display());
                    FileOutcome::Copied { output }
                }
                Err(e) => self.fail(file_name, e),
            },
        }
    }

    fn fail(&mut self, file_name: &str, error: anyhow::Error) -> FileOutcome {
        self.stats.record_failed();
        warn!("Failed to process {}: {:#}", file_name, error);
        FileOutcome::Failed {
            error: format!("{:#}", error),
        }
    }

    fn convert_file(&self, source_path: &Path, file_name: &str) -> Result<PathBuf> {
        let stem = Path::new(file_name)
            .file_stem()
            .unwrap_or_else(|| OsStr::new(file_name));
        let mut output_name = stem.to_os_string();
        output_name.push(".jpg");
        let output_path = self.destination.join(output_name);

        let image = self
            .decoder
            .decode(source_path)
            .with_path_context("decode image", source_path)?;

        write_jpeg(&image, &output_path)?;
        Ok(output_path)
    }

    fn copy_file(&self, source_path: &Path, file_name: &str) -> Result<PathBuf> {
        let output_path = self.destination.join(file_name);
        copy_with_metadata(source_path, &output_path)?;
        Ok(output_path)
    }
}

impl Iterator for Conversion {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        let file_name = self.files.next()?;
        let outcome = self.process_file(&file_name);

        Some(ProgressEvent {
            file_name,
            outcome,
            stats: self.stats,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

impl ExactSizeIterator for Conversion {}

/// Encode `image` as an RGB JPEG at maximum quality.
///
/// The `image` crate's encoder samples every component at 1x1, so chroma is
/// never subsampled.
pub fn write_jpeg(image: &image::DynamicImage, output_path: &Path) -> Result<()> {
    let rgb = image.to_rgb8();

    // encode fully in memory so a failed encode never leaves a partial file
    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    image::DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(encoder)
        .with_path_context("encode JPEG", output_path)?;

    fs::write(output_path, &encoded).with_path_context("write file", output_path)?;
    Ok(())
}

/// Copy bytes and permissions, then carry over access/modification times.
///
/// Timestamp preservation is best effort: a platform that refuses it only
/// produces a warning.
pub fn copy_with_metadata(source_path: &Path, output_path: &Path) -> Result<()> {
    // copying a file onto itself truncates it before anything is read
    if is_same_file(source_path, output_path) {
        return Err(ConvertError::SameFile {
            path: output_path.display().to_string(),
        }
        .into());
    }

    fs::copy(source_path, output_path).with_path_context("copy file", source_path)?;

    if let Err(e) = copy_file_times(source_path, output_path) {
        warn!(
            "Could not preserve timestamps on {}: {:#}",
            output_path.display(),
            e
        );
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_file_times(source_path: &Path, output_path: &Path) -> Result<()> {
    let metadata = fs::metadata(source_path).with_path_context("read metadata", source_path)?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    // read-only copies cannot be opened for writing; the owner may still set times
    let file = File::options()
        .write(true)
        .open(output_path)
        .or_else(|_| File::open(output_path))
        .with_path_context("open copied file", output_path)?;

    file.set_times(times)
        .with_path_context("set file times", output_path)?;

    Ok(())
}
