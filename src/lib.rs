//! heic2jpg - Convert HEIC/HEIF photos to JPEG
//!
//! Walks the top level of a source directory, re-encodes HEIC/HEIF images
//! as maximum-quality JPEG and copies every other file unchanged into a
//! destination directory. The CLI and the GUI both drive the same lazy
//! [`Conversion`] iterator.

pub mod config;
pub mod converter;
pub mod decoder;
pub mod enumerate;
pub mod error;
pub mod progress;
pub mod report;
pub mod stats;

pub use config::Config;
pub use converter::{Conversion, FileAction, FileOutcome, Pipeline, ProgressEvent};
pub use decoder::{default_decoder, HeifDecoder};
pub use enumerate::list_files;
pub use stats::ConversionStats;
