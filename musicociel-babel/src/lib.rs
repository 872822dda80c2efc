//! Song formats, chord theory and conversion for musicociel
//!
//!     This crate turns song documents written in several text formats into a
//!     shared model, optionally rewrites their chords, and writes them back out.
//!
//!     This is a pure lib, that is, it powers the musicociel cli but is shell agnostic: no code
//!     here reads files, prints, or looks at env vars. Callers hand in text and get text or
//!     songs back.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery, selection and auto-detection
//!     ├── model.rs                # Song model shared by every format
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # Parser implementation
//!     │   │   ├── serializer.rs   # Serializer implementation
//!     │   │   └── mod.rs
//!     │   └── common              # Section building shared by the line-based formats
//!     ├── theory                  # Notes, chords, transposition
//!     ├── transforms.rs           # Validated transformation settings
//!     └── convert.rs              # decode → transform → encode pipeline
//!
//! Pipeline
//!
//!     source text ──decode──▶ Song ──transform──▶ Song ──encode──▶ output text
//!
//!     Decoding picks the format from an explicit name, then the file extension, then tries
//!     every format in registration order. Encoding uses the explicit name, then the
//!     extension, then the registry's default output format (musicociel JSON).
//!
//!     Transformations only touch `Song::music`. They are configured through
//!     [`transforms::TransformOptions`], validated once into a [`TransformConfig`].
//!
//! Formats
//!
//!     - musicociel: JSON of the model, lossless.
//!     - chordpro: `{directives}` and inline `[chords]`.
//!     - text: chords above lyrics, aligned by column.
//!
//!     Chord symbols are kept as written in the model; only the theory engine interprets them.

pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod registry;
pub mod theory;
pub mod transforms;

pub use convert::{convert, load_song, ConvertError, ConvertOutput, ConvertSpec, ConvertTarget};
pub use error::FormatError;
pub use format::Format;
pub use model::{Line, Section, Segment, SheetMusic, Song};
pub use registry::FormatRegistry;
pub use transforms::{TransformConfig, TransformError, TransformOptions};
