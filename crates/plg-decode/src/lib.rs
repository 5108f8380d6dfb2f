//! `plg-decode` — path decoding, heading post-processing, and path generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`decoder`]   | `PathDecoder`, `NextNodePolicy`, `ArgMaxLowestIndex`         |
//! | [`path`]      | `GeneratedPath`, `PathEnd`, `PathFilter`                     |
//! | [`heading`]   | `PathSample`, `samples`, `headings`, `moving_average`        |
//! | [`generator`] | `PathGenerator` (random draws, retry, seeded batches)        |
//! | [`error`]     | `DecodeError`, `DecodeResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | `generate_batch` runs on Rayon's thread pool.               |
//! | `serde`    | Derives on `GeneratedPath`, `PathEnd`, `PathSample`.        |

pub mod decoder;
pub mod error;
pub mod generator;
pub mod heading;
pub mod path;


pub use decoder::{ArgMaxLowestIndex, NextNodePolicy, PathDecoder};
pub use error::{DecodeError, DecodeResult};
pub use generator::PathGenerator;
pub use heading::{headings, moving_average, samples, unwrap_angles, wrap_angle, PathSample};
pub use path::{GeneratedPath, PathEnd, PathFilter};
