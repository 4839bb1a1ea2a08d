//! Rotates a sequence of background images on a visual element, optionally cross-fading between
//! them.
//!
//! The element is reached through the [`Layer`]/[`Document`] traits; [`sim`] provides an in-memory
//! implementation. A [`Controller`] resolves the image list, prefetches it, builds the extra layers a
//! cross-fade needs and then switches images on a timer driven by the host loop.

pub mod compositor;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod layer;
pub mod preload;
pub mod resize;
pub mod scheduler;
pub mod sequence;
pub mod sim;
pub mod state;
pub mod synth;

#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::{Configuration, ImageSource};
pub use controller::Controller;
pub use error::{SwitcherError, SwitcherResult};
pub use layer::{Background, Document, Edges, Layer, Point, Position, Rgba, Size};
pub use sequence::ImageSequence;
pub use state::{Phase, RotationState};
