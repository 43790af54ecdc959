#![no_std]
//! Spectrum visualization pipeline: sample a frequency source once per frame,
//! draw an amplitude-driven circle grid and a smooth spectrum curve onto a
//! raster surface, and publish the same curve as SVG path data to a vector
//! surface.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "logging")]
use defmt_rtt as _;

#[macro_use]
mod macros;

pub mod acquisition;
pub mod curve;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod grid;
pub mod recording;
pub mod renderer;
pub mod sampler;
pub mod scale;
pub mod session;
pub mod surface;
pub mod types;

pub use acquisition::{AcquireError, Acquisition};
pub use curve::{build_path, build_path_into, CurveConfig, CurveKind, Path, PathCommand};
pub use driver::{DriverState, FrameDriver, Layers, TickOutcome};
pub use error::SetupError;
pub use framebuffer::Framebuffer;
pub use grid::HexGrid;
pub use renderer::{Presentation, Renderer};
pub use sampler::{FrequencySampler, FrequencySource};
pub use scale::{CoordinateMapper, ScaleLinear};
pub use session::{setup, SessionConfig, Visualization};
pub use surface::{Paint, RasterSurface, VectorSurface};
pub use types::{AmplitudeBuffer, Viewport};
