//! Building blocks for chart components.
//!
//! Two independent halves:
//! - [`config`] applies declarative configuration trees onto component graphs,
//!   instantiating typed children through an explicit [`ClassRegistry`].
//! - [`path`] emits SVG path fragments (lines, curves, arcs, rounded slices)
//!   and samples points back out of path data.

pub mod config;
pub mod errors;
pub mod log;
pub mod path;
pub mod types;

pub use config::{
    ClassRegistry, Component, ConfigMap, ConfigNode, ConfigProcessor, ProcessorOptions, Slot,
};
pub use errors::{ConfigError, CriticalConfigError, ParseValueError};
pub use path::{ArcParams, Point, Rect};
pub use types::{Color, Percent, Value};

/// Apply `config` to `target` with default options, reporting failures as a
/// single [`CriticalConfigError`].
pub fn configure(
    registry: &ClassRegistry,
    target: &mut dyn Component,
    config: ConfigNode,
) -> Result<(), CriticalConfigError> {
    ConfigProcessor::new(registry).configure(target, config)
}
