#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]
#![allow(clippy::manual_is_multiple_of)]

pub mod logging;
pub mod constants;
pub mod geometry;
pub mod models;
pub mod import;
pub mod style;
pub mod selection;
pub mod overlay;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use import::{parse_route_csv, RouteTable};
pub use models::{RouteGraph, RouteMapSettings};
pub use selection::{ClickModifiers, SelectionDelta, SelectionRequest};
pub use state::RouteMapState;

#[cfg(target_arch = "wasm32")]
pub use bindings::RouteMapVisual;
