//! ID card compositing engine.
//!
//! Takes a blank raster template (landscape/portrait x front/back), overlays
//! auto-sized text fields, a portrait photo and the school logo, and produces
//! finished PNG buffers, individually or in bulk as a ZIP archive. The
//! surrounding school-management backend supplies resolved [`model::StudentRecord`]
//! and [`model::SchoolInfo`] values and consumes the buffers; routing and
//! validation live there, not here.

pub mod assets;
pub mod batch;
pub mod cleanup;
pub mod config;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod render;
pub mod service;
pub mod text;
pub mod util;

pub use config::EngineConfig;
pub use model::{Orientation, SchoolInfo, Side, StudentRecord};
pub use service::{CardError, CardService};
