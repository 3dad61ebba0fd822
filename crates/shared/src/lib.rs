//! Core logic for the zoomable electorate map widget: name resolution,
//! focus planning, transition sequencing, and label placement.
//!
//! Everything here is pure and synchronous. Rendering, projection, and the
//! DOM live in the frontend crate; this crate only decides where the camera
//! should go and what the renderer should do about it.

pub mod controller;
pub mod index;
pub mod labels;
pub mod models;
pub mod planner;
pub mod sequencer;
