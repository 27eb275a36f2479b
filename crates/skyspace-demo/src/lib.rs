#![forbid(unsafe_code)]

//! Terminal viewer for skyspace light fields.
//!
//! The viewer draws one field pixel per half cell: each terminal cell shows
//! an upper-half block whose foreground is the upper pixel and whose
//! background is the lower pixel.

pub mod cli;
pub mod presenter;
pub mod session;
