//! Interactive screen capture and annotation engine
//!
//! Stitches monitor captures into one logical canvas, lets the host drive a
//! selection and drawing tools over it, and flattens the result for export.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod export;
pub mod render;
pub mod session;
