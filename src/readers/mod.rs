// src/readers/mod.rs

//! Readers driving [`SelRecord`] over the rotated log files.
//!
//! [`SelRecord`]: crate::data::sel::SelRecord

pub mod selprocessor;
pub mod selstream;
