// src/data/mod.rs

//! The SEL data types: one-line records and their timestamps.

pub mod datetime;
pub mod sel;
