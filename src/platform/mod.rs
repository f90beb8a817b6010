// src/platform/mod.rs

//! OS and platform integration: the platform abstraction layer (FRU
//! resolution), the process-wide clear lock, and control of the external
//! log-writer process.

pub mod clearlock;
pub mod loggerctl;
pub mod pal;
