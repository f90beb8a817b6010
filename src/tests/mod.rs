// src/tests/mod.rs

//! testing module

pub mod common;
pub mod selprocessor_tests;
