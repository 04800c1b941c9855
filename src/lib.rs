//! Codecfit - transcode config normalization against container/codec rules
//!
//! This library crate exposes the CLI's settings and input handling for
//! integration testing. The rule engine lives in `codecfit-rules`.

pub mod config;
pub mod input;
