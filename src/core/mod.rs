/// Core module for text and weather analysis
///
/// This module contains the analyzers, their input types, the pattern definitions they
/// share, and the result types they produce.

pub mod analyzer;
pub mod document;
pub mod error;
pub mod measurement;
pub mod patterns;
pub mod report;
pub mod station;
pub mod stats;
