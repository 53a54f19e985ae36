//! Shared utilities for ocrharvest integration tests.
//!
//! - `TestHarness` owns scratch input/output directories and runs the pipeline
//! - `FakeEngine` returns scripted OCR regions keyed by file stem

pub mod fake_engine;
pub mod harness;

pub use fake_engine::FakeEngine;
pub use harness::TestHarness;
