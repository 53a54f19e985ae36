#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use ocrharvest::processor::base_name;
use ocrharvest::{BoundingBox, OcrEngine, OcrOutcome, ProcessError, TextRegion};

enum Script {
    Regions(Vec<TextRegion>),
    Fail(String),
}

/// OCR engine whose output is scripted per file stem.
///
/// Unscripted files recognize no text.
#[derive(Default)]
pub struct FakeEngine {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines laid out top to bottom, in the order given.
    pub fn lines(self, stem: &str, lines: &[&str]) -> Self {
        let n = lines.len() as f64;
        let regions = lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let y = 1.0 - (i as f64 + 1.0) / (n + 1.0);
                TextRegion::new(BoundingBox::new(0.05, y, 0.9, 0.04), *text)
            })
            .collect();
        self.regions(stem, regions)
    }

    /// Arbitrary regions, returned to the pipeline in the order given.
    pub fn regions(mut self, stem: &str, regions: Vec<TextRegion>) -> Self {
        self.scripts
            .insert(stem.to_string(), Script::Regions(regions));
        self
    }

    pub fn failing(mut self, stem: &str, reason: &str) -> Self {
        self.scripts
            .insert(stem.to_string(), Script::Fail(reason.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeEngine {
    fn recognize(&self, image_path: &Path, _language_hints: &[String]) -> OcrOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.scripts.get(&base_name(image_path)) {
            Some(Script::Regions(regions)) => OcrOutcome::from_regions(regions.clone()),
            Some(Script::Fail(reason)) => {
                OcrOutcome::Failed(ProcessError::OcrFailed(reason.clone()))
            }
            None => OcrOutcome::NoText,
        }
    }
}
