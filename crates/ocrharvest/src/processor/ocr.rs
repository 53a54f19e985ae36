use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use image::GenericImageView;
use tracing::{debug, warn};

use crate::config::{expand_home, ImageFormat, RunConfig};
use crate::error::ProcessError;

/// Tesseract language used when the hinted languages cannot be loaded.
const FALLBACK_TESSERACT_LANGUAGE: &str = "eng";

/// Position of a recognized region on the page.
///
/// Coordinates are normalized to `[0, 1]` with the origin at the
/// **bottom-left** corner of the image and `y` growing upward; `(x, y)` is the
/// bottom-left corner of the box. Reading order depends on this convention,
/// so engines that report pixel boxes with a top-left origin must convert
/// through [`BoundingBox::from_pixel_rect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts a pixel rectangle (top-left origin, y growing downward) into
    /// normalized bottom-left coordinates.
    pub fn from_pixel_rect(
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        if image_width == 0 || image_height == 0 {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }

        let iw = image_width as f64;
        let ih = image_height as f64;
        let bottom = (top as f64 + height as f64).min(ih);

        Self {
            x: (left as f64 / iw).clamp(0.0, 1.0),
            y: ((ih - bottom) / ih).clamp(0.0, 1.0),
            width: (width as f64 / iw).clamp(0.0, 1.0),
            height: (height as f64 / ih).clamp(0.0, 1.0),
        }
    }
}

/// A single piece of recognized text and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub bounding_box: BoundingBox,
    pub text: String,
}

impl TextRegion {
    pub fn new(bounding_box: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bounding_box,
            text: text.into(),
        }
    }
}

/// Result of running OCR on one image.
///
/// `NoText` and `Failed` are both treated as an empty page by the pipeline;
/// they stay distinct so callers can report why nothing was recognized.
#[derive(Debug)]
pub enum OcrOutcome {
    Recognized(Vec<TextRegion>),
    NoText,
    Failed(ProcessError),
}

impl OcrOutcome {
    pub fn from_regions(regions: Vec<TextRegion>) -> Self {
        if regions.is_empty() {
            Self::NoText
        } else {
            Self::Recognized(regions)
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The recognized regions, empty unless recognition succeeded.
    pub fn into_regions(self) -> Vec<TextRegion> {
        match self {
            Self::Recognized(regions) => regions,
            Self::NoText | Self::Failed(_) => Vec::new(),
        }
    }
}

/// An OCR capability the pipeline can be pointed at.
///
/// Implementations must not panic on unreadable images or unsupported
/// language hints: the former is reported as [`OcrOutcome::Failed`], the
/// latter should fall back to the engine's default language.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_path: &Path, language_hints: &[String]) -> OcrOutcome;
}

/// OCR engine backed by Tesseract through `leptess`.
///
/// A fresh Tesseract handle is created for every image, so one engine can be
/// shared across worker threads.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    data_path: Option<String>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses traineddata files from `data_path` instead of Tesseract's default
    /// location.
    pub fn with_data_path(data_path: impl Into<String>) -> Self {
        Self {
            data_path: Some(data_path.into()),
        }
    }

    /// Engine for a run: honours `tessdata_dir`, with `~` expanded.
    pub fn from_config(config: &RunConfig) -> Self {
        match &config.tessdata_dir {
            Some(dir) => Self::with_data_path(expand_home(dir).to_string_lossy()),
            None => Self::new(),
        }
    }

    pub fn data_path(&self) -> Option<&str> {
        self.data_path.as_deref()
    }

    fn try_recognize(
        &self,
        image_path: &Path,
        language_hints: &[String],
    ) -> Result<Vec<TextRegion>, ProcessError> {
        let extension = image_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match ImageFormat::from_extension(extension) {
            Some(format) if format.is_decodable() => {}
            _ => return Err(ProcessError::UnsupportedFormat(extension.to_string())),
        }

        let image_data = std::fs::read(image_path).map_err(|e| ProcessError::ReadImage {
            path: image_path.to_path_buf(),
            source: e,
        })?;

        let img = image::load_from_memory(&image_data)
            .map_err(|e| ProcessError::DecodeImage(e.to_string()))?;
        let (width, height) = img.dimensions();

        // Re-encode as PNG in memory so leptonica sees a single known format
        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| ProcessError::DecodeImage(format!("Failed to convert image: {}", e)))?;

        let mut lt = self.init_tesseract(language_hints)?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;

        let tsv = lt
            .get_tsv_text(0)
            .map_err(|e| ProcessError::OcrFailed(e.to_string()))?;

        Ok(parse_tsv_regions(&tsv, width, height))
    }

    fn init_tesseract(&self, language_hints: &[String]) -> Result<leptess::LepTess, ProcessError> {
        let languages = tesseract_languages(language_hints);
        let data_path = self.data_path.as_deref();

        match leptess::LepTess::new(data_path, &languages) {
            Ok(lt) => Ok(lt),
            Err(e) if languages != FALLBACK_TESSERACT_LANGUAGE => {
                warn!(
                    "Tesseract rejected languages '{}' ({}), falling back to '{}'",
                    languages, e, FALLBACK_TESSERACT_LANGUAGE
                );
                leptess::LepTess::new(data_path, FALLBACK_TESSERACT_LANGUAGE).map_err(|e| {
                    ProcessError::EngineInit {
                        languages: FALLBACK_TESSERACT_LANGUAGE.to_string(),
                        reason: e.to_string(),
                    }
                })
            }
            Err(e) => Err(ProcessError::EngineInit {
                languages,
                reason: e.to_string(),
            }),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image_path: &Path, language_hints: &[String]) -> OcrOutcome {
        let _span = tracing::info_span!("processor.ocr").entered();

        match self.try_recognize(image_path, language_hints) {
            Ok(regions) => {
                debug!("Recognized {} text lines", regions.len());
                OcrOutcome::from_regions(regions)
            }
            Err(e) => OcrOutcome::Failed(e),
        }
    }
}

/// Maps BCP-47 tags to Tesseract traineddata codes joined with `+`.
///
/// Unknown primary subtags are passed through lowercased so that Tesseract
/// codes such as `eng` can be given directly. An empty hint list maps to the
/// fallback language.
pub fn tesseract_languages(language_hints: &[String]) -> String {
    let mut codes: Vec<String> = Vec::new();

    for hint in language_hints {
        let code = tesseract_code(hint);
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }

    if codes.is_empty() {
        FALLBACK_TESSERACT_LANGUAGE.to_string()
    } else {
        codes.join("+")
    }
}

fn tesseract_code(tag: &str) -> String {
    let normalized = tag.trim().replace('_', "-").to_lowercase();
    let mut subtags = normalized.split('-');
    let primary = subtags.next().unwrap_or("");
    let rest: Vec<&str> = subtags.collect();

    let code = match primary {
        "en" => "eng",
        "pl" => "pol",
        "de" => "deu",
        "fr" => "fra",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "nl" => "nld",
        "sv" => "swe",
        "da" => "dan",
        "no" | "nb" | "nn" => "nor",
        "fi" => "fin",
        "cs" => "ces",
        "sk" => "slk",
        "uk" => "ukr",
        "ru" => "rus",
        "tr" => "tur",
        "el" => "ell",
        "hu" => "hun",
        "ro" => "ron",
        "ja" => "jpn",
        "ko" => "kor",
        "ar" => "ara",
        "he" => "heb",
        "hi" => "hin",
        "zh" => {
            let traditional = rest
                .iter()
                .any(|s| matches!(*s, "hant" | "tw" | "hk" | "mo"));
            if traditional {
                "chi_tra"
            } else {
                "chi_sim"
            }
        }
        other => other,
    };

    code.to_string()
}

/// Builds line regions from Tesseract TSV output.
///
/// Level 4 rows carry line boxes, level 5 rows carry the words of a line.
/// Lines are returned in the order Tesseract reports them; lines without any
/// non-blank word are dropped.
pub fn parse_tsv_regions(tsv: &str, image_width: u32, image_height: u32) -> Vec<TextRegion> {
    struct Line {
        bounding_box: BoundingBox,
        words: Vec<String>,
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut index: HashMap<(u32, u32, u32, u32), usize> = HashMap::new();

    for row in tsv.lines() {
        let columns: Vec<&str> = row.splitn(12, '\t').collect();
        if columns.len() < 11 {
            continue;
        }

        let numbers: Option<Vec<u32>> = columns[..10]
            .iter()
            .map(|c| c.trim().parse::<u32>().ok())
            .collect();
        // Header row and malformed rows fail to parse
        let Some(n) = numbers else {
            continue;
        };

        let key = (n[1], n[2], n[3], n[4]);
        match n[0] {
            4 => {
                index.entry(key).or_insert_with(|| {
                    lines.push(Line {
                        bounding_box: BoundingBox::from_pixel_rect(
                            n[6],
                            n[7],
                            n[8],
                            n[9],
                            image_width,
                            image_height,
                        ),
                        words: Vec::new(),
                    });
                    lines.len() - 1
                });
            }
            5 => {
                let word = columns.get(11).map(|w| w.trim()).unwrap_or("");
                if word.is_empty() {
                    continue;
                }
                if let Some(&i) = index.get(&key) {
                    lines[i].words.push(word.to_string());
                }
            }
            _ => {}
        }
    }

    lines
        .into_iter()
        .filter(|line| !line.words.is_empty())
        .map(|line| TextRegion::new(line.bounding_box, line.words.join(" ")))
        .collect()
}
