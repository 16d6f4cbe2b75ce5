//! `odolog extract <FILE>`: run the field extractor offline.
//!
//! Image files go through Tesseract first; anything else is treated as
//! already-recognized text.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use odolog_config::OcrConfig;
use odolog_understanding::{
    extract_fields, TesseractOcr, DEFAULT_OCR_LANGUAGE, DEFAULT_OCR_TIMEOUT, DEFAULT_TESSERACT_BIN,
};
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Extracted fields as pretty JSON.
pub fn fields_json(text: &str) -> Result<String> {
    serde_json::to_string_pretty(&extract_fields(text)).context("Failed to serialize fields")
}

pub async fn run(file: &Path, ocr: &OcrConfig) -> Result<()> {
    let text = if is_image_path(file) {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read image {}", file.display()))?;
        let engine = TesseractOcr::new(
            ocr.tesseract_bin.as_deref().unwrap_or(DEFAULT_TESSERACT_BIN),
            ocr.language.as_deref().unwrap_or(DEFAULT_OCR_LANGUAGE),
            ocr.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_OCR_TIMEOUT),
        );
        engine.recognize_bytes(&bytes).await?
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read text file {}", file.display()))?
    };
    debug!(chars = text.len(), "Recognized text");

    println!("{}", fields_json(&text)?);
    Ok(())
}
