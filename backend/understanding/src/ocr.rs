//! Optical Character Recognition (OCR)
//!
//! Downloads an image attachment and pipes it through the local `tesseract`
//! binary (`tesseract stdin stdout -l <lang>`), returning the raw text block.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use odolog_core::{Attachment, OcrEngine};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Default upper bound on one OCR call.
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(60);

/// Tesseract-backed OCR engine.
pub struct TesseractOcr {
    binary: String,
    language: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            timeout,
            http: reqwest::Client::new(),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image {url}"))?;
        if !resp.status().is_success() {
            bail!("Image download returned HTTP {}", resp.status());
        }
        Ok(resp.bytes().await?.to_vec())
    }

    /// Run tesseract over raw image bytes.
    pub async fn recognize_bytes(&self, image: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn OCR binary '{}'", self.binary))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await.context("Failed to feed image to OCR")?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| format!("OCR timed out after {:?}", self.timeout))??;

        if !output.status.success() {
            bail!(
                "OCR exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_BIN, DEFAULT_OCR_LANGUAGE, DEFAULT_OCR_TIMEOUT)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &Attachment) -> Result<String> {
        info!(file = %image.filename, "Running OCR on attachment");
        let bytes = self.download(&image.url).await?;
        debug!(bytes = bytes.len(), "Downloaded attachment");
        let text = self.recognize_bytes(&bytes).await?;
        debug!(chars = text.len(), "OCR finished");
        Ok(text)
    }
}
