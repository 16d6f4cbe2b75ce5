pub mod extract;
pub mod ocr;

pub use extract::{extract_fields, ExtractedFields};
pub use ocr::{TesseractOcr, DEFAULT_OCR_LANGUAGE, DEFAULT_OCR_TIMEOUT, DEFAULT_TESSERACT_BIN};
