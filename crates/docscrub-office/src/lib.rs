//! Office Open XML containers for docscrub
//!
//! Opens `.docx` and `.pptx` packages as [`DocumentContainer`]s, walks their
//! paragraphs through a [`DetectorAdapter`](docscrub_detect::DetectorAdapter)
//! and writes the redacted package back.

pub mod container;
pub mod docx;
pub mod error;
pub mod package;
pub mod pptx;
pub mod walker;
pub mod xml;

#[cfg(test)]
mod testing;

pub use container::{DocumentContainer, ParagraphAccess, ParagraphContext, ParagraphLocation};
pub use docx::{WordDocument, WordOptions, WordRedaction};
pub use error::{OfficeError, Result};
pub use pptx::{Presentation, SlideOptions};
pub use walker::redact_container;

use docscrub_core::DocumentFormat;

/// Per-format redaction settings
#[derive(Debug, Clone, Default)]
pub struct OfficeOptions {
    pub word: WordOptions,
    pub slides: SlideOptions,
}

/// Open `bytes` as a container of the given format
pub fn open_container(
    format: DocumentFormat,
    bytes: &[u8],
    options: &OfficeOptions,
) -> Result<Box<dyn DocumentContainer>> {
    let container: Box<dyn DocumentContainer> = match format {
        DocumentFormat::Docx => Box::new(WordDocument::open(bytes, options.word.clone())?),
        DocumentFormat::Pptx => Box::new(Presentation::open(bytes, options.slides.clone())?),
    };
    Ok(container)
}

/// `glyph` repeated once per char of `text`
pub(crate) fn mask_text(text: &str, glyph: char) -> String {
    std::iter::repeat_n(glyph, text.chars().count()).collect()
}
