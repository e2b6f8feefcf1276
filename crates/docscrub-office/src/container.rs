//! Format-neutral view of a document as paragraphs of runs

use docscrub_core::DocumentFormat;
use std::fmt;

use crate::Result;

/// Where a paragraph sits in its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParagraphContext {
    Body,
    TableCell,
    HeaderFooter,
    /// Footnote or endnote
    Note,
    Shape,
    /// Speaker notes of a slide
    Notes,
}

impl ParagraphContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParagraphContext::Body => "body",
            ParagraphContext::TableCell => "table_cell",
            ParagraphContext::HeaderFooter => "header_footer",
            ParagraphContext::Note => "note",
            ParagraphContext::Shape => "shape",
            ParagraphContext::Notes => "notes",
        }
    }
}

impl fmt::Display for ParagraphContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a paragraph without exposing its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphLocation {
    pub part: String,
    pub context: ParagraphContext,
    /// Position among the part's paragraphs, in document order
    pub index: usize,
}

impl fmt::Display for ParagraphLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.part, self.index, self.context)
    }
}

/// One paragraph, borrowed from its container while it is visited
pub trait ParagraphAccess {
    fn location(&self) -> &ParagraphLocation;

    /// Text of each run, in order; the paragraph text is their concatenation
    fn run_texts(&self) -> Vec<String>;

    /// Obliterate run `index` of the list returned by [`run_texts`](Self::run_texts)
    fn redact_run(&mut self, index: usize) -> Result<()>;
}

/// An opened document that can be walked and written back
pub trait DocumentContainer {
    fn format(&self) -> DocumentFormat;

    /// Visit every paragraph in document order
    fn for_each_paragraph(&mut self, visit: &mut dyn FnMut(&mut dyn ParagraphAccess));

    /// Write the (possibly modified) document into a fresh package
    fn serialize(&mut self) -> Result<Vec<u8>>;
}
