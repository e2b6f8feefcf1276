//! WordprocessingML (`.docx`) container

use docscrub_core::DocumentFormat;
use tracing::debug;

use crate::container::{DocumentContainer, ParagraphAccess, ParagraphContext, ParagraphLocation};
use crate::package::{Package, numbered_parts, rels_part_name};
use crate::xml::{Element, XmlDocument};
use crate::{OfficeError, Result, mask_text};

const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Relationship kinds of the main part that hold visible text, in walk order
const SECONDARY_PARTS: &[(&str, ParagraphContext)] = &[
    ("header", ParagraphContext::HeaderFooter),
    ("footer", ParagraphContext::HeaderFooter),
    ("footnotes", ParagraphContext::Note),
    ("endnotes", ParagraphContext::Note),
];

/// Elements between a paragraph and its runs that still carry visible text
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:smartTag",
    "w:sdt",
    "w:sdtContent",
    "w:customXml",
    "w:fldSimple",
    "w:moveTo",
    "w:bdo",
    "w:dir",
];

/// Tracked deletions: not visible text, never walked
const DELETED: &[&str] = &["w:del", "w:moveFrom"];

const RUN_ORDER: &[&str] = &["w:rPr"];

/// Child sequence of `w:rPr` (CT_RPr)
const RPR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
    "w:rPrChange",
];

const THEME_COLOR_ATTRS: &[&str] = &["w:themeColor", "w:themeTint", "w:themeShade"];

/// How a Word run is obliterated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordRedaction {
    /// Black highlight and black font over the original characters
    #[default]
    Overlay,
    /// Characters replaced by the mask glyph
    Substitute,
}

#[derive(Debug, Clone)]
pub struct WordOptions {
    pub style: WordRedaction,
    pub mask_char: char,
    /// `w:sz` forced onto substituted runs without one, in half-points
    pub fallback_half_points: u32,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            style: WordRedaction::Overlay,
            mask_char: '█',
            fallback_half_points: 22,
        }
    }
}

struct WordPart {
    name: String,
    context: ParagraphContext,
    document: XmlDocument,
}

/// An opened `.docx`: the main document part plus headers, footers and notes
pub struct WordDocument {
    package: Package,
    parts: Vec<WordPart>,
    options: WordOptions,
}

impl WordDocument {
    pub fn open(bytes: &[u8], options: WordOptions) -> Result<Self> {
        let package = Package::read(bytes)?;

        let main = package
            .main_part()?
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
        let document = package.read_xml(&main)?;
        if !document.root.is("w:document") {
            return Err(OfficeError::Malformed {
                part: main,
                message: format!("expected <w:document>, found <{}>", document.root.name),
            });
        }

        let mut parts = vec![WordPart {
            name: main.clone(),
            context: ParagraphContext::Body,
            document,
        }];

        let extra = if package.has_part(&rels_part_name(&main)) {
            let mut extra = Vec::new();
            for (kind, context) in SECONDARY_PARTS {
                extra.extend(
                    package
                        .related_parts(&main, kind)?
                        .into_iter()
                        .map(|name| (name, *context)),
                );
            }
            extra
        } else {
            conventional_parts(&package, &main)
        };

        for (name, context) in extra {
            let document = package.read_xml(&name)?;
            parts.push(WordPart {
                name,
                context,
                document,
            });
        }

        debug!(
            parts = parts.len(),
            main = %main,
            "Opened Word document"
        );

        Ok(Self {
            package,
            parts,
            options,
        })
    }
}

/// Secondary parts by file name, for packages whose main part declares no
/// relationships
fn conventional_parts(package: &Package, main: &str) -> Vec<(String, ParagraphContext)> {
    let dir = main.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let mut parts = Vec::new();
    for prefix in ["header", "footer"] {
        parts.extend(
            numbered_parts(package, dir, prefix)
                .into_iter()
                .map(|name| (name, ParagraphContext::HeaderFooter)),
        );
    }
    for notes in ["footnotes.xml", "endnotes.xml"] {
        let name = match dir {
            "" => notes.to_string(),
            dir => format!("{dir}/{notes}"),
        };
        if package.has_part(&name) {
            parts.push((name, ParagraphContext::Note));
        }
    }
    parts
}

impl DocumentContainer for WordDocument {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn for_each_paragraph(&mut self, visit: &mut dyn FnMut(&mut dyn ParagraphAccess)) {
        for part in &mut self.parts {
            let mut cursor = PartCursor {
                part: &part.name,
                next: 0,
                options: &self.options,
            };
            walk(&mut part.document.root, part.context, &mut cursor, visit);
        }
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        for part in &self.parts {
            self.package.write_xml(&part.name, &part.document)?;
        }
        self.package.to_bytes()
    }
}

struct PartCursor<'a> {
    part: &'a str,
    next: usize,
    options: &'a WordOptions,
}

/// Depth-first over the part; a paragraph is visited before the paragraphs
/// nested inside it (text boxes)
fn walk(
    el: &mut Element,
    context: ParagraphContext,
    cursor: &mut PartCursor<'_>,
    visit: &mut dyn FnMut(&mut dyn ParagraphAccess),
) {
    if el.is("w:p") {
        let mut paragraph = WordParagraph {
            element: &mut *el,
            location: ParagraphLocation {
                part: cursor.part.to_string(),
                context,
                index: cursor.next,
            },
            options: cursor.options,
        };
        cursor.next += 1;
        visit(&mut paragraph);
    }

    let context = match context {
        ParagraphContext::Body if el.is("w:tc") => ParagraphContext::TableCell,
        other => other,
    };
    for child in el.elements_mut() {
        if !DELETED.contains(&child.name.as_str()) {
            walk(child, context, cursor, visit);
        }
    }
}

struct WordParagraph<'a> {
    element: &'a mut Element,
    location: ParagraphLocation,
    options: &'a WordOptions,
}

impl ParagraphAccess for WordParagraph<'_> {
    fn location(&self) -> &ParagraphLocation {
        &self.location
    }

    fn run_texts(&self) -> Vec<String> {
        let mut runs = Vec::new();
        collect_runs(self.element, &mut runs);
        runs.into_iter().map(run_text).collect()
    }

    fn redact_run(&mut self, index: usize) -> Result<()> {
        let mut runs = Vec::new();
        collect_runs_mut(&mut *self.element, &mut runs);
        let len = runs.len();
        let run = runs
            .into_iter()
            .nth(index)
            .ok_or(OfficeError::RunOutOfRange { index, len })?;

        match self.options.style {
            WordRedaction::Overlay => overlay(run),
            WordRedaction::Substitute => substitute(run, self.options),
        }
        Ok(())
    }
}

fn collect_runs<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.elements() {
        if child.is("w:r") {
            out.push(child);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            collect_runs(child, out);
        }
    }
}

fn collect_runs_mut<'a>(el: &'a mut Element, out: &mut Vec<&'a mut Element>) {
    for child in el.elements_mut() {
        if child.is("w:r") {
            out.push(child);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            collect_runs_mut(child, out);
        }
    }
}

fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&child.text()),
            "w:tab" | "w:ptab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

fn overlay(run: &mut Element) {
    let rpr = run.ensure_child("w:rPr", RUN_ORDER);
    force_black(rpr);
    rpr.ensure_child("w:highlight", RPR_ORDER)
        .set_attr("w:val", "black");
}

fn substitute(run: &mut Element, options: &WordOptions) {
    for t in run.elements_mut().filter(|el| el.is("w:t")) {
        let masked = mask_text(&t.text(), options.mask_char);
        t.set_text(&masked);
    }

    let rpr = run.ensure_child("w:rPr", RUN_ORDER);
    force_black(rpr);
    if rpr.child("w:sz").is_none() {
        rpr.ensure_child("w:sz", RPR_ORDER)
            .set_attr("w:val", &options.fallback_half_points.to_string());
    }
}

fn force_black(rpr: &mut Element) {
    let color = rpr.ensure_child("w:color", RPR_ORDER);
    color.set_attr("w:val", "000000");
    for attr in THEME_COLOR_ATTRS {
        color.remove_attr(attr);
    }
}
