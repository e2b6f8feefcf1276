//! PresentationML (`.pptx`) container

use docscrub_core::DocumentFormat;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::container::{DocumentContainer, ParagraphAccess, ParagraphContext, ParagraphLocation};
use crate::package::{Package, numbered_parts, rels_part_name, resolve_target};
use crate::xml::{Element, Node, XmlDocument};
use crate::{OfficeError, Result, mask_text};

const DEFAULT_MAIN_PART: &str = "ppt/presentation.xml";

const RUN_ELEMENTS: &[&str] = &["a:r", "a:fld", "a:br"];

const RUN_ORDER: &[&str] = &["a:rPr"];

/// Child sequence of `a:rPr` (CT_TextCharacterProperties)
const CHAR_PROPS_ORDER: &[&str] = &[
    "a:ln",
    "a:noFill",
    "a:solidFill",
    "a:gradFill",
    "a:blipFill",
    "a:pattFill",
    "a:grpFill",
    "a:effectLst",
    "a:effectDag",
    "a:highlight",
    "a:uLnTx",
    "a:uLn",
    "a:uFillTx",
    "a:uFill",
    "a:latin",
    "a:ea",
    "a:cs",
    "a:sym",
    "a:hlinkClick",
    "a:hlinkMouseOver",
    "a:rtl",
    "a:extLst",
];

const FILLS: &[&str] = &[
    "a:noFill",
    "a:solidFill",
    "a:gradFill",
    "a:blipFill",
    "a:pattFill",
    "a:grpFill",
];

#[derive(Debug, Clone)]
pub struct SlideOptions {
    pub mask_char: char,
    /// `sz` for runs that inherit their size, in hundredths of a point
    pub fallback_size: u32,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            mask_char: '█',
            fallback_size: 1100,
        }
    }
}

struct SlidePart {
    name: String,
    context: ParagraphContext,
    document: XmlDocument,
}

/// An opened `.pptx`: slides in presentation order, then the notes slides
/// they link to
pub struct Presentation {
    package: Package,
    parts: Vec<SlidePart>,
    options: SlideOptions,
}

impl Presentation {
    pub fn open(bytes: &[u8], options: SlideOptions) -> Result<Self> {
        let package = Package::read(bytes)?;

        let main = package
            .main_part()?
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
        let presentation = package.read_xml(&main)?;
        if !presentation.root.is("p:presentation") {
            return Err(OfficeError::Malformed {
                part: main,
                message: format!(
                    "expected <p:presentation>, found <{}>",
                    presentation.root.name
                ),
            });
        }

        let dir = main.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let mut slides = listed_slides(&package, &main, &presentation)?;
        if slides.is_empty() {
            slides = numbered_parts(&package, &join(dir, "slides"), "slide");
        }
        let notes = if slides
            .iter()
            .any(|slide| package.has_part(&rels_part_name(slide)))
        {
            let mut notes = Vec::new();
            for slide in &slides {
                for name in package.related_parts(slide, "notesSlide")? {
                    if !notes.contains(&name) {
                        notes.push(name);
                    }
                }
            }
            notes
        } else {
            numbered_parts(&package, &join(dir, "notesSlides"), "notesSlide")
        };

        let mut parts = Vec::with_capacity(slides.len() + notes.len());
        for (names, context) in [
            (slides, ParagraphContext::Shape),
            (notes, ParagraphContext::Notes),
        ] {
            for name in names {
                let document = package.read_xml(&name)?;
                parts.push(SlidePart {
                    name,
                    context,
                    document,
                });
            }
        }

        debug!(parts = parts.len(), main = %main, "Opened presentation");

        Ok(Self {
            package,
            parts,
            options,
        })
    }
}

/// Slide parts named by `p:sldIdLst`, in list order
fn listed_slides(package: &Package, main: &str, presentation: &XmlDocument) -> Result<Vec<String>> {
    let targets: HashMap<String, String> = package
        .relationships(main)?
        .into_iter()
        .filter(|rel| !rel.external)
        .map(|rel| (rel.id, resolve_target(main, &rel.target)))
        .collect();

    let Some(list) = presentation.root.child("p:sldIdLst") else {
        return Ok(Vec::new());
    };

    let mut slides = Vec::new();
    for id in list.elements().filter(|el| el.is("p:sldId")) {
        let Some(rel_id) = id.attr("r:id") else {
            continue;
        };
        match targets.get(rel_id) {
            Some(target) if package.has_part(target) => slides.push(target.clone()),
            _ => warn!(rel_id, "Slide listed in presentation has no part"),
        }
    }
    Ok(slides)
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

impl DocumentContainer for Presentation {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pptx
    }

    fn for_each_paragraph(&mut self, visit: &mut dyn FnMut(&mut dyn ParagraphAccess)) {
        for part in &mut self.parts {
            let mut next = 0;
            walk(
                &mut part.document.root,
                part.context,
                &part.name,
                &mut next,
                &self.options,
                visit,
            );
        }
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        for part in &self.parts {
            self.package.write_xml(&part.name, &part.document)?;
        }
        self.package.to_bytes()
    }
}

fn walk(
    el: &mut Element,
    context: ParagraphContext,
    part: &str,
    next: &mut usize,
    options: &SlideOptions,
    visit: &mut dyn FnMut(&mut dyn ParagraphAccess),
) {
    if el.is("a:p") {
        let mut paragraph = SlideParagraph {
            element: el,
            location: ParagraphLocation {
                part: part.to_string(),
                context,
                index: *next,
            },
            options,
        };
        *next += 1;
        visit(&mut paragraph);
        return;
    }

    let context = match context {
        ParagraphContext::Shape if el.is("a:tc") => ParagraphContext::TableCell,
        other => other,
    };
    for child in el.elements_mut() {
        walk(child, context, part, next, options, visit);
    }
}

struct SlideParagraph<'a> {
    element: &'a mut Element,
    location: ParagraphLocation,
    options: &'a SlideOptions,
}

impl SlideParagraph<'_> {
    /// `sz` declared by the paragraph's default run properties
    fn default_size(&self) -> Option<String> {
        self.element
            .child("a:pPr")
            .and_then(|ppr| ppr.child("a:defRPr"))
            .and_then(|def| def.attr("sz"))
            .map(str::to_string)
    }
}

impl ParagraphAccess for SlideParagraph<'_> {
    fn location(&self) -> &ParagraphLocation {
        &self.location
    }

    fn run_texts(&self) -> Vec<String> {
        self.element
            .elements()
            .filter(|el| RUN_ELEMENTS.contains(&el.name.as_str()))
            .map(|run| match run.name.as_str() {
                "a:br" => "\n".to_string(),
                _ => run.child("a:t").map(Element::text).unwrap_or_default(),
            })
            .collect()
    }

    fn redact_run(&mut self, index: usize) -> Result<()> {
        let size = self
            .default_size()
            .unwrap_or_else(|| self.options.fallback_size.to_string());
        let mask_char = self.options.mask_char;

        let mut runs: Vec<&mut Element> = self
            .element
            .elements_mut()
            .filter(|el| RUN_ELEMENTS.contains(&el.name.as_str()))
            .collect();
        let len = runs.len();
        if index >= len {
            return Err(OfficeError::RunOutOfRange { index, len });
        }
        let run = &mut *runs[index];

        let rpr = run.ensure_child("a:rPr", RUN_ORDER);
        rpr.remove_children(FILLS);
        rpr.ensure_child("a:solidFill", CHAR_PROPS_ORDER)
            .children
            .push(Node::Element(
                Element::new("a:srgbClr").with_attr("val", "000000"),
            ));
        if rpr.attr("sz").is_none() {
            rpr.set_attr("sz", &size);
        }

        for t in run.elements_mut().filter(|el| el.is("a:t")) {
            let masked = mask_text(&t.text(), mask_char);
            t.set_text(&masked);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{A_NS, P_NS, R_NS, build_zip, part_text, pptx, shape, slide_xml};

    fn paragraphs(doc: &mut Presentation) -> Vec<(ParagraphLocation, Vec<String>)> {
        let mut seen = Vec::new();
        doc.for_each_paragraph(&mut |p| seen.push((p.location().clone(), p.run_texts())));
        seen
    }

    fn redact_first(doc: &mut Presentation, run: usize) -> Result<()> {
        let mut result = None;
        doc.for_each_paragraph(&mut |p| {
            if result.is_none() {
                result = Some(p.redact_run(run));
            }
        });
        result.unwrap()
    }

    fn para(runs: &str) -> String {
        format!("<a:p>{runs}</a:p>")
    }

    fn run(text: &str) -> String {
        format!("<a:r><a:rPr lang=\"en-US\"/><a:t>{text}</a:t></a:r>")
    }

    #[test]
    fn test_contexts_cover_shapes_groups_tables_and_notes() {
        let table = format!(
            "<p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr><a:tc><a:txBody>{}</a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>",
            para(&run("cell"))
        );
        let group = format!("<p:grpSp>{}</p:grpSp>", shape(&para(&run("grouped"))));
        let slide = format!("{}{group}{table}", shape(&para(&run("title"))));
        let second = shape(&para(&run("second")));
        let notes = shape(&para(&run("spoken")));
        let bytes = pptx(&[slide.as_str(), second.as_str()], &[notes.as_str()]);

        let mut doc = Presentation::open(&bytes, SlideOptions::default()).unwrap();
        let seen: Vec<_> = paragraphs(&mut doc)
            .into_iter()
            .map(|(loc, runs)| (loc.part, loc.context, runs.concat()))
            .collect();

        use ParagraphContext::*;
        let expected = [
            ("ppt/slides/slide1.xml", Shape, "title"),
            ("ppt/slides/slide1.xml", Shape, "grouped"),
            ("ppt/slides/slide1.xml", TableCell, "cell"),
            ("ppt/slides/slide2.xml", Shape, "second"),
            ("ppt/notesSlides/notesSlide1.xml", Notes, "spoken"),
        ];
        assert_eq!(seen.len(), expected.len());
        for (got, want) in seen.iter().zip(expected) {
            assert_eq!((got.0.as_str(), got.1, got.2.as_str()), want);
        }
    }

    #[test]
    fn test_slides_follow_presentation_order() {
        let presentation = format!(
            r#"<p:presentation xmlns:a="{A_NS}" xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldIdLst><p:sldId id="256" r:id="rId7"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst></p:presentation>"#
        );
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/><Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/></Relationships>"#;
        let first = slide_xml(&shape(&para(&run("one"))));
        let second = slide_xml(&shape(&para(&run("two"))));
        let bytes = build_zip(&[
            ("ppt/presentation.xml", presentation.as_str()),
            ("ppt/_rels/presentation.xml.rels", rels),
            ("ppt/slides/slide1.xml", first.as_str()),
            ("ppt/slides/slide2.xml", second.as_str()),
        ]);

        let mut doc = Presentation::open(&bytes, SlideOptions::default()).unwrap();
        let texts: Vec<_> = paragraphs(&mut doc)
            .into_iter()
            .map(|(_, runs)| runs.concat())
            .collect();
        assert_eq!(texts, ["two", "one"]);
    }

    #[test]
    fn test_notes_follow_slide_relationships() {
        let presentation = format!(
            r#"<p:presentation xmlns:a="{A_NS}" xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldIdLst><p:sldId id="256" r:id="rId1"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst></p:presentation>"#
        );
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/b.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/a.xml"/></Relationships>"#;
        let notes_rel = |target: &str| {
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="{target}"/></Relationships>"#
            )
        };
        let notes_xml = |text: &str| {
            format!(
                r#"<p:notes xmlns:a="{A_NS}" xmlns:p="{P_NS}"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:notes>"#,
                shape(&para(&run(text)))
            )
        };
        let first = slide_xml(&shape(&para(&run("one"))));
        let second = slide_xml(&shape(&para(&run("two"))));
        let first_rels = notes_rel("../talk/second.xml");
        let second_rels = notes_rel("../talk/first.xml");
        let first_notes = notes_xml("said first");
        let second_notes = notes_xml("said second");
        let orphan = notes_xml("never linked");
        let bytes = build_zip(&[
            ("ppt/presentation.xml", presentation.as_str()),
            ("ppt/_rels/presentation.xml.rels", rels),
            ("ppt/slides/b.xml", first.as_str()),
            ("ppt/slides/_rels/b.xml.rels", first_rels.as_str()),
            ("ppt/slides/a.xml", second.as_str()),
            ("ppt/slides/_rels/a.xml.rels", second_rels.as_str()),
            ("ppt/talk/first.xml", second_notes.as_str()),
            ("ppt/talk/second.xml", first_notes.as_str()),
            ("ppt/notesSlides/notesSlide1.xml", orphan.as_str()),
        ]);

        let mut doc = Presentation::open(&bytes, SlideOptions::default()).unwrap();
        let seen: Vec<_> = paragraphs(&mut doc)
            .into_iter()
            .map(|(loc, runs)| (loc.part, loc.context, runs.concat()))
            .collect();

        use ParagraphContext::*;
        let expected = [
            ("ppt/slides/b.xml", Shape, "one"),
            ("ppt/slides/a.xml", Shape, "two"),
            ("ppt/talk/second.xml", Notes, "said first"),
            ("ppt/talk/first.xml", Notes, "said second"),
        ];
        assert_eq!(seen.len(), expected.len());
        for (got, want) in seen.iter().zip(expected) {
            assert_eq!((got.0.as_str(), got.1, got.2.as_str()), want);
        }
    }

    #[test]
    fn test_slides_fall_back_to_numeric_order() {
        let presentation = format!(r#"<p:presentation xmlns:p="{P_NS}"/>"#);
        let slides: Vec<String> = ["ten", "two"]
            .iter()
            .map(|t| slide_xml(&shape(&para(&run(t)))))
            .collect();
        let bytes = build_zip(&[
            ("ppt/presentation.xml", presentation.as_str()),
            ("ppt/slides/slide10.xml", slides[0].as_str()),
            ("ppt/slides/slide2.xml", slides[1].as_str()),
        ]);

        let mut doc = Presentation::open(&bytes, SlideOptions::default()).unwrap();
        let parts: Vec<_> = paragraphs(&mut doc)
            .into_iter()
            .map(|(loc, _)| loc.part)
            .collect();
        assert_eq!(parts, ["ppt/slides/slide2.xml", "ppt/slides/slide10.xml"]);
    }

    #[test]
    fn test_run_texts_include_fields_and_breaks() {
        let paragraph = para(&format!(
            "<a:pPr algn=\"l\"/>{}<a:br><a:rPr/></a:br><a:fld id=\"{{1}}\" type=\"slidenum\"><a:t>7</a:t></a:fld><a:endParaRPr/>",
            run("Page")
        ));
        let mut doc = Presentation::open(&pptx(&[shape(&paragraph).as_str()], &[]), SlideOptions::default()).unwrap();
        let seen = paragraphs(&mut doc);
        assert_eq!(seen[0].1, ["Page", "\n", "7"]);
    }

    #[test]
    fn test_substitution_replaces_fill_and_text() {
        let paragraph = para(concat!(
            "<a:pPr><a:defRPr sz=\"2400\"/></a:pPr>",
            "<a:r><a:rPr lang=\"en-US\" b=\"1\"><a:ln/><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill><a:latin typeface=\"Arial\"/></a:rPr><a:t>Jane Doe</a:t></a:r>"
        ));
        let mut doc = Presentation::open(&pptx(&[shape(&paragraph).as_str()], &[]), SlideOptions::default()).unwrap();
        redact_first(&mut doc, 0).unwrap();

        let seen = paragraphs(&mut doc);
        assert_eq!(seen[0].1, ["████████"]);

        let xml = part_text(&doc.serialize().unwrap(), "ppt/slides/slide1.xml");
        assert!(xml.contains(concat!(
            "<a:rPr lang=\"en-US\" b=\"1\" sz=\"2400\"><a:ln/>",
            "<a:solidFill><a:srgbClr val=\"000000\"/></a:solidFill>",
            "<a:latin typeface=\"Arial\"/></a:rPr><a:t>████████</a:t>"
        )));
        assert!(!xml.contains("schemeClr"));
        assert!(!xml.contains("Jane"));
    }

    #[test]
    fn test_substitution_size_fallback_and_existing_size() {
        let paragraph = para(concat!(
            "<a:r><a:t>first</a:t></a:r>",
            "<a:r><a:rPr sz=\"1800\"><a:gradFill/></a:rPr><a:t>second</a:t></a:r>"
        ));
        let mut doc = Presentation::open(&pptx(&[shape(&paragraph).as_str()], &[]), SlideOptions::default()).unwrap();
        redact_first(&mut doc, 0).unwrap();
        redact_first(&mut doc, 1).unwrap();

        let xml = part_text(&doc.serialize().unwrap(), "ppt/slides/slide1.xml");
        assert!(xml.contains(
            "<a:r><a:rPr sz=\"1100\"><a:solidFill><a:srgbClr val=\"000000\"/></a:solidFill></a:rPr><a:t>█████</a:t></a:r>"
        ));
        assert!(xml.contains(
            "<a:rPr sz=\"1800\"><a:solidFill><a:srgbClr val=\"000000\"/></a:solidFill></a:rPr><a:t>██████</a:t>"
        ));
    }

    #[test]
    fn test_run_out_of_range() {
        let mut doc = Presentation::open(&pptx(&[shape(&para(&run("x"))).as_str()], &[]), SlideOptions::default()).unwrap();
        assert!(matches!(
            redact_first(&mut doc, 1),
            Err(OfficeError::RunOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_open_rejects_non_presentations() {
        let docx = crate::testing::docx("<w:p/>", &[]);
        assert!(Presentation::open(&docx, SlideOptions::default()).is_err());

        let bytes = build_zip(&[("ppt/presentation.xml", "<p:sld/>")]);
        assert!(matches!(
            Presentation::open(&bytes, SlideOptions::default()),
            Err(OfficeError::Malformed { .. })
        ));
    }
}
