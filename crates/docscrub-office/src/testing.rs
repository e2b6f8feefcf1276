//! In-memory package fixtures for unit tests

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::package::Package;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub fn build_zip(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A `.docx` whose body holds `body` and whose extra parts are added verbatim
pub fn docx(body: &str, extra: &[(&str, &str)]) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    let mut parts = vec![
        ("[Content_Types].xml", "<Types/>"),
        ("_rels/.rels", rels),
        ("word/document.xml", document.as_str()),
    ];
    parts.extend_from_slice(extra);
    build_zip(&parts)
}

pub fn word_part(root: &str, inner: &str) -> String {
    format!(r#"<w:{root} xmlns:w="{W_NS}">{inner}</w:{root}>"#)
}

/// A `.pptx` with one slide per entry of `slides` (the `p:spTree` content),
/// listed in `p:sldIdLst` in the given order; `notes[i]` is linked from slide `i + 1`
pub fn pptx(slides: &[&str], notes: &[&str]) -> Vec<u8> {
    let mut ids = String::new();
    let mut rels = String::new();
    let mut owned: Vec<(String, String)> = Vec::new();

    for (i, tree) in slides.iter().enumerate() {
        let n = i + 1;
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{n}"/>"#, 255 + n));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{n}.xml"/>"#
        ));
        owned.push((format!("ppt/slides/slide{n}.xml"), slide_xml(tree)));
    }
    for (i, tree) in notes.iter().enumerate() {
        owned.push((
            format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                i + 1
            ),
        ));
        owned.push((
            format!("ppt/notesSlides/notesSlide{}.xml", i + 1),
            format!(
                r#"<p:notes xmlns:a="{A_NS}" xmlns:p="{P_NS}"><p:cSld><p:spTree>{tree}</p:spTree></p:cSld></p:notes>"#
            ),
        ));
    }

    let presentation = format!(
        r#"<p:presentation xmlns:a="{A_NS}" xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
    );
    let presentation_rels = format!(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    );
    let root_rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

    let mut parts: Vec<(&str, &str)> = vec![
        ("[Content_Types].xml", "<Types/>"),
        ("_rels/.rels", root_rels),
        ("ppt/presentation.xml", presentation.as_str()),
        ("ppt/_rels/presentation.xml.rels", presentation_rels.as_str()),
    ];
    parts.extend(owned.iter().map(|(n, c)| (n.as_str(), c.as_str())));
    build_zip(&parts)
}

pub fn slide_xml(tree: &str) -> String {
    format!(
        r#"<p:sld xmlns:a="{A_NS}" xmlns:p="{P_NS}"><p:cSld><p:spTree>{tree}</p:spTree></p:cSld></p:sld>"#
    )
}

/// A text shape wrapping `paragraphs`
pub fn shape(paragraphs: &str) -> String {
    format!(r#"<p:sp><p:txBody><a:bodyPr/>{paragraphs}</p:txBody></p:sp>"#)
}

pub fn part_text(bytes: &[u8], name: &str) -> String {
    let package = Package::read(bytes).unwrap();
    String::from_utf8(package.part(name).unwrap().to_vec()).unwrap()
}
