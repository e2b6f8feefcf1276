//! OPC zip package: parts in archive order plus relationship lookup

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use tracing::debug;

use crate::xml::XmlDocument;
use crate::{OfficeError, Result};

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// An Office Open XML package held in memory.
///
/// Entries are written back in their original order with their original
/// compression (stored stays stored, everything else is deflated).
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<Entry>,
}

/// One `<Relationship>` of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Package {
    pub fn read(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            if !file.is_dir() {
                file.read_to_end(&mut data)?;
            }
            entries.push(Entry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }

        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name == name)
            .map(|e| e.data.as_slice())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// Replace a part's bytes, or append a new deflated part
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| !e.is_dir && e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.name.as_str())
    }

    pub fn read_xml(&self, name: &str) -> Result<XmlDocument> {
        let bytes = self
            .part(name)
            .ok_or_else(|| OfficeError::MissingPart(name.to_string()))?;
        XmlDocument::parse(bytes).map_err(|e| OfficeError::Malformed {
            part: name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn write_xml(&mut self, name: &str, document: &XmlDocument) -> Result<()> {
        let bytes = document.to_bytes()?;
        self.set_part(name, bytes);
        Ok(())
    }

    /// Relationships declared by `source` (`""` for the package itself).
    ///
    /// A part without a `.rels` companion has no relationships.
    pub fn relationships(&self, source: &str) -> Result<Vec<Relationship>> {
        let rels_name = rels_part_name(source);
        if !self.has_part(&rels_name) {
            return Ok(Vec::new());
        }

        let document = self.read_xml(&rels_name)?;
        let relationships = document
            .root
            .elements()
            .filter(|el| el.is("Relationship"))
            .filter_map(|el| {
                Some(Relationship {
                    id: el.attr("Id")?.to_string(),
                    rel_type: el.attr("Type").unwrap_or_default().to_string(),
                    target: el.attr("Target")?.to_string(),
                    external: el.attr("TargetMode") == Some("External"),
                })
            })
            .collect();
        Ok(relationships)
    }

    /// Internal parts `source` links to with relationships of the given kind
    /// (the last segment of the relationship type, e.g. `header`), in
    /// declaration order without repeats. Targets missing from the package
    /// are skipped.
    pub fn related_parts(&self, source: &str, kind: &str) -> Result<Vec<String>> {
        let mut parts: Vec<String> = Vec::new();
        for rel in self.relationships(source)? {
            if rel.external || rel.rel_type.rsplit('/').next() != Some(kind) {
                continue;
            }
            let target = resolve_target(source, &rel.target);
            if !self.has_part(&target) {
                debug!(source, target = %target, "Relationship target missing from package");
                continue;
            }
            if !parts.contains(&target) {
                parts.push(target);
            }
        }
        Ok(parts)
    }

    /// The main document part named by the package relationships, if any
    pub fn main_part(&self) -> Result<Option<String>> {
        let main = self
            .relationships("")?
            .into_iter()
            .find(|rel| rel.rel_type == OFFICE_DOCUMENT_REL && !rel.external)
            .map(|rel| resolve_target("", &rel.target));
        Ok(main)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options)?;
            } else {
                writer.start_file(entry.name.as_str(), options)?;
                writer.write_all(&entry.data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// `word/document.xml` -> `word/_rels/document.xml.rels`
pub fn rels_part_name(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{source}.rels"),
    }
}

/// Resolve a relationship target against the part that declares it
pub fn resolve_target(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Trailing number of a part's file stem: `word/header12.xml` -> 12
pub fn part_number(name: &str) -> Option<u32> {
    let file = name.rsplit('/').next().unwrap_or(name);
    let stem = file.split('.').next().unwrap_or(file);
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[stem.len() - digits..].parse().ok()
}

/// Parts directly under `dir` whose file names start with `prefix` and end in
/// `.xml`, in numeric order (`slide2` before `slide10`)
pub fn numbered_parts(package: &Package, dir: &str, prefix: &str) -> Vec<String> {
    let mut parts: Vec<String> = package
        .part_names()
        .filter(|name| {
            let file = if dir.is_empty() {
                Some(*name)
            } else {
                name.strip_prefix(dir).and_then(|rest| rest.strip_prefix('/'))
            };
            file.is_some_and(|file| {
                !file.contains('/') && file.starts_with(prefix) && file.ends_with(".xml")
            })
        })
        .map(str::to_string)
        .collect();
    parts.sort_by(|a, b| (part_number(a), a).cmp(&(part_number(b), b)));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_zip;

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name(""), "_rels/.rels");
        assert_eq!(rels_part_name("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(
            rels_part_name("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "/word/document.xml"), "word/document.xml");
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../notesSlides/notesSlide1.xml"),
            "ppt/notesSlides/notesSlide1.xml"
        );
    }

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("word/header12.xml"), Some(12));
        assert_eq!(part_number("ppt/slides/slide3.xml"), Some(3));
        assert_eq!(part_number("word/footnotes.xml"), None);
    }

    #[test]
    fn test_numbered_parts_sort_numerically() {
        let bytes = build_zip(&[
            ("ppt/slides/slide10.xml", "<p:sld/>"),
            ("ppt/slides/slide2.xml", "<p:sld/>"),
            ("ppt/slides/_rels/slide2.xml.rels", "<Relationships/>"),
            ("ppt/slides/slide1.xml", "<p:sld/>"),
            ("ppt/slideLayouts/slideLayout1.xml", "<p:sldLayout/>"),
        ]);
        let package = Package::read(&bytes).unwrap();
        assert_eq!(
            numbered_parts(&package, "ppt/slides", "slide"),
            ["ppt/slides/slide1.xml", "ppt/slides/slide2.xml", "ppt/slides/slide10.xml"]
        );
    }

    #[test]
    fn test_numbered_parts_at_package_root() {
        let bytes = build_zip(&[
            ("header2.xml", "<w:hdr/>"),
            ("header1.xml", "<w:hdr/>"),
            ("word/header3.xml", "<w:hdr/>"),
        ]);
        let package = Package::read(&bytes).unwrap();
        assert_eq!(numbered_parts(&package, "", "header"), ["header1.xml", "header2.xml"]);
    }

    #[test]
    fn test_related_parts_by_kind() {
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="top.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="bottom.xml"/>
<Relationship Id="rId3" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/header" Target="/word/first.xml"/>
<Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="top.xml"/>
<Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="gone.xml"/>
<Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="https://example.com/h.xml" TargetMode="External"/>
</Relationships>"#;
        let bytes = build_zip(&[
            ("word/document.xml", "<w:document/>"),
            ("word/_rels/document.xml.rels", rels),
            ("word/top.xml", "<w:hdr/>"),
            ("word/bottom.xml", "<w:ftr/>"),
            ("word/first.xml", "<w:hdr/>"),
        ]);
        let package = Package::read(&bytes).unwrap();
        assert_eq!(
            package.related_parts("word/document.xml", "header").unwrap(),
            ["word/top.xml", "word/first.xml"]
        );
        assert_eq!(
            package.related_parts("word/document.xml", "footer").unwrap(),
            ["word/bottom.xml"]
        );
        assert!(package.related_parts("word/top.xml", "header").unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_order_and_rewrites_parts() {
        let bytes = build_zip(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document/>"),
            ("docProps/app.xml", "<Properties/>"),
        ]);
        let mut package = Package::read(&bytes).unwrap();
        package.set_part("word/document.xml", b"<w:document>x</w:document>".to_vec());

        let written = Package::read(&package.to_bytes().unwrap()).unwrap();
        let names: Vec<_> = written.part_names().collect();
        assert_eq!(names, ["[Content_Types].xml", "word/document.xml", "docProps/app.xml"]);
        assert_eq!(
            written.part("word/document.xml").unwrap(),
            b"<w:document>x</w:document>"
        );
    }

    #[test]
    fn test_main_part_from_relationships() {
        let bytes = build_zip(&[(
            "_rels/.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/main.xml"/></Relationships>"#,
        )]);
        let package = Package::read(&bytes).unwrap();
        assert_eq!(package.main_part().unwrap().as_deref(), Some("word/main.xml"));

        let empty = Package::read(&build_zip(&[("a.xml", "<a/>")])).unwrap();
        assert_eq!(empty.main_part().unwrap(), None);
    }

    #[test]
    fn test_read_rejects_non_zip() {
        assert!(matches!(
            Package::read(b"definitely not a zip"),
            Err(OfficeError::Zip(_))
        ));
    }

    #[test]
    fn test_read_xml_errors() {
        let package = Package::read(&build_zip(&[("bad.xml", "<a><b></a>")])).unwrap();
        assert!(matches!(
            package.read_xml("missing.xml"),
            Err(OfficeError::MissingPart(_))
        ));
        assert!(matches!(
            package.read_xml("bad.xml"),
            Err(OfficeError::Malformed { .. })
        ));
    }
}
