//! PowerPoint Open XML (`.pptx`) output.
//!
//! A `.pptx` file is a zip package of XML parts. This writer emits the
//! smallest package PowerPoint, Keynote and LibreOffice accept: one slide
//! master with a blank layout, one theme, and one slide part per deck
//! slide. Text sits in plain text boxes, so the layout does not depend on
//! placeholder inheritance.
//!
//! Slides are 16:9 (13.333in x 7.5in). Title slides center their heading;
//! content slides put the heading in a top box and one paragraph per body
//! line below it.

use std::fmt::Write as _;
use std::io::{Cursor, Write as _};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::xml::escape_text;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Deck, Slide};
use crate::domain::ports::DeckWriter;

/// Slide width in EMU (914400 per inch).
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;
const MARGIN: i64 = 457_200;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

const THEME: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Bible2PPT"><a:themeElements><a:clrScheme name="Bible2PPT"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="2563EB"/></a:accent1><a:accent2><a:srgbClr val="7C3AED"/></a:accent2><a:accent3><a:srgbClr val="059669"/></a:accent3><a:accent4><a:srgbClr val="D97706"/></a:accent4><a:accent5><a:srgbClr val="DC2626"/></a:accent5><a:accent6><a:srgbClr val="0891B2"/></a:accent6><a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme><a:fontScheme name="Bible2PPT"><a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Bible2PPT"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

/// Text box placement and styling, sizes in EMU and hundredths of a point.
struct TextBox<'a> {
    id: u32,
    name: &'a str,
    y: i64,
    cy: i64,
    font_size: u32,
    bold: bool,
    centered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PptxWriter;

impl PptxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Package parts in write order, as `(path, xml)` pairs.
    pub fn parts(&self, deck: &Deck) -> Result<Vec<(String, String)>, std::fmt::Error> {
        let mut parts = vec![
            ("[Content_Types].xml".to_string(), content_types(deck.slides.len())?),
            ("_rels/.rels".to_string(), package_rels()),
            ("docProps/core.xml".to_string(), core_properties(&deck.title)),
            ("docProps/app.xml".to_string(), app_properties(deck.slides.len())),
            ("ppt/presentation.xml".to_string(), presentation(deck.slides.len())?),
            ("ppt/_rels/presentation.xml.rels".to_string(), presentation_rels(deck.slides.len())?),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                relationships(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "theme", "../theme/theme1.xml"),
                ]),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ),
            ("ppt/theme/theme1.xml".to_string(), format!("{XML_DECL}\n{THEME}")),
        ];

        for (index, slide) in deck.slides.iter().enumerate() {
            let number = index + 1;
            parts.push((format!("ppt/slides/slide{number}.xml"), slide_part(slide)?));
            parts.push((
                format!("ppt/slides/_rels/slide{number}.xml.rels"),
                relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
        }

        Ok(parts)
    }
}

impl DeckWriter for PptxWriter {
    fn extension(&self) -> &'static str {
        "pptx"
    }

    fn encode(&self, deck: &Deck) -> DomainResult<Vec<u8>> {
        let parts = self
            .parts(deck)
            .map_err(|e| DomainError::OutputError(e.to_string()))?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, xml) in parts {
            zip.start_file(name, options).map_err(zip_error)?;
            zip.write_all(xml.as_bytes())?;
        }
        let cursor = zip.finish().map_err(zip_error)?;
        Ok(cursor.into_inner())
    }
}

fn zip_error(err: zip::result::ZipError) -> DomainError {
    DomainError::OutputError(format!("pptx packaging failed: {err}"))
}

fn content_types(slide_count: usize) -> Result<String, std::fmt::Error> {
    const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

    let mut xml = format!(
        r#"{XML_DECL}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{PML}.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{PML}.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{PML}.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    );
    for number in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="{PML}.slide+xml"/>"#
        )?;
    }
    xml.push_str("</Types>");
    Ok(xml)
}

fn package_rels() -> String {
    format!(
        r#"{XML_DECL}
<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_TYPE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_TYPE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn core_properties(title: &str) -> String {
    format!(
        r#"{XML_DECL}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>bible2ppt</dc:creator></cp:coreProperties>"#,
        escape_text(title)
    )
}

fn app_properties(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>bible2ppt</Application><Slides>{slide_count}</Slides></Properties>"#
    )
}

/// Slide relationships start at rId3, after the master and the theme.
fn presentation(slide_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = format!(
        r#"{XML_DECL}
<p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>"#
    );
    for index in 0..slide_count {
        write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + index, index + 3)?;
    }
    write!(
        xml,
        r#"</p:sldIdLst><p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/><p:notesSz cx="{SLIDE_CY}" cy="9144000"/></p:presentation>"#
    )?;
    Ok(xml)
}

fn presentation_rels(slide_count: usize) -> Result<String, std::fmt::Error> {
    let mut xml = format!(
        r#"{XML_DECL}
<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_TYPE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_TYPE}/theme" Target="theme/theme1.xml"/>"#
    );
    for index in 0..slide_count {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{REL_TYPE}/slide" Target="slides/slide{}.xml"/>"#,
            index + 3,
            index + 1
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| format!(r#"<Relationship Id="{id}" Type="{REL_TYPE}/{kind}" Target="{target}"/>"#))
        .collect();
    format!("{XML_DECL}\n<Relationships xmlns=\"{REL_NS}\">{body}</Relationships>")
}

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}
<p:sldMaster {NS}><p:cSld><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}
<p:sldLayout {NS} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn slide_part(slide: &Slide) -> Result<String, std::fmt::Error> {
    let mut xml = format!("{XML_DECL}\n<p:sld {NS}><p:cSld><p:spTree>{EMPTY_TREE}");

    if slide.is_title() {
        let title = TextBox {
            id: 2,
            name: "Title",
            y: 2_286_000,
            cy: 2_286_000,
            font_size: 4400,
            bold: true,
            centered: true,
        };
        write_text_box(&mut xml, &title, std::slice::from_ref(&slide.heading))?;
    } else {
        let heading = TextBox {
            id: 2,
            name: "Heading",
            y: MARGIN,
            cy: 914_400,
            font_size: 2800,
            bold: true,
            centered: false,
        };
        let body = TextBox {
            id: 3,
            name: "Body",
            y: MARGIN + 1_143_000,
            cy: SLIDE_CY - MARGIN * 2 - 1_143_000,
            font_size: 2400,
            bold: false,
            centered: false,
        };
        write_text_box(&mut xml, &heading, std::slice::from_ref(&slide.heading))?;
        write_text_box(&mut xml, &body, &slide.body)?;
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

fn write_text_box(xml: &mut String, text_box: &TextBox<'_>, paragraphs: &[String]) -> std::fmt::Result {
    let TextBox {
        id,
        name,
        y,
        cy,
        font_size,
        bold,
        centered,
    } = *text_box;
    let anchor = if centered { "ctr" } else { "t" };

    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{MARGIN}" y="{y}"/><a:ext cx="{}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="{anchor}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        SLIDE_CX - MARGIN * 2
    )?;
    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        if centered {
            xml.push_str(r#"<a:pPr algn="ctr"/>"#);
        }
        write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" sz="{font_size}" b="{}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            u8::from(bold),
            escape_text(paragraph)
        )?;
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}
