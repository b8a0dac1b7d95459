//! OpenDocument flat XML presentation (`.fodp`) output.
//!
//! A flat ODP is a single uncompressed XML document that LibreOffice
//! Impress opens directly. Slides are 16:9,
//! title slides center their heading, content slides put the heading in
//! a top frame and one paragraph per body line below it.

use std::fmt::Write as _;

use super::xml::escape_text;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Deck, Slide};
use crate::domain::ports::DeckWriter;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" xmlns:svg="urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0" xmlns:presentation="urn:oasis:names:tc:opendocument:xmlns:presentation:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/" office:version="1.3" office:mimetype="application/vnd.oasis.opendocument.presentation">
"#;

const STYLES: &str = r#" <office:automatic-styles>
  <style:page-layout style:name="PM1">
   <style:page-layout-properties fo:margin-top="0cm" fo:margin-bottom="0cm" fo:margin-left="0cm" fo:margin-right="0cm" fo:page-width="33.867cm" fo:page-height="19.05cm" style:print-orientation="landscape"/>
  </style:page-layout>
  <style:style style:name="Ptitle" style:family="paragraph">
   <style:paragraph-properties fo:text-align="center"/>
   <style:text-properties fo:font-size="44pt" fo:font-weight="bold"/>
  </style:style>
  <style:style style:name="Pheading" style:family="paragraph">
   <style:text-properties fo:font-size="32pt" fo:font-weight="bold"/>
  </style:style>
  <style:style style:name="Pbody" style:family="paragraph">
   <style:text-properties fo:font-size="24pt"/>
  </style:style>
 </office:automatic-styles>
 <office:master-styles>
  <style:master-page style:name="Default" style:page-layout-name="PM1"/>
 </office:master-styles>
"#;

#[derive(Debug, Clone, Default)]
pub struct FlatOdpWriter;

impl FlatOdpWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the deck as a flat ODP document.
    pub fn render(&self, deck: &Deck) -> Result<String, std::fmt::Error> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(HEADER);
        writeln!(
            xml,
            " <office:meta><dc:title>{}</dc:title></office:meta>",
            escape_text(&deck.title)
        )?;
        xml.push_str(STYLES);
        xml.push_str(" <office:body>\n  <office:presentation>\n");
        for (index, slide) in deck.slides.iter().enumerate() {
            write_slide(&mut xml, index + 1, slide)?;
        }
        xml.push_str("  </office:presentation>\n </office:body>\n</office:document>\n");
        Ok(xml)
    }
}

fn write_slide(xml: &mut String, number: usize, slide: &Slide) -> std::fmt::Result {
    writeln!(
        xml,
        r#"   <draw:page draw:name="Slide {number}" draw:master-page-name="Default">"#
    )?;

    if slide.is_title() {
        writeln!(
            xml,
            r#"    <draw:frame presentation:class="title" svg:x="1.5cm" svg:y="7cm" svg:width="30.867cm" svg:height="5cm"><draw:text-box><text:p text:style-name="Ptitle">{}</text:p></draw:text-box></draw:frame>"#,
            escape_text(&slide.heading)
        )?;
    } else {
        writeln!(
            xml,
            r#"    <draw:frame presentation:class="title" svg:x="1.5cm" svg:y="0.8cm" svg:width="30.867cm" svg:height="3cm"><draw:text-box><text:p text:style-name="Pheading">{}</text:p></draw:text-box></draw:frame>"#,
            escape_text(&slide.heading)
        )?;
        xml.push_str(
            r#"    <draw:frame presentation:class="outline" svg:x="1.5cm" svg:y="4.3cm" svg:width="30.867cm" svg:height="13.9cm"><draw:text-box>"#,
        );
        for line in &slide.body {
            write!(xml, r#"<text:p text:style-name="Pbody">{}</text:p>"#, escape_text(line))?;
        }
        xml.push_str("</draw:text-box></draw:frame>\n");
    }

    xml.push_str("   </draw:page>\n");
    Ok(())
}

impl DeckWriter for FlatOdpWriter {
    fn extension(&self) -> &'static str {
        "fodp"
    }

    fn encode(&self, deck: &Deck) -> DomainResult<Vec<u8>> {
        let xml = self
            .render(deck)
            .map_err(|e| DomainError::OutputError(e.to_string()))?;
        Ok(xml.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deck() -> Deck {
        Deck {
            title: "John 3".to_string(),
            slides: vec![
                Slide::title("John 3"),
                Slide {
                    heading: "John 3:16".to_string(),
                    body: vec!["For God so loved the world".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_render_one_page_per_slide() {
        let xml = FlatOdpWriter::new().render(&sample_deck()).unwrap();
        assert_eq!(xml.matches("<draw:page ").count(), 2);
        assert!(xml.contains("<dc:title>John 3</dc:title>"));
        assert!(xml.contains(r#"<text:p text:style-name="Pbody">For God so loved the world</text:p>"#));
        assert!(xml.trim_end().ends_with("</office:document>"));
    }

    #[test]
    fn test_render_escapes_slide_text() {
        let deck = Deck {
            title: "A & B".to_string(),
            slides: vec![Slide::title("<script>")],
        };
        let xml = FlatOdpWriter::new().render(&deck).unwrap();
        assert!(xml.contains("A &amp; B"));
        assert!(xml.contains("&lt;script&gt;"));
        assert!(!xml.contains("<script>"));
    }

    #[test]
    fn test_encode_is_utf8_document() {
        let bytes = FlatOdpWriter::new().encode(&sample_deck()).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("office:presentation"));
    }
}
