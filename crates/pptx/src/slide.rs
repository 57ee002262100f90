//! Slide part markup: background fill and text boxes.

use crate::layout::{Frame, TextStyle};
use crate::parts::{
    escape_text, relationships_xml, Relationship, NS_MAIN, NS_PML, NS_REL, REL_IMAGE,
    REL_SLIDE_LAYOUT, SHAPE_TREE_HEADER, XML_DECLARATION,
};
use std::fmt::Write as _;

/// Relationship id of the background image in a slide's rels part.
const BACKGROUND_REL_ID: &str = "rId2";

/// Bullet indentation in EMUs (0.375in hanging indent).
const BULLET_INDENT: i64 = 342_900;

/// Background of a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Background<'a> {
    /// Flat `RRGGBB` fill.
    Solid(&'a str),
    /// Stretched picture; the target is relative to the slide part.
    Image { target: &'a str },
}

impl Background<'_> {
    fn write_xml(&self, xml: &mut String) {
        xml.push_str("<p:bg><p:bgPr>");
        match self {
            Background::Solid(color) => {
                let _ = write!(
                    xml,
                    r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                    color
                );
            }
            Background::Image { .. } => {
                let _ = write!(
                    xml,
                    r#"<a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="{}"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill>"#,
                    BACKGROUND_REL_ID
                );
            }
        }
        xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
    }
}

/// Builds the XML of one slide.
pub(crate) struct SlideBuilder<'a> {
    background: Background<'a>,
    shapes: String,
    next_shape_id: u32,
}

impl<'a> SlideBuilder<'a> {
    pub fn new(background: Background<'a>) -> Self {
        Self {
            background,
            shapes: String::with_capacity(2048),
            // id 1 is the shape tree itself
            next_shape_id: 2,
        }
    }

    /// Add a plain text box. Line breaks in `text` become in-paragraph breaks.
    pub fn add_text(&mut self, name: &str, frame: Frame, style: &TextStyle, text: &str) {
        self.add_text_box(name, frame, style, &[text], false);
    }

    /// Add a text box with one bulleted paragraph per point.
    pub fn add_bullets<S: AsRef<str>>(
        &mut self,
        name: &str,
        frame: Frame,
        style: &TextStyle,
        points: &[S],
    ) {
        self.add_text_box(name, frame, style, points, true);
    }

    fn add_text_box<S: AsRef<str>>(
        &mut self,
        name: &str,
        frame: Frame,
        style: &TextStyle,
        paragraphs: &[S],
        bulleted: bool,
    ) {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        let xml = &mut self.shapes;

        xml.push_str("<p:sp><p:nvSpPr>");
        let _ = write!(
            xml,
            r#"<p:cNvPr id="{}" name="{} {}"/>"#,
            id,
            escape_text(name),
            id - 1
        );
        xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

        xml.push_str("<p:spPr><a:xfrm>");
        let _ = write!(
            xml,
            r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
            frame.x, frame.y, frame.cx, frame.cy
        );
        xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

        xml.push_str("<p:txBody>");
        let _ = write!(
            xml,
            r#"<a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            style.anchor.as_xml()
        );

        if paragraphs.is_empty() {
            // txBody needs at least one paragraph
            write_paragraph(xml, style, "", false);
        }
        for paragraph in paragraphs {
            write_paragraph(xml, style, paragraph.as_ref(), bulleted);
        }

        xml.push_str("</p:txBody></p:sp>");
    }

    /// Finish the slide, returning its XML and its relationships XML.
    pub fn finish(self) -> (String, String) {
        let mut xml = String::with_capacity(self.shapes.len() + 1024);
        xml.push_str(XML_DECLARATION);
        let _ = write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            NS_MAIN, NS_REL, NS_PML
        );
        xml.push_str("<p:cSld>");
        self.background.write_xml(&mut xml);
        xml.push_str("<p:spTree>");
        xml.push_str(SHAPE_TREE_HEADER);
        xml.push_str(&self.shapes);
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");

        let mut rels = vec![Relationship::new(
            "rId1",
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )];
        if let Background::Image { target } = self.background {
            rels.push(Relationship::new(BACKGROUND_REL_ID, REL_IMAGE, target));
        }

        (xml, relationships_xml(&rels))
    }
}

/// Write one `a:p`. Empty text yields a paragraph with only end properties.
fn write_paragraph(xml: &mut String, style: &TextStyle, text: &str, bulleted: bool) {
    xml.push_str("<a:p>");
    if bulleted {
        let _ = write!(
            xml,
            r#"<a:pPr marL="{}" indent="-{}" algn="{}"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#,
            BULLET_INDENT,
            BULLET_INDENT,
            style.align.as_xml()
        );
    } else {
        let _ = write!(
            xml,
            r#"<a:pPr marL="0" indent="0" algn="{}"><a:buNone/></a:pPr>"#,
            style.align.as_xml()
        );
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    for (index, line) in normalized.split('\n').enumerate() {
        if index > 0 {
            xml.push_str("<a:br>");
            write_run_properties(xml, style, "a:rPr");
            xml.push_str("</a:br>");
        }
        if line.is_empty() {
            continue;
        }
        xml.push_str("<a:r>");
        write_run_properties(xml, style, "a:rPr");
        let _ = write!(xml, "<a:t>{}</a:t>", escape_text(line));
        xml.push_str("</a:r>");
    }

    write_run_properties(xml, style, "a:endParaRPr");
    xml.push_str("</a:p>");
}

fn write_run_properties(xml: &mut String, style: &TextStyle, tag: &str) {
    let _ = write!(
        xml,
        r#"<{} lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></{}>"#,
        tag,
        style.size_hundredths(),
        if style.bold { 1 } else { 0 },
        style.color,
        tag
    );
}
