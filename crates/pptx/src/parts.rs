//! Package-level parts of a generated deck.
//!
//! Everything except the slides themselves: content types, relationships,
//! the presentation part, a single theme, master and blank layout, and the
//! document properties.

use crate::layout::{SLIDE_HEIGHT, SLIDE_WIDTH};
use deck_core::ImageFormat;
use quick_xml::escape::escape;
use std::fmt::Write as _;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_EXTENDED_PROPERTIES: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Part names inside the package.
pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub(crate) const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
pub(crate) const SLIDE_MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
pub(crate) const SLIDE_MASTER_RELS_PART: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
pub(crate) const SLIDE_LAYOUT_PART: &str = "ppt/slideLayouts/slideLayout1.xml";
pub(crate) const SLIDE_LAYOUT_RELS_PART: &str = "ppt/slideLayouts/_rels/slideLayout1.xml.rels";
pub(crate) const THEME_PART: &str = "ppt/theme/theme1.xml";
pub(crate) const PRES_PROPS_PART: &str = "ppt/presProps.xml";
pub(crate) const VIEW_PROPS_PART: &str = "ppt/viewProps.xml";
pub(crate) const TABLE_STYLES_PART: &str = "ppt/tableStyles.xml";
pub(crate) const CORE_PROPS_PART: &str = "docProps/core.xml";
pub(crate) const APP_PROPS_PART: &str = "docProps/app.xml";

/// First slide id; PowerPoint requires ids of at least 256.
const FIRST_SLIDE_ID: usize = 256;

/// Empty group-shape header every shape tree starts with.
pub(crate) const SHAPE_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
);

/// Escape text for element content or attribute values.
///
/// Characters XML 1.0 cannot carry at all (most C0 controls) are dropped.
pub(crate) fn escape_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .filter(|&c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect();
    escape(&cleaned).into_owned()
}

/// Part name of the n-th slide (1-based).
pub(crate) fn slide_part(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Relationship part of the n-th slide (1-based).
pub(crate) fn slide_rels_part(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

/// A relationship entry: id, type, target.
pub(crate) struct Relationship<'a> {
    pub id: String,
    pub rel_type: &'a str,
    pub target: String,
}

impl<'a> Relationship<'a> {
    pub fn new(id: impl Into<String>, rel_type: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

/// Serialize a relationships part.
pub(crate) fn relationships_xml(rels: &[Relationship<'_>]) -> String {
    let mut xml = String::with_capacity(128 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, NS_PACKAGE_RELS);
    for rel in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.rel_type,
            escape_text(&rel.target)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// Package root relationships.
pub(crate) fn root_rels_xml() -> String {
    relationships_xml(&[
        Relationship::new("rId1", REL_OFFICE_DOCUMENT, PRESENTATION_PART),
        Relationship::new("rId2", REL_CORE_PROPERTIES, CORE_PROPS_PART),
        Relationship::new("rId3", REL_EXTENDED_PROPERTIES, APP_PROPS_PART),
    ])
}

/// `[Content_Types].xml` for a deck with `slide_count` slides and the given media formats.
pub(crate) fn content_types_xml(slide_count: usize, media: &[ImageFormat]) -> String {
    let mut xml = String::with_capacity(2048 + slide_count * 128);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut seen: Vec<ImageFormat> = Vec::new();
    for format in media {
        if seen.contains(format) {
            continue;
        }
        seen.push(*format);
        let _ = write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.mime_type()
        );
    }

    let overrides = [
        (PRESENTATION_PART, CT_PRESENTATION),
        (SLIDE_MASTER_PART, CT_SLIDE_MASTER),
        (SLIDE_LAYOUT_PART, CT_SLIDE_LAYOUT),
        (THEME_PART, CT_THEME),
        (PRES_PROPS_PART, CT_PRES_PROPS),
        (VIEW_PROPS_PART, CT_VIEW_PROPS),
        (TABLE_STYLES_PART, CT_TABLE_STYLES),
        (CORE_PROPS_PART, CT_CORE_PROPERTIES),
        (APP_PROPS_PART, CT_EXTENDED_PROPERTIES),
    ];
    for (part, content_type) in overrides {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            part, content_type
        );
    }
    for number in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            slide_part(number),
            CT_SLIDE
        );
    }

    xml.push_str("</Types>");
    xml
}

/// `ppt/presentation.xml` listing `slide_count` slides at rId2..
pub(crate) fn presentation_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_MAIN, NS_REL, NS_PML
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for index in 0..slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + index,
                index + 2
            );
        }
        xml.push_str("</p:sldIdLst>");
    }

    let _ = write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}" type="screen16x9"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT
    );
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

/// `ppt/_rels/presentation.xml.rels`: master at rId1, slides from rId2, then shared parts.
pub(crate) fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = Vec::with_capacity(slide_count + 5);
    rels.push(Relationship::new(
        "rId1",
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    ));
    for number in 1..=slide_count {
        rels.push(Relationship::new(
            format!("rId{}", number + 1),
            REL_SLIDE,
            format!("slides/slide{}.xml", number),
        ));
    }

    let next = slide_count + 2;
    rels.push(Relationship::new(format!("rId{}", next), REL_PRES_PROPS, "presProps.xml"));
    rels.push(Relationship::new(format!("rId{}", next + 1), REL_VIEW_PROPS, "viewProps.xml"));
    rels.push(Relationship::new(format!("rId{}", next + 2), REL_THEME, "theme/theme1.xml"));
    rels.push(Relationship::new(
        format!("rId{}", next + 3),
        REL_TABLE_STYLES,
        "tableStyles.xml",
    ));

    relationships_xml(&rels)
}

/// The single slide master; its background is overridden on every slide.
pub(crate) fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_MAIN, NS_REL, NS_PML
    );
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(SHAPE_TREE_HEADER);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#,
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str(concat!(
        "<p:txStyles>",
        r#"<p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
        r#"<p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900" algn="l"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
        r#"<a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:bodyStyle>"#,
        r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle>"#,
        "</p:txStyles>",
    ));
    xml.push_str("</p:sldMaster>");
    xml
}

pub(crate) fn slide_master_rels_xml() -> String {
    relationships_xml(&[
        Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new("rId2", REL_THEME, "../theme/theme1.xml"),
    ])
}

/// A blank layout; every slide places its own text boxes.
pub(crate) fn slide_layout_xml() -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECLARATION);
    let _ = write!(
        xml,
        r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">"#,
        NS_MAIN, NS_REL, NS_PML
    );
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(SHAPE_TREE_HEADER);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

pub(crate) fn slide_layout_rels_xml() -> String {
    relationships_xml(&[Relationship::new(
        "rId1",
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

/// Minimal Office theme: color, font and format schemes.
pub(crate) fn theme_xml() -> String {
    let mut xml = String::with_capacity(3072);
    xml.push_str(XML_DECLARATION);
    let _ = write!(xml, r#"<a:theme xmlns:a="{}" name="Office Theme">"#, NS_MAIN);
    xml.push_str("<a:themeElements>");
    xml.push_str(concat!(
        r#"<a:clrScheme name="Office">"#,
        r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
        r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
        r#"<a:dk2><a:srgbClr val="003366"/></a:dk2>"#,
        r#"<a:lt2><a:srgbClr val="F4F4F4"/></a:lt2>"#,
        r#"<a:accent1><a:srgbClr val="4F81BD"/></a:accent1>"#,
        r#"<a:accent2><a:srgbClr val="C0504D"/></a:accent2>"#,
        r#"<a:accent3><a:srgbClr val="9BBB59"/></a:accent3>"#,
        r#"<a:accent4><a:srgbClr val="8064A2"/></a:accent4>"#,
        r#"<a:accent5><a:srgbClr val="4BACC6"/></a:accent5>"#,
        r#"<a:accent6><a:srgbClr val="F79646"/></a:accent6>"#,
        r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink>"#,
        r#"<a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#,
        "</a:clrScheme>",
    ));
    xml.push_str(concat!(
        r#"<a:fontScheme name="Office">"#,
        r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
        "</a:fontScheme>",
    ));

    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [9525, 25400, 38100] {
        let _ = write!(xml, r#"<a:ln w="{}">{}</a:ln>"#, width, solid);
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");

    xml.push_str("</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}

pub(crate) fn pres_props_xml() -> String {
    format!(
        r#"{}<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"/>"#,
        XML_DECLARATION, NS_MAIN, NS_REL, NS_PML
    )
}

pub(crate) fn view_props_xml() -> String {
    format!(
        r#"{}<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#,
        XML_DECLARATION, NS_MAIN, NS_REL, NS_PML
    )
}

pub(crate) fn table_styles_xml() -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        XML_DECLARATION, NS_MAIN
    )
}

/// `docProps/core.xml`. No timestamps, so identical decks stay byte-identical.
pub(crate) fn core_props_xml(title: &str) -> String {
    format!(
        concat!(
            "{}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>deckgen</dc:creator>",
            "</cp:coreProperties>"
        ),
        XML_DECLARATION,
        escape_text(title)
    )
}

/// `docProps/app.xml`.
pub(crate) fn app_props_xml(slide_count: usize) -> String {
    format!(
        concat!(
            "{}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>deckgen</Application>",
            "<PresentationFormat>On-screen Show (16:9)</PresentationFormat>",
            "<Slides>{}</Slides>",
            "</Properties>"
        ),
        XML_DECLARATION,
        slide_count
    )
}
