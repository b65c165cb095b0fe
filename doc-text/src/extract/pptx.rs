//! PPTX extraction: one labelled block per slide with text.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

use super::ooxml::{Package, attribute};
use crate::error::{DocError, Result};
use crate::format::DocumentFormat;

const FORMAT: DocumentFormat = DocumentFormat::Pptx;

const SLIDE_PREFIX: &str = "ppt/slides/slide";

pub fn extract(content: &[u8]) -> Result<String> {
    let mut package = Package::open(FORMAT, content)?;
    let slide_parts = slide_order(&mut package)?;
    log::debug!("PPTX has {} slides", slide_parts.len());

    let mut text_parts = Vec::new();

    for (i, part) in slide_parts.iter().enumerate() {
        let xml = package.read_part(part)?;

        let mut slide_text = vec![format!("Slide {}.", i + 1)];
        slide_text.extend(
            shape_texts(&xml)?
                .iter()
                .map(|text| text.trim())
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        );

        // Only keep slides with more than their label
        if slide_text.len() > 1 {
            text_parts.push(slide_text.join("\n"));
        }
    }

    Ok(text_parts.join("\n\n"))
}

/// Slide part names in presentation order.
///
/// Order comes from the slide id list in `ppt/presentation.xml`. Packages
/// without one fall back to the numeric order of `ppt/slides/slideN.xml`.
fn slide_order(package: &mut Package<'_>) -> Result<Vec<String>> {
    let presentation = package.read_optional_part("ppt/presentation.xml")?;
    let rels = package.read_optional_part("ppt/_rels/presentation.xml.rels")?;

    if let (Some(presentation), Some(rels)) = (presentation, rels) {
        let targets = parse_relationships(&rels)?;
        let slides: Vec<String> = parse_slide_ids(&presentation)?
            .iter()
            .filter_map(|id| targets.get(id))
            .map(|target| resolve_target("ppt", target))
            .collect();
        if !slides.is_empty() {
            return Ok(slides);
        }
    }

    let mut numbered: Vec<(u32, String)> = package
        .part_names()
        .into_iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name))
        })
        .collect();
    numbered.sort();

    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

/// Relationship ids of `p:sldId` entries, in order.
fn parse_slide_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = relationship_id(&e)? {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::processing(FORMAT, e)),
            _ => {}
        }
    }

    Ok(ids)
}

/// The `r:id` attribute. `sldId` also has an unprefixed numeric `id`, so the
/// prefix matters here.
fn relationship_id(element: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DocError::processing(FORMAT, e))?;
        let key = attr.key;
        if key.local_name().as_ref() == b"id" && key.prefix().is_some() {
            let value = attr
                .unescape_value()
                .map_err(|e| DocError::processing(FORMAT, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Map of relationship id to target from a `.rels` part.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attribute(&e, b"Id", FORMAT)?;
                let target = attribute(&e, b"Target", FORMAT)?;
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::processing(FORMAT, e)),
            _ => {}
        }
    }

    Ok(targets)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
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

/// Text of each top-level shape on a slide, paragraphs joined by newlines.
///
/// Shapes inside group shapes and graphic frames (tables, charts) are not
/// included.
fn shape_texts(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();

    let mut group_depth = 0usize;
    let mut in_shape = false;
    let mut in_text_body = false;
    let mut in_run_text = false;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"grpSp" => group_depth += 1,
                b"sp" if group_depth == 0 => {
                    in_shape = true;
                    paragraphs.clear();
                }
                b"txBody" if in_shape => in_text_body = true,
                b"p" if in_text_body => paragraph.clear(),
                b"t" if in_text_body => in_run_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if in_text_body && e.local_name().as_ref() == b"br" {
                    paragraph.push('\n');
                }
            }
            Ok(Event::Text(e)) => {
                if in_run_text {
                    let text = e.unescape().map_err(|e| DocError::processing(FORMAT, e))?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"grpSp" => group_depth = group_depth.saturating_sub(1),
                b"sp" if in_shape => {
                    in_shape = false;
                    texts.push(paragraphs.join("\n"));
                }
                b"txBody" => in_text_body = false,
                b"p" if in_text_body => paragraphs.push(std::mem::take(&mut paragraph)),
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::processing(FORMAT, e)),
            _ => {}
        }
    }

    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ooxml::testing::build_package;

    const NS: &str = concat!(
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
    );

    fn shape(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{p}</a:t></a:r></a:p>"))
            .collect();
        format!("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>{body}</p:txBody></p:sp>")
    }

    fn slide(shapes: &str) -> String {
        format!(r#"<p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr/>{shapes}</p:spTree></p:cSld></p:sld>"#)
    }

    fn presentation(rel_ids: &[&str]) -> String {
        let ids: String = rel_ids
            .iter()
            .enumerate()
            .map(|(i, rid)| format!(r#"<p:sldId id="{}" r:id="{rid}"/>"#, 256 + i))
            .collect();
        format!(r#"<p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#)
    }

    fn rels(entries: &[(&str, &str)]) -> String {
        let body: String = entries
            .iter()
            .map(|(id, target)| format!(r#"<Relationship Id="{id}" Type="slide" Target="{target}"/>"#))
            .collect();
        format!(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#)
    }

    #[test]
    fn test_slides_with_labels() {
        let slide1 = slide(&[shape(&["Welcome"]), shape(&["  Agenda  ", "Next steps"])].concat());
        let slide2 = slide("");
        let slide3 = slide(&shape(&["Thanks!"]));
        let bytes = build_package(&[
            ("ppt/slides/slide1.xml", slide1.as_str()),
            ("ppt/slides/slide2.xml", slide2.as_str()),
            ("ppt/slides/slide3.xml", slide3.as_str()),
        ]);

        let text = extract(&bytes).unwrap();
        assert_eq!(
            text,
            "Slide 1.\nWelcome\nAgenda  \nNext steps\n\nSlide 3.\nThanks!"
        );
    }

    #[test]
    fn test_numeric_fallback_order() {
        let bytes = build_package(&[
            ("ppt/slides/slide10.xml", slide(&shape(&["ten"])).as_str()),
            ("ppt/slides/slide2.xml", slide(&shape(&["two"])).as_str()),
            ("ppt/slides/_rels/slide2.xml.rels", rels(&[]).as_str()),
        ]);

        let text = extract(&bytes).unwrap();
        assert_eq!(text, "Slide 1.\ntwo\n\nSlide 2.\nten");
    }

    #[test]
    fn test_presentation_order() {
        let bytes = build_package(&[
            ("ppt/presentation.xml", presentation(&["rId3", "rId2"]).as_str()),
            (
                "ppt/_rels/presentation.xml.rels",
                rels(&[("rId2", "slides/slide1.xml"), ("rId3", "slides/slide2.xml")]).as_str(),
            ),
            ("ppt/slides/slide1.xml", slide(&shape(&["first file"])).as_str()),
            ("ppt/slides/slide2.xml", slide(&shape(&["second file"])).as_str()),
        ]);

        let text = extract(&bytes).unwrap();
        assert_eq!(text, "Slide 1.\nsecond file\n\nSlide 2.\nfirst file");
    }

    #[test]
    fn test_grouped_shapes_skipped() {
        let grouped = format!("<p:grpSp><p:nvGrpSpPr/>{}</p:grpSp>", shape(&["inside group"]));
        let bytes = build_package(&[(
            "ppt/slides/slide1.xml",
            slide(&[grouped, shape(&["top level"])].concat()).as_str(),
        )]);

        assert_eq!(extract(&bytes).unwrap(), "Slide 1.\ntop level");
    }

    #[test]
    fn test_line_break_and_entities() {
        let xml = slide(
            "<p:sp><p:txBody><a:p><a:r><a:t>Q&amp;A</a:t></a:r><a:br/><a:r><a:t>time</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let bytes = build_package(&[("ppt/slides/slide1.xml", xml.as_str())]);

        assert_eq!(extract(&bytes).unwrap(), "Slide 1.\nQ&A\ntime");
    }

    #[test]
    fn test_empty_presentation() {
        let bytes = build_package(&[("ppt/presentation.xml", presentation(&[]).as_str())]);
        assert_eq!(extract(&bytes).unwrap(), "");
    }

    #[test]
    fn test_missing_slide_part() {
        let bytes = build_package(&[
            ("ppt/presentation.xml", presentation(&["rId2"]).as_str()),
            (
                "ppt/_rels/presentation.xml.rels",
                rels(&[("rId2", "slides/slide1.xml")]).as_str(),
            ),
        ]);
        assert!(matches!(
            extract(&bytes),
            Err(DocError::ProcessingError { format: DocumentFormat::Pptx, .. })
        ));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt", "./slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt/slides", "../media/a.png"), "ppt/media/a.png");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide9.xml"), "ppt/slides/slide9.xml");
    }
}
