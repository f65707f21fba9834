// src/geo/kml.rs
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::{io::Write, path::Path};

use crate::{config::GroupStyle, output::write_atomically};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";

/// One map point taken from the processed table.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// Serializes a named, styled point group to a geospatial file.
pub trait GeoWriter {
    fn write_group(&self, style: &GroupStyle, points: &[GeoPoint], path: &Path) -> Result<()>;
}

/// Writes KML 2.2 documents with unnamed, icon-styled placemarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct KmlWriter;

impl GeoWriter for KmlWriter {
    fn write_group(&self, style: &GroupStyle, points: &[GeoPoint], path: &Path) -> Result<()> {
        let doc = render_kml(style, points)?;
        write_atomically(path, |f| {
            f.write_all(&doc)
                .with_context(|| format!("writing {:?}", path))
        })
    }
}

fn start<W: Write>(w: &mut Writer<W>, tag: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn end<W: Write>(w: &mut Writer<W>, tag: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn text_element<W: Write>(w: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    start(w, tag)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, tag)
}

/// Render a full KML document for one group.
pub fn render_kml(style: &GroupStyle, points: &[GeoPoint]) -> Result<Vec<u8>> {
    let style_id = format!("group-{}", style.code);
    let style_url = format!("#{}", style_id);
    let mut w = Writer::new_with_indent(Vec::with_capacity(512 + points.len() * 160), b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NS)]),
    ))?;
    start(&mut w, "Document")?;
    text_element(&mut w, "name", &style.document_name)?;

    w.write_event(Event::Start(
        BytesStart::new("Style").with_attributes([("id", style_id.as_str())]),
    ))?;
    start(&mut w, "IconStyle")?;
    text_element(&mut w, "color", &style.color)?;
    text_element(&mut w, "scale", &style.scale.to_string())?;
    start(&mut w, "Icon")?;
    text_element(&mut w, "href", &style.icon_href)?;
    end(&mut w, "Icon")?;
    end(&mut w, "IconStyle")?;
    end(&mut w, "Style")?;

    for p in points {
        start(&mut w, "Placemark")?;
        text_element(&mut w, "styleUrl", &style_url)?;
        if let Some(when) = kml_when(&p.timestamp) {
            start(&mut w, "TimeStamp")?;
            text_element(&mut w, "when", &when)?;
            end(&mut w, "TimeStamp")?;
        }
        start(&mut w, "Point")?;
        text_element(
            &mut w,
            "coordinates",
            &format!("{},{},0", p.longitude, p.latitude),
        )?;
        end(&mut w, "Point")?;
        end(&mut w, "Placemark")?;
    }

    end(&mut w, "Document")?;
    end(&mut w, "kml")?;

    let mut doc = w.into_inner();
    doc.push(b'\n');
    Ok(doc)
}

/// RFC 3339 timestamps become UTC `<when>` values; anything else is left off.
fn kml_when(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)
        })
}
