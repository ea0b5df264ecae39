//! # Tag document encoding
//!
//! Writes a [`PropertySet`] as a `Tags` document, one `Tag` block per target
//! level, broadest scope first.

use std::io::Write;

use tracing::debug;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use super::property::{PropertySet, TaggedProperty, xml_safe};
use super::schema::{self, TargetLevel};
use crate::error::Result;
use crate::record::MediaRecord;
use crate::types::MediaType;

/// System identifier of the tag DTD.
pub const DOCTYPE_SYSTEM: &str = "matroskatags.dtd";

const LEVELS: [TargetLevel; 2] = [TargetLevel::Season, TargetLevel::Episode];

/// Encodes a record's properties.
///
/// # Errors
///
/// Returns `TagMkvError::XmlWrite` if the emitter rejects the document.
///
/// # Examples
/// ```
/// use tagmkv_core::{MediaRecord, ParserConfig};
///
/// let config = ParserConfig::new().with_reference_year(2026);
/// let record = MediaRecord::open("Show Name S02E05 Episode Title.mkv", None, &config).unwrap();
/// let xml = tagmkv_core::tags::encode(&record).unwrap();
/// assert_eq!(xml.matches("<Tag>").count(), 2);
/// assert!(xml.contains("<TargetTypeValue>60</TargetTypeValue>"));
/// ```
pub fn encode(record: &MediaRecord) -> Result<String> {
    encode_properties(record.properties())
}

/// Encodes a bare property set. A missing `MEDIA_TYPE` is written as movie.
///
/// # Errors
///
/// Returns `TagMkvError::XmlWrite` if the emitter rejects the document.
pub fn encode_properties(properties: &PropertySet) -> Result<String> {
    let mut properties = properties.clone();
    if properties.get(schema::MEDIA_TYPE).is_none() {
        properties.set(TaggedProperty::new(
            schema::MEDIA_TYPE,
            MediaType::Movie.code().to_string(),
        ));
    }

    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    let mut writer = EventWriter::new_with_config(Vec::new(), config);

    writer.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;
    writer
        .inner_mut()
        .write_all(format!("\n<!DOCTYPE Tags SYSTEM \"{DOCTYPE_SYSTEM}\">").as_bytes())
        .map_err(xml::writer::Error::from)?;
    writer.write(XmlEvent::start_element("Tags"))?;

    for level in LEVELS {
        let scoped: Vec<&TaggedProperty> = properties
            .iter()
            .filter(|p| !xml_safe(&p.value).trim().is_empty())
            .filter(|p| schema::target_level(&p.name) == level)
            .collect();
        if scoped.is_empty() {
            continue;
        }
        writer.write(XmlEvent::start_element("Tag"))?;
        writer.write(XmlEvent::start_element("Targets"))?;
        write_text_element(&mut writer, "TargetTypeValue", &level.value().to_string())?;
        writer.write(XmlEvent::end_element())?; // </Targets>
        for property in scoped {
            write_simple(&mut writer, property)?;
        }
        writer.write(XmlEvent::end_element())?; // </Tag>
    }

    writer.write(XmlEvent::end_element())?; // </Tags>
    let xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    debug!(bytes = xml.len(), properties = properties.len(), "encoded tag document");
    Ok(xml)
}

fn write_simple<W: Write>(writer: &mut EventWriter<W>, property: &TaggedProperty) -> Result<()> {
    writer.write(XmlEvent::start_element("Simple"))?;
    write_text_element(writer, "Name", &property.name.to_uppercase())?;
    write_text_element(writer, "String", &property.value)?;
    if let Some(child) = property
        .child
        .as_ref()
        .filter(|c| !xml_safe(&c.value).trim().is_empty())
    {
        writer.write(XmlEvent::start_element("Simple"))?;
        write_text_element(writer, "Name", &child.name.to_uppercase())?;
        write_text_element(writer, "String", &child.value)?;
        writer.write(XmlEvent::end_element())?;
    }
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Writes `<name>text</name>`. Characters XML cannot carry are dropped and
/// carriage returns go out as `&#13;`, since readers fold literal ones into
/// line feeds.
fn write_text_element<W: Write>(writer: &mut EventWriter<W>, name: &str, text: &str) -> Result<()> {
    writer.write(XmlEvent::start_element(name))?;
    let text = xml_safe(text);
    for (idx, segment) in text.split('\r').enumerate() {
        if idx > 0 {
            writer
                .inner_mut()
                .write_all(b"&#13;")
                .map_err(xml::writer::Error::from)?;
        }
        writer.write(XmlEvent::characters(segment))?;
    }
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::parser::{FilenameParser, ParserConfig};
    use crate::tags::decode;
    use crate::types::{CastMember, CrewMember, ExternalRef};

    fn parser() -> FilenameParser {
        FilenameParser::new(ParserConfig::new().with_reference_year(2026)).unwrap()
    }

    fn blocks(xml: &str) -> Vec<(u32, Vec<String>)> {
        let doc = roxmltree::Document::parse_with_options(
            xml,
            roxmltree::ParsingOptions {
                allow_dtd: true,
                ..Default::default()
            },
        )
        .unwrap();
        doc.root_element()
            .children()
            .filter(|n| n.has_tag_name("Tag"))
            .map(|tag| {
                let level = tag
                    .descendants()
                    .find(|n| n.has_tag_name("TargetTypeValue"))
                    .and_then(|n| n.text())
                    .unwrap()
                    .parse()
                    .unwrap();
                let names = tag
                    .children()
                    .filter(|n| n.has_tag_name("Simple"))
                    .filter_map(|s| s.children().find(|n| n.has_tag_name("Name")))
                    .filter_map(|n| n.text().map(str::to_string))
                    .collect();
                (level, names)
            })
            .collect()
    }

    fn keyed(set: &PropertySet) -> HashSet<(String, String, Option<String>)> {
        set.iter()
            .map(|p| (p.name.clone(), p.value.clone(), p.child.as_ref().map(|c| c.value.clone())))
            .collect()
    }

    #[test]
    fn episode_splits_into_season_and_episode_blocks() {
        let mut record = MediaRecord::from_filename("x.mkv", &parser());
        record.set_media_type(MediaType::TvShow);
        record.set_season(2);
        record.set_episode(5);
        record.clear("TITLE");

        let xml = record.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\""));
        assert!(xml.contains("<!DOCTYPE Tags SYSTEM \"matroskatags.dtd\">"));
        let blocks = blocks(&xml);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].0, 60);
        assert!(blocks[0].1.contains(&"SEASON".to_string()));
        assert_eq!(blocks[1].0, 50);
        assert!(blocks[1].1.contains(&"EPISODE".to_string()));
        assert!(blocks[1].1.contains(&"MEDIA_TYPE".to_string()));
    }

    #[test]
    fn movie_has_single_block() {
        let record = MediaRecord::from_filename("Heat.1995.mkv", &parser());
        let blocks = blocks(&record.to_xml().unwrap());
        assert_eq!(blocks, [(50, vec!["MEDIA_TYPE".to_string(), "TITLE".to_string()])]);
    }

    #[test]
    fn missing_media_type_defaults_to_movie() {
        let mut set = PropertySet::new();
        set.set(TaggedProperty::new("title", "Heat"));
        let xml = encode_properties(&set).unwrap();
        assert!(xml.contains("<Name>MEDIA_TYPE</Name>"));
        assert!(xml.contains("<String>9</String>"));
        assert!(xml.contains("<Name>TITLE</Name>"));
    }

    #[test]
    fn empty_values_are_omitted() {
        let mut set = PropertySet::new();
        set.set(TaggedProperty::new("SUMMARY", "  "));
        let xml = encode_properties(&set).unwrap();
        assert!(!xml.contains("SUMMARY"));
        assert!(!xml.contains("<TargetTypeValue>60"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let mut record = MediaRecord::from_filename("x.mkv", &parser());
        record.set_title("Tom & Jerry <Redux>");
        let xml = record.to_xml().unwrap();
        assert!(xml.contains("<String>Tom &amp; Jerry &lt;Redux"));
        let decoded = decode(&xml).unwrap();
        assert_eq!(decoded.field("title"), Some("Tom & Jerry <Redux>"));
    }

    #[test]
    fn carriage_returns_survive_round_trip() {
        let mut record = MediaRecord::from_filename("x.mkv", &parser());
        record.set_description("line one\r\nline two\rend");
        let xml = record.to_xml().unwrap();
        assert!(xml.contains("line one&#13;\nline two&#13;end"));
        let decoded = decode(&xml).unwrap();
        assert_eq!(decoded.field("description"), Some("line one\r\nline two\rend"));
        assert_eq!(keyed(&decoded.properties), keyed(record.properties()));
    }

    #[test]
    fn control_characters_do_not_break_the_document() {
        let mut record = MediaRecord::from_filename("x.mkv", &parser());
        record.set_description("line one\u{c}line two");
        record.add_cast(CastMember::new("Jane\u{0} Doe", Some("\u{1b}Neo".into())));
        let xml = record.to_xml().unwrap();
        let decoded = decode(&xml).unwrap();
        assert_eq!(decoded.field("description"), Some("line oneline two"));
        assert_eq!(decoded.cast, record.tags().cast);
        assert_eq!(keyed(&decoded.properties), keyed(record.properties()));
    }

    #[test]
    fn stray_characters_in_raw_properties_are_dropped() {
        let mut set = PropertySet::new();
        let mut property = TaggedProperty::new("TITLE", "Heat");
        property.value.push('\u{8}');
        set.set(property);
        let decoded = decode(&encode_properties(&set).unwrap()).unwrap();
        assert_eq!(decoded.field("title"), Some("Heat"));
    }

    #[test]
    fn round_trip_reproduces_every_field() {
        let mut record = MediaRecord::from_filename("Show Name S02E05 Episode Title.mkv", &parser());
        record.set_description("Things happen.");
        record.set_summary("A show.");
        record.set_date_released(NaiveDate::from_ymd_opt(2019, 4, 7).unwrap());
        record.set_genres(vec!["Drama".into(), "Comedy".into()]);
        record.set_external_ref(ExternalRef::tv(12345));
        record.add_cast(CastMember::new("Jane Doe", Some("Detective".into())));
        record.add_cast(CastMember::new("John Roe", None));
        record.add_crew(CrewMember::new("DIRECTOR", "Ann Smith"));
        record.add_crew(CrewMember::new("WRITER", "Bob Jones"));
        record.add_crew(CrewMember::new("WRITER", "Cy Young"));

        let decoded = decode(&record.to_xml().unwrap()).unwrap();
        assert_eq!(keyed(&decoded.properties), keyed(record.properties()));
        assert_eq!(decoded.field("title"), Some("Episode Title"));
        assert_eq!(decoded.field("show"), Some("Show Name"));
        assert_eq!(decoded.field("season"), Some("2"));
        assert_eq!(decoded.field("episode"), Some("5"));
        assert_eq!(decoded.field("description"), Some("Things happen."));
        assert_eq!(decoded.field("date_released"), Some("2019-04-07"));
        assert_eq!(decoded.field("genre"), Some("Drama|Comedy"));
        assert_eq!(decoded.genres, ["Drama", "Comedy"]);
        assert_eq!(decoded.cast, record.tags().cast);
        assert_eq!(decoded.crew, record.tags().crew);
        assert_eq!(decoded.external_ref, Some(ExternalRef::tv(12345)));
    }
}
