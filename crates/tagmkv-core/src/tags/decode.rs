//! # Tag document decoding
//!
//! Reads a `Tags > Tag > Simple` document, as produced by `mkvextract`, into
//! a [`PropertySet`] plus the structured cast/crew/genre views of it.

use std::collections::BTreeMap;

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::property::{PropertySet, TaggedProperty};
use super::schema::{self, TagKind};
use crate::error::{Result, TagMkvError};
use crate::lookup::unpack_genres;
use crate::types::{CastMember, CrewMember, ExternalRef};

/// Everything recovered from an existing tag document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTags {
    pub properties: PropertySet,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    /// Unique tag values keyed by lower-cased tag name.
    pub fields: BTreeMap<String, String>,
    /// `GENRE` split on `|`.
    pub genres: Vec<String>,
    pub external_ref: Option<ExternalRef>,
}

impl DecodedTags {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of a unique tag, by name in any case.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Decodes a tag document.
///
/// Only names in the known tag vocabulary are kept. `ACTOR` entries pick up
/// the first nested `Simple` as their `CHARACTER`.
///
/// # Errors
///
/// Returns `TagMkvError::EmptyInput` for a blank document,
/// `TagMkvError::XmlParse` for malformed XML and
/// `TagMkvError::UnexpectedRoot` if the root element is not `Tags`.
pub fn decode(xml: &str) -> Result<DecodedTags> {
    if xml.trim().is_empty() {
        return Err(TagMkvError::EmptyInput);
    }
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let root = doc.root_element();
    if !root.has_tag_name("Tags") {
        return Err(TagMkvError::UnexpectedRoot {
            found: root.tag_name().name().to_string(),
        });
    }

    let mut decoded = DecodedTags::default();
    let simples = element_children(root, "Tag").flat_map(|tag| element_children(tag, "Simple"));
    for simple in simples {
        decode_simple(simple, &mut decoded);
    }

    if let Some(genre) = decoded.field(schema::GENRE) {
        decoded.genres = unpack_genres(genre);
    }
    if let Some(reference) = decoded.field(schema::TMDB) {
        match reference.parse::<ExternalRef>() {
            Ok(reference) => decoded.external_ref = Some(reference),
            Err(err) => warn!(%err, "ignoring malformed external reference"),
        }
    }

    debug!(properties = decoded.properties.len(), "decoded tag document");
    Ok(decoded)
}

/// Decodes a tag document, treating absence or any failure as "no tags".
pub fn decode_or_empty(xml: Option<&str>) -> DecodedTags {
    let Some(xml) = xml.filter(|x| !x.trim().is_empty()) else {
        return DecodedTags::default();
    };
    decode(xml).unwrap_or_else(|err| {
        warn!(%err, "no usable tag data, continuing without existing tags");
        DecodedTags::default()
    })
}

fn decode_simple(simple: Node<'_, '_>, decoded: &mut DecodedTags) {
    let Some(raw_name) = child_text(simple, "Name") else {
        return;
    };
    let Some(name) = schema::canonical(raw_name) else {
        debug!(tag = raw_name, "skipping unknown tag");
        return;
    };
    let Some(value) = child_text(simple, "String") else {
        return;
    };

    match schema::classify(name) {
        Some(TagKind::Actor) => {
            let character = element_children(simple, "Simple")
                .find_map(|nested| child_text(nested, "String"));
            let property = TaggedProperty::actor(value, character);
            if !decoded.properties.contains(&property) {
                decoded
                    .cast
                    .push(CastMember::new(value, character.map(str::to_string)));
                decoded.properties.set(property);
            }
        }
        Some(TagKind::Crew) => {
            let property = TaggedProperty::new(name, value);
            if !decoded.properties.contains(&property) {
                decoded.crew.push(CrewMember::new(name, value));
                decoded.properties.set(property);
            }
        }
        Some(TagKind::Unique) | None => {
            decoded.properties.set(TaggedProperty::new(name, value));
            decoded.fields.insert(name.to_lowercase(), value.to_string());
        }
    }
}

fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &'static str) -> Option<&'a str> {
    element_children(node, tag)
        .next()
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
