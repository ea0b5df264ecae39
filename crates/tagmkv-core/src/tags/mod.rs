//! Matroska tag model and its XML codec.

pub mod decode;
pub mod encode;
pub mod property;
pub mod schema;

pub use decode::{DecodedTags, decode, decode_or_empty};
pub use encode::{encode, encode_properties};
pub use property::{ChildProperty, PropertySet, TaggedProperty, xml_safe};
pub use schema::{TagKind, TargetLevel};
