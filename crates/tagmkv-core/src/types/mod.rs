pub mod credits;
pub mod external_ref;
pub mod media_type;

pub use credits::{CastMember, CrewMember};
pub use external_ref::ExternalRef;
pub use media_type::MediaType;
