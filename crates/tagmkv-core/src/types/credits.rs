use serde::{Deserialize, Serialize};

/// One cast entry: the performer and, when known, the role they play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastMember {
    pub actor: String,
    pub character: Option<String>,
}

impl CastMember {
    pub fn new(actor: impl Into<String>, character: Option<String>) -> Self {
        Self {
            actor: actor.into(),
            character: character.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// One crew entry. `job` holds the tag name (`DIRECTOR`, `ART_DIRECTION`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrewMember {
    pub job: String,
    pub person: String,
}

impl CrewMember {
    pub fn new(job: impl Into<String>, person: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            person: person.into(),
        }
    }

    /// Human-readable job title: `ART_DIRECTION` becomes `Art Direction`.
    #[must_use]
    pub fn display_job(&self) -> String {
        self.job
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let lower = part.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_character_is_dropped() {
        let c = CastMember::new("Someone", Some("  ".into()));
        assert_eq!(c.character, None);
    }

    #[test]
    fn display_job_title_cases_tag_name() {
        let crew = CrewMember::new("DIRECTOR_OF_PHOTOGRAPHY", "Roger Deakins");
        assert_eq!(crew.display_job(), "Director Of Photography");
        assert_eq!(CrewMember::new("WRITER", "x").display_job(), "Writer");
    }
}
