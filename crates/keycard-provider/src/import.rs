//! Composite import IDs such as `zones/{zone_id}/applications/{id}`

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid import ID {id:?}: expected \"{pattern}\"")]
pub struct ImportError {
    pub id: String,
    pub pattern: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Capture(&'static str),
}

/// Slash-delimited pattern of literals and `{name}` captures
#[derive(Debug, Clone)]
pub struct ImportPattern {
    pattern: &'static str,
    segments: Vec<Segment>,
}

impl ImportPattern {
    pub fn new(pattern: &'static str) -> Self {
        let segments = pattern
            .split('/')
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(name) => Segment::Capture(name),
                    None => Segment::Literal(segment),
                }
            })
            .collect();
        Self { pattern, segments }
    }

    /// Split `id` into its named parts
    pub fn parse(&self, id: &str) -> Result<ImportId, ImportError> {
        let error = || ImportError {
            id: id.to_string(),
            pattern: self.pattern,
        };

        let parts: Vec<&str> = id.split('/').collect();
        if parts.len() != self.segments.len() {
            return Err(error());
        }

        let mut captures = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if *literal == part => {}
                Segment::Capture(name) if !part.is_empty() => {
                    captures.insert(*name, part.to_string());
                }
                _ => return Err(error()),
            }
        }
        Ok(ImportId { captures })
    }
}

/// Named parts of a parsed import ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    captures: HashMap<&'static str, String>,
}

impl ImportId {
    /// Captured part; only names present in the pattern may be requested
    pub fn get(&self, name: &str) -> String {
        self.captures.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLICATION: &str = "zones/{zone_id}/applications/{id}";

    #[test]
    fn test_parse_application_id() {
        let id = ImportPattern::new(APPLICATION)
            .parse("zones/Z/applications/A")
            .unwrap();
        assert_eq!(id.get("zone_id"), "Z");
        assert_eq!(id.get("id"), "A");
    }

    #[test]
    fn test_wrong_segment_count() {
        let pattern = ImportPattern::new(APPLICATION);
        for id in ["zones/Z", "zones/Z/applications/A/extra", "A", ""] {
            let err = pattern.parse(id).unwrap_err();
            assert_eq!(err.pattern, APPLICATION);
        }
    }

    #[test]
    fn test_mismatched_literal() {
        let err = ImportPattern::new(APPLICATION)
            .parse("zones/Z/resources/A")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid import ID \"zones/Z/resources/A\": expected \"zones/{zone_id}/applications/{id}\""
        );
    }

    #[test]
    fn test_empty_capture_rejected() {
        assert!(
            ImportPattern::new(APPLICATION)
                .parse("zones//applications/A")
                .is_err()
        );
    }

    #[test]
    fn test_trailing_literal() {
        let pattern = ImportPattern::new("organizations/{organization_id}/sso-connection");
        assert_eq!(
            pattern
                .parse("organizations/o1/sso-connection")
                .unwrap()
                .get("organization_id"),
            "o1"
        );
        assert!(pattern.parse("organizations/o1/sso").is_err());
    }
}
