use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Opaque unique identifier for a stored image blob.
///
/// Ids are assigned once at write time and used for all subsequent
/// lookups. Generation uses UUIDv7, which combines the current time with
/// random bits: ids sort roughly in upload order and are
/// collision-resistant within (and across) store lifetimes. The blob a
/// given id maps to never changes; replacing an image means deleting one
/// id and minting another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Mint a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap a pre-existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short prefix form for logs and display names (first 8 hex chars).
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.short())
    }
}

impl FromStr for ImageId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidImageId(format!("{s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: Vec<ImageId> = (0..64).map(|_| ImageId::generate()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_from_str_round_trip() {
        let id = ImageId::generate();
        let parsed: ImageId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<ImageId>().is_err());
    }

    #[test]
    fn serde_round_trip_as_string() {
        let id = ImageId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.starts_with('"'));
        let back: ImageId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn generated_ids_sort_in_creation_order() {
        // UUIDv7 ids embed a millisecond timestamp in the high bits, so a
        // later id never sorts before an earlier one across a millisecond
        // boundary. allow equality within the same tick.
        let a = ImageId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = ImageId::generate();
        assert!(a < b);
    }
}
