//! Maps on-disk versions to layout generations.
//!
//! The table is static and never mutated, so any number of decode sessions
//! may resolve concurrently.

use std::fmt;

use crate::error::{DecodeError, Result};
use crate::versions::{Generation, LayoutName, V1_26, V2_3};
use crate::version::Version;

/// Handle to one registered layout generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationId {
    Atop1_26,
    Atop2_3,
}

impl GenerationId {
    pub fn version(self) -> Version {
        match self {
            GenerationId::Atop1_26 => V1_26::VERSION,
            GenerationId::Atop2_3 => V2_3::VERSION,
        }
    }

    /// Encoded size of a top-level layout in this generation.
    pub fn size_of(self, name: LayoutName) -> usize {
        match self {
            GenerationId::Atop1_26 => V1_26::size_of(name),
            GenerationId::Atop2_3 => V2_3::size_of(name),
        }
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atop {}", self.version())
    }
}

struct Registration {
    version: Version,
    generation: GenerationId,
}

static REGISTRY: &[Registration] = &[
    Registration {
        version: V1_26::VERSION,
        generation: GenerationId::Atop1_26,
    },
    Registration {
        version: V2_3::VERSION,
        generation: GenerationId::Atop2_3,
    },
    // atop's own readers compare `major.minor` as a decimal, so 2.30 is 2.3
    Registration {
        version: Version::new(2, 30),
        generation: GenerationId::Atop2_3,
    },
];

/// Looks up the generation for an exact version. There is no fallback to a
/// nearby version: point releases may change layouts.
pub fn resolve(version: Version) -> Result<GenerationId> {
    REGISTRY
        .iter()
        .find(|r| r.version == version)
        .map(|r| r.generation)
        .ok_or(DecodeError::UnsupportedVersion(version))
}

/// Every version this reader can decode, oldest first.
pub fn supported_versions() -> impl Iterator<Item = Version> {
    REGISTRY.iter().map(|r| r.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_versions() {
        assert_eq!(resolve(Version::new(1, 26)).unwrap(), GenerationId::Atop1_26);

        let generation = resolve("2.3".parse().unwrap()).unwrap();
        assert_eq!(generation, GenerationId::Atop2_3);
        assert_eq!(generation.size_of(LayoutName::SStat), 711_904);
        assert_eq!(generation.size_of(LayoutName::TStat), 768);
    }

    #[test]
    fn test_resolve_unknown_version() {
        match resolve(Version::new(3, 14)) {
            Err(DecodeError::UnsupportedVersion(v)) => assert_eq!(v, Version::new(3, 14)),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_minor_30_as_2_3() {
        assert_eq!(resolve(Version::new(2, 30)).unwrap(), GenerationId::Atop2_3);
        assert_eq!(
            resolve(Version::new(2, 30)).unwrap().version(),
            Version::new(2, 3)
        );
    }

    #[test]
    fn test_resolve_is_exact() {
        // no rounding to the closest registered release
        assert!(resolve(Version::new(2, 4)).is_err());
        assert!(resolve(Version::new(2, 31)).is_err());
        assert!(resolve(Version::new(1, 25)).is_err());
    }

    #[test]
    fn test_registry_versions_resolve() {
        let versions: Vec<_> = supported_versions().collect();
        assert_eq!(
            versions,
            [Version::new(1, 26), Version::new(2, 3), Version::new(2, 30)]
        );
        for version in versions {
            assert!(resolve(version).is_ok());
        }
    }
}
