// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Version parsing and comparison module

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version format: {0:?}, expected X.Y.Z")]
    Format(String),

    #[error("invalid {segment} segment {value:?} in version {version:?}")]
    Segment {
        version: String,
        segment: &'static str,
        value: String,
    },
}

/// A dotted `major.minor.patch` version.
///
/// Field order matters: the derived `Ord` compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

/// Parse a version string of exactly three numeric segments (e.g. "1.2.3")
pub fn parse_version(s: &str) -> Result<Version, VersionError> {
    let parts: Vec<&str> = s.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return Err(VersionError::Format(s.to_owned()));
    };

    Ok(Version {
        major: parse_segment(s, "major", major)?,
        minor: parse_segment(s, "minor", minor)?,
        patch: parse_segment(s, "patch", patch)?,
    })
}

fn parse_segment(version: &str, segment: &'static str, value: &str) -> Result<u64, VersionError> {
    // u64::from_str accepts a leading '+', which is not a version digit
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::Segment {
            version: version.to_owned(),
            segment,
            value: value.to_owned(),
        });
    }

    value.parse::<u64>().map_err(|_| VersionError::Segment {
        version: version.to_owned(),
        segment,
        value: value.to_owned(),
    })
}

/// Compare two version strings segment by segment, most significant first
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(parse_version(a)?.cmp(&parse_version(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("0.2.38").unwrap(), Version::new(0, 2, 38));
        assert_eq!(parse_version("1.0.0").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_version("10.20.30").unwrap(), Version::new(10, 20, 30));
        assert_eq!("1.2.3".parse::<Version>().unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_version_invalid() {
        assert!(matches!(parse_version("invalid"), Err(VersionError::Format(_))));
        assert!(matches!(parse_version("1.2"), Err(VersionError::Format(_))));
        assert!(matches!(parse_version("1.2.3.4"), Err(VersionError::Format(_))));
        assert!(matches!(
            parse_version("a.b.c"),
            Err(VersionError::Segment {
                segment: "major",
                ..
            })
        ));
        assert!(parse_version("1..3").is_err());
        assert!(parse_version("1.+2.3").is_err());
        assert!(parse_version("1.2.-3").is_err());
        assert!(parse_version("v1.2.3").is_err());
    }

    #[test]
    fn test_segments_compare_numerically() {
        assert_eq!(compare_versions("1.10.0", "1.9.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("0.0.9", "0.0.10").unwrap(), Ordering::Less);
        assert_eq!(compare_versions("2.0.0", "1.99.99").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.0.01", "1.0.1").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_compare_rejects_malformed() {
        assert!(compare_versions("1.2", "1.2.0").is_err());
        assert!(compare_versions("1.2.0", "1.2.x").is_err());
    }


    #[test]
    fn test_ordering_properties() {
        let samples = [
            "0.0.0", "0.0.1", "0.1.0", "0.9.9", "1.0.0", "1.0.1", "1.1.0", "1.10.0", "2.0.0",
        ];

        for a in samples {
            assert_eq!(compare_versions(a, a).unwrap(), Ordering::Equal);
            for b in samples {
                let ab = compare_versions(a, b).unwrap();
                let ba = compare_versions(b, a).unwrap();
                assert_eq!(ab, ba.reverse(), "antisymmetry for {a} vs {b}");

                for c in samples {
                    let bc = compare_versions(b, c).unwrap();
                    if ab == Ordering::Less && bc == Ordering::Less {
                        assert_eq!(
                            compare_versions(a, c).unwrap(),
                            Ordering::Less,
                            "transitivity for {a} < {b} < {c}"
                        );
                    }
                }
            }
        }
    }
}
