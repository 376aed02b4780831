//! Version Compatibility Tests
//!
//! The stable and `0.x` rules, parsing from configuration strings, and the
//! warning that accompanies a newer pre-release minor.

use plugseek_core::{is_compatible, Compatibility, Error, Version};

#[test]
fn test_compatibility_table() {
    let cases: [((u32, u32), (u32, u32), Option<bool>); 8] = [
        ((1, 2), (1, 3), Some(false)),
        ((1, 3), (1, 2), None),
        ((1, 0), (1, 0), Some(false)),
        ((0, 2), (0, 3), Some(true)),
        ((0, 3), (0, 2), None),
        ((0, 2), (0, 2), Some(false)),
        ((2, 0), (1, 9), None),
        ((1, 9), (2, 0), None),
    ];

    // Some(warn) means compatible, with or without a warning.
    for (required, candidate, expected) in cases {
        let verdict = is_compatible("carb::tasking::ITasking", required.into(), candidate.into());
        match expected {
            Some(warn) => {
                assert!(verdict.is_compatible(), "{required:?} vs {candidate:?}");
                assert_eq!(verdict.warning().is_some(), warn, "{required:?} vs {candidate:?}");
            }
            None => assert_eq!(verdict, Compatibility::Incompatible, "{required:?} vs {candidate:?}"),
        }
    }
}

#[test]
fn test_warning_names_component_and_versions() {
    let verdict = is_compatible("omni::kit::IApp", Version::new(0, 2), Version::new(0, 7));
    let warning = verdict.warning().unwrap();
    assert!(warning.contains("omni::kit::IApp"));
    assert!(warning.contains("v0.7"));
    assert!(warning.contains("v0.2"));
}

#[test]
fn test_parsed_versions_compare() {
    let required: Version = "v1.4".parse().unwrap();
    let candidate: Version = "1.10".parse().unwrap();
    assert!(candidate > required);
    assert_eq!(
        is_compatible("carb::IEvents", required, candidate),
        Compatibility::Compatible
    );
}

#[test]
fn test_parse_errors() {
    for bad in ["", "1", "1.", ".1", "a.b", "1.2.3", "v", "4294967296.0", "+1.+2", "1.+2"] {
        assert!(
            matches!(bad.parse::<Version>(), Err(Error::VersionParse(_))),
            "{bad:?} should not parse"
        );
    }
}

#[test]
fn test_semver_conversion_drops_patch() {
    let v = semver::Version::parse("0.13.9").unwrap();
    let version = Version::try_from(&v).unwrap();
    assert_eq!(version, Version::new(0, 13));
    assert!(version.is_prerelease());
}

#[test]
fn test_semver_major_beyond_u32_rejected() {
    let max = semver::Version::new(u64::from(u32::MAX), 0, 0);
    let beyond = semver::Version::new(u64::from(u32::MAX) + 1, 0, 0);

    assert!(matches!(Version::try_from(&beyond), Err(Error::VersionParse(_))));
    assert_eq!(Version::try_from(&max).unwrap(), Version::new(u32::MAX, 0));
}
