//! Tag semantics for road extraction
//!
//! Only three tags matter: `highway` (road class whitelist), `oneway` and
//! `sidewalk`. Everything else on a way is ignored.

/// `highway` values accepted into the graph
pub const ROAD_CLASSES: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
];

/// Whether a `highway` value is a whitelisted road class
pub fn is_road_class(highway: &str) -> bool {
    ROAD_CLASSES.contains(&highway)
}

/// Whether `oneway` marks the way as traversable in digitization order only
///
/// `-1` (reverse one-way) is not a forward indicator and yields an
/// undirected road.
pub fn is_oneway_forward(oneway: Option<&str>) -> bool {
    matches!(oneway, Some("yes" | "true" | "1"))
}

/// Sidewalk presence as `(left, right)`
pub fn parse_sidewalk(sidewalk: Option<&str>) -> (bool, bool) {
    match sidewalk {
        Some("both") => (true, true),
        Some("left") => (true, false),
        Some("right") => (false, true),
        Some("no" | "none") => (false, false),
        _ => (false, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist() {
        assert_eq!(ROAD_CLASSES.len(), 13);
        for tag in ["motorway", "trunk_link", "residential", "living_street"] {
            assert!(is_road_class(tag), "{tag} should be accepted");
        }
    }

    #[test]
    fn test_rejected_classes() {
        for tag in ["service", "footway", "track", "cycleway", "construction", "Residential", ""] {
            assert!(!is_road_class(tag), "{tag} should be rejected");
        }
    }

    #[test]
    fn test_oneway() {
        assert!(is_oneway_forward(Some("yes")));
        assert!(is_oneway_forward(Some("1")));
        assert!(!is_oneway_forward(Some("no")));
        assert!(!is_oneway_forward(Some("-1")));
        assert!(!is_oneway_forward(None));
    }

    #[test]
    fn test_sidewalk_values() {
        assert_eq!(parse_sidewalk(Some("both")), (true, true));
        assert_eq!(parse_sidewalk(Some("left")), (true, false));
        assert_eq!(parse_sidewalk(Some("right")), (false, true));
        assert_eq!(parse_sidewalk(Some("no")), (false, false));
        assert_eq!(parse_sidewalk(Some("separate")), (false, false));
        assert_eq!(parse_sidewalk(None), (false, false));
    }
}
