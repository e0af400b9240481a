//! Static neighbourhood records backing the map widget and the places
//! lookup anchor. Content pages own the long-form copy; the assistant only
//! needs display coordinates and a few points of interest.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbourhood {
    pub slug: &'static str,
    pub name: &'static str,
    /// Display center as (latitude, longitude).
    pub center: (f64, f64),
    pub zoom: u8,
    pub points_of_interest: &'static [&'static str],
}

pub static NEIGHBOURHOODS: &[Neighbourhood] = &[
    Neighbourhood {
        slug: "kitsilano",
        name: "Kitsilano",
        center: (49.2684, -123.1553),
        zoom: 14,
        points_of_interest: &["Kits Beach", "West 4th shops", "Kitsilano Pool"],
    },
    Neighbourhood {
        slug: "mount-pleasant",
        name: "Mount Pleasant",
        center: (49.2632, -123.1005),
        zoom: 14,
        points_of_interest: &["Main Street", "Brewery Creek", "Dude Chilling Park"],
    },
    Neighbourhood {
        slug: "yaletown",
        name: "Yaletown",
        center: (49.2744, -123.1216),
        zoom: 15,
        points_of_interest: &["David Lam Park", "Roundhouse", "Seawall"],
    },
    Neighbourhood {
        slug: "commercial-drive",
        name: "Commercial Drive",
        center: (49.2693, -123.0699),
        zoom: 14,
        points_of_interest: &["Grandview Park", "The Drive cafés", "Trout Lake"],
    },
    Neighbourhood {
        slug: "dunbar",
        name: "Dunbar-Southlands",
        center: (49.2441, -123.1856),
        zoom: 13,
        points_of_interest: &["Pacific Spirit Park", "Dunbar Village", "Memorial West Park"],
    },
];

/// Keyed lookup; absent slugs are a handled case, never assumed present.
pub fn neighbourhood(slug: &str) -> Option<&'static Neighbourhood> {
    NEIGHBOURHOODS.iter().find(|n| n.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_slug() {
        let n = neighbourhood("kitsilano").unwrap();
        assert_eq!(n.name, "Kitsilano");
        assert!(!n.points_of_interest.is_empty());
    }

    #[test]
    fn test_unknown_slug_is_none() {
        assert!(neighbourhood("atlantis").is_none());
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for n in NEIGHBOURHOODS {
            assert!(seen.insert(n.slug), "duplicate slug: {}", n.slug);
        }
    }
}
