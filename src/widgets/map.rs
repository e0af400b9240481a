//! Neighbourhood map widget: scoped to a known neighbourhood's display
//! center and zoom, with an explicit "no data" rendering for unknown slugs.

use crate::data;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapSeed {
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MapBlock {
    Map {
        name: String,
        center: (f64, f64),
        zoom: u8,
        points_of_interest: Vec<String>,
    },
    /// Unknown slug. Never a crash, never a blank widget.
    NoData { neighbourhood: String },
}

pub fn resolve(seed: &MapSeed) -> MapBlock {
    let slug = seed.slug.as_deref().unwrap_or_default();
    match data::neighbourhood(slug) {
        Some(n) => MapBlock::Map {
            name: n.name.to_string(),
            center: n.center,
            zoom: n.zoom,
            points_of_interest: n
                .points_of_interest
                .iter()
                .map(|p| p.to_string())
                .collect(),
        },
        None => MapBlock::NoData {
            neighbourhood: seed
                .neighbourhood
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "that neighbourhood".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_slug_scopes_the_map() {
        let block = resolve(&MapSeed {
            neighbourhood: Some("Kitsilano".into()),
            slug: Some("kitsilano".into()),
        });
        match block {
            MapBlock::Map { name, zoom, .. } => {
                assert_eq!(name, "Kitsilano");
                assert_eq!(zoom, 14);
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_slug_renders_no_data() {
        let block = resolve(&MapSeed {
            neighbourhood: Some("Narnia Heights".into()),
            slug: Some("narnia-heights".into()),
        });
        assert_eq!(
            block,
            MapBlock::NoData {
                neighbourhood: "Narnia Heights".into()
            }
        );
    }

    #[test]
    fn test_missing_slug_renders_no_data() {
        let block = resolve(&MapSeed::default());
        assert_eq!(
            block,
            MapBlock::NoData {
                neighbourhood: "that neighbourhood".into()
            }
        );
    }
}
