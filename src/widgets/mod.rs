//! Tool widget resolution: one arm per supported tool mapping (lifecycle
//! state, input, output) to a concrete render block. The match is
//! exhaustive over `ToolName`, so adding a tool is a compile-time checklist.

pub mod map;
pub mod mortgage;
pub mod places;
pub mod tax;
pub mod viewing;

use crate::chat::types::{ToolName, ToolPart, ToolState};
use crate::config::AgentIdentity;
use serde::Serialize;
use serde_json::Value as JsonValue;

use map::{MapBlock, MapSeed};
use mortgage::{MortgageSeed, MortgageState};
use places::{PlacesBlock, PlacesSeed};
use tax::{TaxBreakdown, TaxInput};
use viewing::ViewingSeed;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "widget", rename_all = "kebab-case")]
pub enum WidgetBlock {
    /// Generic placeholder, scoped to the tool's own label.
    Loading { label: String },
    /// Distinct in-flight indicator for the places lookup.
    Searching { query: String },
    MortgageCalculator {
        seed: MortgageSeed,
        initial: MortgageState,
    },
    TaxEstimate {
        input: TaxInput,
        breakdown: TaxBreakdown,
    },
    ContactCard {
        name: String,
        email: String,
        phone: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        brokerage: Option<String>,
    },
    ViewingForm { seed: ViewingSeed },
    Map(MapBlock),
    Places(PlacesBlock),
    /// Output reported failure: a scoped, non-fatal message.
    Failure { tool: String, message: String },
}

/// Decode a tool input payload, degrading to defaults when the payload is
/// missing or malformed. Widgets never fail a message over a bad seed.
fn decode_seed<T: Default + serde::de::DeserializeOwned>(input: Option<&JsonValue>) -> T {
    input
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// True when a tool output payload signals failure (`{"error": ...}`).
fn output_error(output: Option<&JsonValue>) -> Option<String> {
    output
        .and_then(|v| v.get("error"))
        .and_then(|e| e.as_str())
        .map(String::from)
}

pub fn resolve(part: &ToolPart, agent: &AgentIdentity) -> WidgetBlock {
    if !part.is_ready() {
        // The places search is already executing once its input is
        // complete; signal that instead of the generic placeholder.
        if part.tool == ToolName::NearbyPlaces && part.state == ToolState::InputAvailable {
            let seed: PlacesSeed = decode_seed(part.input.as_ref());
            return WidgetBlock::Searching {
                query: seed.query.unwrap_or_else(|| "nearby".to_string()),
            };
        }
        return WidgetBlock::Loading {
            label: part.tool.loading_label().to_string(),
        };
    }

    match part.tool {
        ToolName::MortgageCalculator => {
            let seed: MortgageSeed = decode_seed(part.input.as_ref());
            WidgetBlock::MortgageCalculator {
                seed,
                initial: MortgageState::from_seed(&seed),
            }
        }
        ToolName::PropertyTaxEstimate => {
            let input: TaxInput = decode_seed(part.input.as_ref());
            WidgetBlock::TaxEstimate {
                input,
                breakdown: tax::estimate(input),
            }
        }
        ToolName::ContactCard => WidgetBlock::ContactCard {
            name: agent.name.clone(),
            email: agent.email.clone(),
            phone: agent.phone.clone(),
            brokerage: agent.brokerage.clone(),
        },
        ToolName::ScheduleViewing => WidgetBlock::ViewingForm {
            seed: decode_seed(part.input.as_ref()),
        },
        ToolName::NeighbourhoodMap => {
            let seed: MapSeed = decode_seed(part.input.as_ref());
            WidgetBlock::Map(map::resolve(&seed))
        }
        ToolName::NearbyPlaces => {
            if let Some(message) = output_error(part.output.as_ref()) {
                tracing::debug!("places lookup reported failure: {}", message);
                return WidgetBlock::Failure {
                    tool: part.tool.label().to_string(),
                    message: "We couldn't find places for that — try asking directly.".to_string(),
                };
            }
            let seed: PlacesSeed = decode_seed(part.input.as_ref());
            WidgetBlock::Places(places::resolve(&seed, part.output.as_ref()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent() -> AgentIdentity {
        AgentIdentity {
            name: "Maya Whitfield".into(),
            email: "maya@hearth.homes".into(),
            phone: "604-555-0184".into(),
            brokerage: None,
        }
    }

    fn part(tool: ToolName, state: ToolState, input: Option<JsonValue>) -> ToolPart {
        let mut p = ToolPart::new("c1", tool);
        p.input = input;
        p.advance(state);
        p
    }

    #[test]
    fn test_streaming_part_gets_scoped_loading_label() {
        let p = part(ToolName::NeighbourhoodMap, ToolState::InputStreaming, None);
        match resolve(&p, &agent()) {
            WidgetBlock::Loading { label } => assert!(label.contains("map")),
            other => panic!("expected loading, got {other:?}"),
        }
    }

    #[test]
    fn test_places_input_available_shows_searching_not_loading() {
        let p = part(
            ToolName::NearbyPlaces,
            ToolState::InputAvailable,
            Some(json!({ "query": "coffee" })),
        );
        assert_eq!(
            resolve(&p, &agent()),
            WidgetBlock::Searching {
                query: "coffee".into()
            }
        );
    }

    #[test]
    fn test_places_never_renders_results_before_output() {
        let p = part(
            ToolName::NearbyPlaces,
            ToolState::InputAvailable,
            Some(json!({ "query": "coffee" })),
        );
        assert!(!matches!(resolve(&p, &agent()), WidgetBlock::Places(_)));
    }

    #[test]
    fn test_calculator_seeds_from_input() {
        let p = part(
            ToolName::MortgageCalculator,
            ToolState::InputAvailable,
            Some(json!({ "price": 950000.0, "rate": 5.1 })),
        );
        match resolve(&p, &agent()) {
            WidgetBlock::MortgageCalculator { initial, .. } => {
                assert_eq!(initial.price, 950_000.0);
                assert_eq!(initial.rate, 5.1);
            }
            other => panic!("expected calculator, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_input_degrades_to_defaults() {
        let p = part(
            ToolName::MortgageCalculator,
            ToolState::InputAvailable,
            Some(json!("not an object")),
        );
        match resolve(&p, &agent()) {
            WidgetBlock::MortgageCalculator { initial, .. } => {
                assert_eq!(initial.amortization_years, 25);
            }
            other => panic!("expected calculator, got {other:?}"),
        }
    }

    #[test]
    fn test_tax_widget_computes_breakdown() {
        let p = part(
            ToolName::PropertyTaxEstimate,
            ToolState::InputAvailable,
            Some(json!({ "price": 500000.0, "first_time_buyer": true })),
        );
        match resolve(&p, &agent()) {
            WidgetBlock::TaxEstimate { breakdown, .. } => {
                assert_eq!(breakdown.net_payable, 0.0);
            }
            other => panic!("expected tax estimate, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_card_needs_no_input() {
        let p = part(ToolName::ContactCard, ToolState::InputAvailable, None);
        match resolve(&p, &agent()) {
            WidgetBlock::ContactCard { name, .. } => assert_eq!(name, "Maya Whitfield"),
            other => panic!("expected contact card, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_map_slug_is_no_data_not_crash() {
        let p = part(
            ToolName::NeighbourhoodMap,
            ToolState::InputAvailable,
            Some(json!({ "neighbourhood": "Narnia", "slug": "narnia" })),
        );
        match resolve(&p, &agent()) {
            WidgetBlock::Map(MapBlock::NoData { neighbourhood }) => {
                assert_eq!(neighbourhood, "Narnia");
            }
            other => panic!("expected no-data map, got {other:?}"),
        }
    }

    #[test]
    fn test_error_output_renders_scoped_failure() {
        let mut p = part(
            ToolName::NearbyPlaces,
            ToolState::OutputAvailable,
            Some(json!({ "query": "coffee" })),
        );
        p.output = Some(json!({ "error": "upstream 503" }));
        match resolve(&p, &agent()) {
            WidgetBlock::Failure { tool, message } => {
                assert_eq!(tool, "Nearby places");
                assert!(!message.contains("503"), "raw error leaked: {message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
