//! BC property transfer tax: tiered base tax plus the first-time-buyer
//! exemption with its linear phase-out band.

use serde::{Deserialize, Serialize};

const TIER_ONE_CAP: f64 = 200_000.0;
const TIER_TWO_CAP: f64 = 2_000_000.0;

const RESALE_THRESHOLD: f64 = 835_000.0;
const RESALE_CEILING: f64 = 860_000.0;
const NEW_BUILD_THRESHOLD: f64 = 1_100_000.0;
const NEW_BUILD_CEILING: f64 = 1_150_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct TaxInput {
    pub price: f64,
    #[serde(default)]
    pub first_time_buyer: bool,
    #[serde(default)]
    pub newly_built: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TaxBreakdown {
    pub price: f64,
    /// Tax on the portion up to $200k at 1%.
    pub tier_one: f64,
    /// Tax on the portion between $200k and $2M at 2%.
    pub tier_two: f64,
    /// Tax on the portion above $2M at 3%.
    pub tier_three: f64,
    pub base_tax: f64,
    pub exemption: f64,
    pub net_payable: f64,
}

/// Deterministic, pure function of its input. The exemption is clamped to
/// `[0, base_tax]`: the raw phase-out formula goes negative past the
/// ceiling and must read as zero there.
pub fn estimate(input: TaxInput) -> TaxBreakdown {
    let price = input.price.max(0.0);

    let tier_one = price.min(TIER_ONE_CAP) * 0.01;
    let tier_two = (price.min(TIER_TWO_CAP) - TIER_ONE_CAP).max(0.0) * 0.02;
    let tier_three = (price - TIER_TWO_CAP).max(0.0) * 0.03;
    let base_tax = tier_one + tier_two + tier_three;

    let exemption = if input.first_time_buyer {
        let (threshold, ceiling) = if input.newly_built {
            (NEW_BUILD_THRESHOLD, NEW_BUILD_CEILING)
        } else {
            (RESALE_THRESHOLD, RESALE_CEILING)
        };
        let raw = if price <= threshold {
            base_tax
        } else {
            base_tax * (ceiling - price) / (ceiling - threshold)
        };
        raw.clamp(0.0, base_tax)
    } else {
        0.0
    };

    TaxBreakdown {
        price,
        tier_one,
        tier_two,
        tier_three,
        base_tax,
        exemption,
        net_payable: base_tax - exemption,
    }
}
