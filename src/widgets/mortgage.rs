//! Interactive mortgage calculator: seeded from the tool input, adjusted
//! locally by the visitor. Never needs tool output.

use serde::{Deserialize, Serialize};

/// Assistant-suggested seed values. All optional; sensible defaults apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct MortgageSeed {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub down_payment_pct: Option<f64>,
    #[serde(default)]
    pub amortization_years: Option<u32>,
}

/// Local slider state, owned by the rendering surface.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MortgageState {
    pub price: f64,
    /// Annual interest rate in percent.
    pub rate: f64,
    pub down_payment_pct: f64,
    pub amortization_years: u32,
}

impl MortgageState {
    pub fn from_seed(seed: &MortgageSeed) -> Self {
        Self {
            price: seed.price.unwrap_or(850_000.0).max(0.0),
            rate: seed.rate.unwrap_or(4.7).clamp(0.0, 25.0),
            down_payment_pct: seed.down_payment_pct.unwrap_or(20.0).clamp(0.0, 100.0),
            amortization_years: seed.amortization_years.unwrap_or(25).clamp(1, 35),
        }
    }

    pub fn down_payment(&self) -> f64 {
        self.price * self.down_payment_pct / 100.0
    }

    pub fn principal(&self) -> f64 {
        (self.price - self.down_payment()).max(0.0)
    }

    /// Standard amortized monthly payment. A 0% rate divides the principal
    /// evenly over the term.
    pub fn monthly_payment(&self) -> f64 {
        let principal = self.principal();
        let months = (self.amortization_years * 12) as f64;
        if months == 0.0 {
            return 0.0;
        }
        let monthly_rate = self.rate / 12.0 / 100.0;
        if monthly_rate == 0.0 {
            return principal / months;
        }
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
    }

    // Slider steps used by the terminal surface.

    pub fn adjust_price(&mut self, delta: f64) {
        self.price = (self.price + delta).max(0.0);
    }

    pub fn adjust_rate(&mut self, delta: f64) {
        self.rate = (self.rate + delta).clamp(0.0, 25.0);
    }

    pub fn adjust_down_payment(&mut self, delta: f64) {
        self.down_payment_pct = (self.down_payment_pct + delta).clamp(0.0, 100.0);
    }
}
