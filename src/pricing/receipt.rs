use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::{round2, PricingBreakdown};

const LABEL_WIDTH: usize = 28;
const AMOUNT_WIDTH: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    /// `None` for informational lines such as applied multipliers.
    pub amount: Option<f64>,
}

impl LineItem {
    fn charge(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount: Some(amount),
        }
    }

    fn note(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: None,
        }
    }
}

/// Line-item view of a breakdown, as sent with booking confirmations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub currency: String,
    pub vehicle_name: String,
    pub items: Vec<LineItem>,
}

impl Receipt {
    pub fn from_breakdown(breakdown: &PricingBreakdown) -> Self {
        let mut items = vec![
            LineItem::charge("Base fare", breakdown.base_fare),
            LineItem::charge("Distance", breakdown.distance_fee),
            LineItem::charge("Time", breakdown.time_fee),
        ];

        if breakdown.pickup_hour_multiplier != 1.0 {
            items.push(LineItem::note(format!(
                "Peak hour x{:.2}",
                breakdown.pickup_hour_multiplier
            )));
        }

        if breakdown.lead_time_multiplier != 1.0 {
            items.push(LineItem::note(format!(
                "Short notice x{:.2}",
                breakdown.lead_time_multiplier
            )));
        }

        for (label, amount) in [
            ("Wait time", breakdown.wait_fee),
            ("Tolls", breakdown.tolls),
            ("Airport fee", breakdown.airport_fee),
        ] {
            if amount != 0.0 {
                items.push(LineItem::charge(label, amount));
            }
        }

        if breakdown.min_fare_applied {
            let itemized = breakdown.base_fare + breakdown.distance_fee + breakdown.time_fee;
            let surcharges = breakdown.wait_fee + breakdown.tolls + breakdown.airport_fee;
            let scaled = itemized * breakdown.pickup_hour_multiplier * breakdown.lead_time_multiplier;
            let adjustment = round2(breakdown.subtotal_pre_tax - round2(scaled) - surcharges);

            items.push(LineItem::charge("Minimum fare adjustment", adjustment));
        }

        items.push(LineItem::charge("Subtotal", breakdown.subtotal_pre_tax));
        items.push(LineItem::charge("Tax", breakdown.tax));

        if breakdown.tip != 0.0 {
            items.push(LineItem::charge("Gratuity", breakdown.tip));
        }

        items.push(LineItem::charge("Total", breakdown.total));

        Self {
            currency: breakdown.currency.clone(),
            vehicle_name: breakdown.vehicle_name.clone(),
            items,
        }
    }

    /// Append a coupon line and the amount left to pay after it.
    pub fn push_discount(&mut self, code: &str, discount: f64, amount_due: f64) {
        self.items
            .push(LineItem::charge(format!("Coupon {}", code), -discount));
        self.items.push(LineItem::charge("Amount due", amount_due));
    }

    pub fn total(&self) -> Option<f64> {
        self.items
            .iter()
            .rev()
            .find(|item| item.label == "Total")
            .and_then(|item| item.amount)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let width = LABEL_WIDTH + AMOUNT_WIDTH + self.currency.len() + 1;

        // writing to a String cannot fail
        let _ = writeln!(out, "{}", self.vehicle_name);
        let _ = writeln!(out, "{}", "-".repeat(width));

        for item in &self.items {
            match item.amount {
                Some(amount) => {
                    let _ = writeln!(
                        out,
                        "{:<label$}{} {:>amount_width$.2}",
                        item.label,
                        self.currency,
                        amount,
                        label = LABEL_WIDTH,
                        amount_width = AMOUNT_WIDTH
                    );
                }
                None => {
                    let _ = writeln!(out, "  {}", item.label);
                }
            }
        }

        out
    }
}
