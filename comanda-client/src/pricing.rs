//! Checkout pricing
//!
//! VAT-aware totals over a cart snapshot. Uses rust_decimal throughout;
//! intermediate math is unrounded and amounts are rounded exactly once at
//! the output boundary, half-up to currency precision.

use rust_decimal::prelude::*;
use shared::order::CartLine;
use thiserror::Error;

/// Currency precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Default VAT rate applied when the deployment does not override it (16%)
pub fn default_vat_rate() -> Decimal {
    Decimal::new(16, 2)
}

/// Round a monetary value to currency precision, half-up
#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Cart rejected before any computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// No lines to price
    #[error("Cart is empty")]
    EmptyCart,

    /// A line with nothing ordered (`line` is 1-based)
    #[error("Line {line}: quantity must be at least 1")]
    ZeroQuantity { line: u32 },

    /// A line priced below zero (`line` is 1-based)
    #[error("Line {line}: unit price cannot be negative")]
    NegativeUnitPrice { line: u32 },
}

/// Rounded monetary amounts for a single cart line
///
/// Built by the same arithmetic as the order totals, and also used for the
/// item write payloads so the two can never diverge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAmounts {
    /// Unit rate excluding VAT
    pub rate: Decimal,
    /// Line amount excluding VAT
    pub net: Decimal,
    /// VAT contribution (zero for exempt lines)
    pub vat: Decimal,
    /// `net + vat`
    pub gross: Decimal,
}

/// Price a single line at the given VAT rate
pub fn price_line(line: &CartLine, vat_rate: Decimal) -> LineAmounts {
    let raw_net = line.unit_price * Decimal::from(line.quantity);
    let raw_vat = if line.vatable {
        raw_net * vat_rate
    } else {
        Decimal::ZERO
    };

    let net = round_money(raw_net);
    let vat = round_money(raw_vat);
    LineAmounts {
        rate: round_money(line.unit_price),
        net,
        vat,
        gross: net + vat,
    }
}

/// Order totals produced by [`compute_totals`]
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PricingResult {
    /// Sum of line amounts excluding VAT, over all lines
    pub subtotal_excl_vat: Decimal,
    /// Sum of VAT contributions over vatable lines
    pub vat_amount: Decimal,
    /// `subtotal_excl_vat + vat_amount`, exactly
    pub total_incl_vat: Decimal,
}

/// Compute order totals for a cart snapshot.
///
/// Pure and deterministic: same lines and rate, same result. Amounts are
/// accumulated unrounded across all lines and rounded once at the end; the
/// total is then formed from the rounded parts so
/// `total_incl_vat == subtotal_excl_vat + vat_amount` holds exactly.
pub fn compute_totals(
    lines: &[CartLine],
    vat_rate: Decimal,
) -> Result<PricingResult, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    // Step 1: Reject malformed lines before touching any amount
    for (idx, line) in lines.iter().enumerate() {
        let position = idx as u32 + 1;
        if line.quantity == 0 {
            return Err(PricingError::ZeroQuantity { line: position });
        }
        if line.unit_price < Decimal::ZERO {
            return Err(PricingError::NegativeUnitPrice { line: position });
        }
    }

    // Step 2: Accumulate exact amounts
    let mut subtotal = Decimal::ZERO;
    let mut vat = Decimal::ZERO;
    for line in lines {
        let raw_net = line.unit_price * Decimal::from(line.quantity);
        subtotal += raw_net;
        if line.vatable {
            vat += raw_net * vat_rate;
        }
    }

    // Step 3: Round once at the output boundary
    let subtotal_excl_vat = round_money(subtotal);
    let vat_amount = round_money(vat);
    Ok(PricingResult {
        subtotal_excl_vat,
        vat_amount,
        total_incl_vat: subtotal_excl_vat + vat_amount,
    })
}
