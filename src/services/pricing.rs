use rust_decimal::Decimal;

use crate::config::ItemPolicy;
use crate::errors::{AppError, AppResult};
use crate::models::LineItemRequest;

/// A requested line item whose inventory item was found, with its price frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub item_id: i64,
    pub quantity: i64,
    pub price_at_booking: Decimal,
}

impl PricedLine {
    pub fn line_total(&self) -> AppResult<Decimal> {
        self.price_at_booking
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(out_of_range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub items_total: Decimal,
    pub final_total: Decimal,
}

/// Snapshot the current price of every requested item.
///
/// `lookup` returns the current price for an inventory id, or `None` when the
/// item does not exist. Missing items are dropped under [`ItemPolicy::Lenient`]
/// and fail the whole request under [`ItemPolicy::Strict`].
pub fn price_lines<F>(
    requested: &[LineItemRequest],
    policy: ItemPolicy,
    mut lookup: F,
) -> AppResult<Vec<PricedLine>>
where
    F: FnMut(i64) -> AppResult<Option<Decimal>>,
{
    let mut lines = Vec::with_capacity(requested.len());

    for item in requested {
        match lookup(item.item_id)? {
            Some(price) => lines.push(PricedLine {
                item_id: item.item_id,
                quantity: item.quantity,
                price_at_booking: price,
            }),
            None if policy == ItemPolicy::Strict => {
                return Err(AppError::BadRequest(format!(
                    "inventory item {} not found",
                    item.item_id
                )));
            }
            None => {
                tracing::warn!(item_id = item.item_id, "skipping unknown inventory item");
            }
        }
    }

    Ok(lines)
}

/// `final_total = court_price + items_total - discount`. No clamping, no rounding.
pub fn compute_totals(
    court_price: Decimal,
    lines: &[PricedLine],
    discount: Decimal,
) -> AppResult<Totals> {
    let mut items_total = Decimal::ZERO;
    for line in lines {
        items_total = items_total
            .checked_add(line.line_total()?)
            .ok_or_else(out_of_range)?;
    }
    Ok(Totals {
        items_total,
        final_total: final_total(court_price, items_total, discount)?,
    })
}

/// Fails instead of panicking when the result leaves `Decimal`'s range.
pub fn final_total(court_price: Decimal, items_total: Decimal, discount: Decimal) -> AppResult<Decimal> {
    court_price
        .checked_add(items_total)
        .and_then(|sum| sum.checked_sub(discount))
        .ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::BadRequest("amount out of range".to_string())
}
