//! Order Pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::round_money;

/// A product line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalogue identifier of the product.
    pub product_id: String,

    /// Product name at the time of purchase.
    pub name: String,

    /// Units ordered.
    pub quantity: u32,

    /// Price of one unit.
    pub unit_price: Decimal,
}

impl LineItem {
    /// `quantity × unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Reasons line items cannot be priced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// An order needs at least one line.
    #[error("order must contain at least one item")]
    NoItems,

    /// Lines must order at least one unit.
    #[error("item {product_id} must have a quantity of at least 1")]
    ZeroQuantity {
        /// Offending product.
        product_id: String,
    },

    /// Unit prices cannot be negative.
    #[error("item {product_id} has a negative unit price")]
    NegativePrice {
        /// Offending product.
        product_id: String,
    },
}

/// Sum the line totals of `items`, rounded to cents.
///
/// # Errors
///
/// Returns an error when `items` is empty or any line is malformed.
pub fn subtotal(items: &[LineItem]) -> Result<Decimal, PricingError> {
    if items.is_empty() {
        return Err(PricingError::NoItems);
    }

    let mut sum = Decimal::ZERO;

    for item in items {
        if item.quantity == 0 {
            return Err(PricingError::ZeroQuantity {
                product_id: item.product_id.clone(),
            });
        }

        if item.unit_price < Decimal::ZERO {
            return Err(PricingError::NegativePrice {
                product_id: item.product_id.clone(),
            });
        }

        sum = sum.saturating_add(item.line_total());
    }

    Ok(round_money(sum))
}

/// Money summary of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Coupon discount.
    pub discount: Decimal,

    /// Amount payable.
    pub total: Decimal,
}

impl OrderTotals {
    /// Totals for `subtotal` less `discount`, never below zero.
    #[must_use]
    pub fn new(subtotal: Decimal, discount: Decimal) -> Self {
        Self {
            subtotal,
            discount,
            total: round_money(subtotal.saturating_sub(discount).max(Decimal::ZERO)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    fn item(product_id: &str, quantity: u32, unit_price: Decimal) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            name: format!("Product {product_id}"),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn subtotal_sums_lines() -> TestResult {
        let items = [item("a", 2, dec!(9.99)), item("b", 1, dec!(0.02))];

        assert_eq!(subtotal(&items)?, dec!(20.00));

        Ok(())
    }

    #[test]
    fn malformed_items_are_rejected() {
        assert_eq!(subtotal(&[]), Err(PricingError::NoItems));
        assert_eq!(
            subtotal(&[item("a", 0, dec!(1))]),
            Err(PricingError::ZeroQuantity {
                product_id: "a".to_string()
            })
        );
        assert_eq!(
            subtotal(&[item("b", 1, dec!(-1))]),
            Err(PricingError::NegativePrice {
                product_id: "b".to_string()
            })
        );
    }

    #[test]
    fn totals_subtract_discount() {
        let totals = OrderTotals::new(dec!(100), dec!(12.5));

        assert_eq!(totals.total, dec!(87.50));
    }
}
