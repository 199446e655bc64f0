//! Line item and dinner package pricing
//!
//! Amounts are stored as `f64` but every sum and product goes through
//! `Decimal`, rounded half-up to 2 dp.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingDinnerPackage, BookingItem, DinnerPackageSelection, LineItemInput, QuotationItem,
};
use sqlx::SqlitePool;

use crate::db;
use crate::error::ServiceResult;
use crate::validation::{MAX_NAME_LEN, validate_amount, validate_positive_quantity};

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn to_money(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an amount to cents, half-up
pub fn round_money(value: f64) -> f64 {
    to_money(to_decimal(value))
}

/// `quantity * unit_price`
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    to_money(to_decimal(quantity) * to_decimal(unit_price))
}

/// `price_per_table * table_count`
pub fn dinner_total(price_per_table: f64, table_count: i32) -> f64 {
    to_money(to_decimal(price_per_table) * Decimal::from(table_count))
}

/// `total - paid`
pub fn balance(total: f64, paid: f64) -> f64 {
    to_money(to_decimal(total) - to_decimal(paid))
}

/// Sum of amounts, rounded half-up to cents
pub fn sum_money(values: impl IntoIterator<Item = f64>) -> f64 {
    to_money(values.into_iter().map(to_decimal).sum())
}

/// A line item with its price settled
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub billing_item_id: Option<i64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

impl PricedItem {
    pub fn new(
        billing_item_id: Option<i64>,
        description: String,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            billing_item_id,
            description,
            quantity,
            unit_price,
            subtotal: line_total(quantity, unit_price),
        }
    }
}

impl From<&BookingItem> for PricedItem {
    fn from(item: &BookingItem) -> Self {
        Self::new(
            item.billing_item_id,
            item.description.clone(),
            item.quantity,
            item.unit_price,
        )
    }
}

impl From<&QuotationItem> for PricedItem {
    fn from(item: &QuotationItem) -> Self {
        Self::new(
            item.billing_item_id,
            item.description.clone(),
            item.quantity,
            item.unit_price,
        )
    }
}

/// A dinner package with its price settled
#[derive(Debug, Clone, PartialEq)]
pub struct PricedPackage {
    pub dinner_package_id: i64,
    pub package_name: String,
    pub table_count: i32,
    pub price_per_table: f64,
    pub total: f64,
}

impl PricedPackage {
    pub fn new(
        dinner_package_id: i64,
        package_name: String,
        table_count: i32,
        price_per_table: f64,
    ) -> Self {
        Self {
            dinner_package_id,
            package_name,
            table_count,
            price_per_table,
            total: dinner_total(price_per_table, table_count),
        }
    }
}

impl From<&BookingDinnerPackage> for PricedPackage {
    fn from(pkg: &BookingDinnerPackage) -> Self {
        Self::new(
            pkg.dinner_package_id,
            pkg.package_name.clone(),
            pkg.table_count,
            pkg.price_per_table,
        )
    }
}

/// Items, package and the derived totals of a booking or quotation
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub items: Vec<PricedItem>,
    pub package: Option<PricedPackage>,
    pub subtotal: f64,
    pub dinner_total: f64,
    pub total_amount: f64,
}

impl Pricing {
    pub fn new(items: Vec<PricedItem>, package: Option<PricedPackage>) -> Self {
        let subtotal: Decimal = items.iter().map(|i| to_decimal(i.subtotal)).sum();
        let dinner = package
            .as_ref()
            .map_or(Decimal::ZERO, |p| to_decimal(p.total));
        Self {
            subtotal: to_money(subtotal),
            dinner_total: to_money(dinner),
            total_amount: to_money(subtotal + dinner),
            items,
            package,
        }
    }
}

/// Resolve requested line items against the billing catalog.
///
/// A catalog item supplies the default description and unit price. Free-form
/// items must carry both.
pub async fn resolve_items(
    pool: &SqlitePool,
    inputs: &[LineItemInput],
) -> ServiceResult<Vec<PricedItem>> {
    let mut items = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        validate_positive_quantity(input.quantity, &format!("items.{index}.quantity"))?;
        if let Some(price) = input.unit_price {
            validate_amount(price, &format!("items.{index}.unit_price"))?;
        }
        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if description.is_some_and(|d| d.chars().count() > MAX_NAME_LEN) {
            return Err(AppError::field(
                &format!("items.{index}.description"),
                format!("Description is too long (max {MAX_NAME_LEN} characters)"),
            )
            .into());
        }

        let item = match input.billing_item_id {
            Some(billing_item_id) => {
                let catalog = db::billing_items::find_by_id(pool, billing_item_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::new(ErrorCode::BillingItemNotFound)
                            .with_detail("billing_item_id", billing_item_id)
                    })?;
                PricedItem::new(
                    Some(billing_item_id),
                    description.map_or(catalog.name, str::to_string),
                    input.quantity,
                    input.unit_price.unwrap_or(catalog.unit_price),
                )
            }
            None => {
                let description = description.ok_or_else(|| {
                    AppError::field(
                        &format!("items.{index}.description"),
                        "Description is required for items not in the catalog",
                    )
                })?;
                let unit_price = input.unit_price.ok_or_else(|| {
                    AppError::field(
                        &format!("items.{index}.unit_price"),
                        "Unit price is required for items not in the catalog",
                    )
                })?;
                PricedItem::new(None, description.to_string(), input.quantity, unit_price)
            }
        };
        items.push(item);
    }
    Ok(items)
}

/// Resolve a dinner package selection: the package must be active and the
/// table count must reach its minimum.
pub async fn resolve_package(
    pool: &SqlitePool,
    selection: Option<DinnerPackageSelection>,
) -> ServiceResult<Option<PricedPackage>> {
    let Some(selection) = selection else {
        return Ok(None);
    };
    let package = db::dinner_packages::find_by_id(pool, selection.dinner_package_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::DinnerPackageNotFound)
                .with_detail("dinner_package_id", selection.dinner_package_id)
        })?;
    if !package.is_active {
        return Err(AppError::new(ErrorCode::DinnerPackageInactive)
            .with_detail("dinner_package_id", package.id)
            .into());
    }
    if selection.table_count < package.min_tables {
        return Err(AppError::with_message(
            ErrorCode::DinnerPackageBelowMinTables,
            format!(
                "{} requires at least {} tables",
                package.name, package.min_tables
            ),
        )
        .with_detail("min_tables", package.min_tables)
        .with_detail("table_count", selection.table_count)
        .into());
    }
    Ok(Some(PricedPackage::new(
        package.id,
        package.name,
        selection.table_count,
        package.price_per_table,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_rounds_half_up() {
        assert_eq!(line_total(2.5, 33.33), 83.33);
        assert_eq!(line_total(1.0, 0.125), 0.13);
        assert_eq!(line_total(3.0, 0.1), 0.3);
    }

    #[test]
    fn test_dinner_total() {
        assert_eq!(dinner_total(888.0, 10), 8880.0);
        assert_eq!(dinner_total(1288.88, 3), 3866.64);
    }

    #[test]
    fn test_pricing_totals() {
        let items = vec![
            PricedItem::new(None, "Stage decoration".into(), 1.0, 1500.0),
            PricedItem::new(Some(4), "Chairs".into(), 200.0, 1.5),
        ];
        let package = PricedPackage::new(2, "Set A".into(), 10, 888.0);
        let pricing = Pricing::new(items, Some(package));

        assert_eq!(pricing.subtotal, 1800.0);
        assert_eq!(pricing.dinner_total, 8880.0);
        assert_eq!(pricing.total_amount, 10680.0);
    }

    #[test]
    fn test_pricing_without_package() {
        let pricing = Pricing::new(
            vec![PricedItem::new(None, "Lighting".into(), 3.0, 0.1)],
            None,
        );
        assert_eq!(pricing.subtotal, 0.3);
        assert_eq!(pricing.dinner_total, 0.0);
        assert_eq!(pricing.total_amount, 0.3);

        let empty = Pricing::new(Vec::new(), None);
        assert_eq!(empty.total_amount, 0.0);
    }

    #[test]
    fn test_balance() {
        assert_eq!(balance(10680.0, 3000.0), 7680.0);
        assert_eq!(balance(0.3, 0.1), 0.2);
        assert_eq!(round_money(10.0 / 3.0), 3.33);
    }

    #[test]
    fn test_sum_money() {
        assert_eq!(sum_money([0.1, 0.2]), 0.3);
        assert_eq!(sum_money([0.1; 10]), 1.0);
        assert_eq!(sum_money(Vec::new()), 0.0);
    }
}
