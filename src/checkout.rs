//! Order pricing and stock validation.
//!
//! Both repository implementations call [`price_order`] after loading (and, in
//! Postgres, locking) the products referenced by an order, so the checks and
//! the total are computed against the same snapshot the writes are based on.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{OrderLine, Product},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total: i64,
}

/// Lines naming the same product are folded into one, keeping first-seen order.
pub fn merge_lines(lines: &[OrderLine]) -> AppResult<Vec<OrderLine>> {
    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::BadRequest(
                "Quantity must be greater than 0".into(),
            ));
        }
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| AppError::BadRequest("Quantity is too large".into()))?;
            }
            None => merged.push(*line),
        }
    }
    Ok(merged)
}

pub fn price_order(lines: &[OrderLine], products: &HashMap<Uuid, Product>) -> AppResult<PricedOrder> {
    if lines.is_empty() {
        return Err(AppError::BadRequest(
            "An order must contain at least one product".into(),
        ));
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut total: i64 = 0;
    for line in merge_lines(lines)? {
        let product = products.get(&line.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("Product {} not found", line.product_id))
        })?;

        if product.stock < line.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {} (available: {})",
                product.name, product.stock
            )));
        }

        let line_total = product
            .price
            .checked_mul(i64::from(line.quantity))
            .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;

        priced.push(PricedLine {
            product_id: product.id,
            quantity: line.quantity,
            unit_price: product.price,
        });
    }

    Ok(PricedOrder {
        lines: priced,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: i64, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: format!("product-{price}"),
            description: None,
            price,
            stock,
            image_url: None,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog(products: &[Product]) -> HashMap<Uuid, Product> {
        products.iter().map(|p| (p.id, p.clone())).collect()
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let cream = product(2999, 50);
        let serum = product(4999, 30);
        let lines = [
            OrderLine { product_id: cream.id, quantity: 2 },
            OrderLine { product_id: serum.id, quantity: 1 },
        ];

        let priced = price_order(&lines, &catalog(&[cream.clone(), serum])).unwrap();
        assert_eq!(priced.total, 2 * 2999 + 4999);
        assert_eq!(priced.lines[0].unit_price, cream.price);
    }

    #[test]
    fn duplicate_lines_are_merged_before_the_stock_check() {
        let gel = product(1599, 3);
        let lines = [
            OrderLine { product_id: gel.id, quantity: 2 },
            OrderLine { product_id: gel.id, quantity: 2 },
        ];

        let err = price_order(&lines, &catalog(&[gel])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("Insufficient stock")));
    }

    #[test]
    fn missing_product_is_rejected() {
        let lines = [OrderLine { product_id: Uuid::new_v4(), quantity: 1 }];
        let err = price_order(&lines, &HashMap::new()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("not found")));
    }

    #[test]
    fn empty_and_non_positive_orders_are_rejected() {
        assert!(price_order(&[], &HashMap::new()).is_err());

        let shampoo = product(1999, 10);
        let lines = [OrderLine { product_id: shampoo.id, quantity: 0 }];
        assert!(price_order(&lines, &catalog(&[shampoo])).is_err());
    }

    #[test]
    fn exact_stock_is_allowed() {
        let lotion = product(2499, 4);
        let lines = [OrderLine { product_id: lotion.id, quantity: 4 }];
        let priced = price_order(&lines, &catalog(&[lotion])).unwrap();
        assert_eq!(priced.total, 4 * 2499);
    }
}
