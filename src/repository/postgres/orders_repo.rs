use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LockType},
};
use uuid::Uuid;

use super::{PgRepository, order_from_entity, order_item_from_entity, product_from_entity};
use crate::{
    checkout::price_order,
    entity::{
        OrderItems, Orders, Products,
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel},
        products::Column as ProdCol,
    },
    error::{AppError, AppResult},
    models::{
        OrderDetails, OrderFilter, OrderItemDetails, OrderLine, OrderStatus, Page, Product,
        SortOrder,
    },
    repository::OrderRepository,
};

/// Attach items (with their products) to each order, preserving input order.
async fn load_details<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderDetails>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items: HashMap<Uuid, Vec<OrderItemDetails>> = HashMap::new();

    if !ids.is_empty() {
        let rows = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(ids))
            .find_also_related(Products)
            .all(conn)
            .await?;

        for (item, product) in rows {
            let product = product.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "order item {} references a missing product",
                    item.id
                ))
            })?;
            items
                .entry(item.order_id)
                .or_default()
                .push(OrderItemDetails {
                    item: order_item_from_entity(item),
                    product: product_from_entity(product),
                });
        }
    }

    orders
        .into_iter()
        .map(|model| {
            let items = items.remove(&model.id).unwrap_or_default();
            Ok(OrderDetails {
                order: order_from_entity(model)?,
                items,
            })
        })
        .collect()
}

#[async_trait]
impl OrderRepository for PgRepository {
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLine]) -> AppResult<OrderDetails> {
        let mut product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        let txn = self.db.begin().await?;

        // Locks are taken in id order so concurrent orders cannot deadlock.
        let catalog: HashMap<Uuid, Product> = Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .order_by_asc(ProdCol::Id)
            .lock(LockType::Update)
            .all(&txn)
            .await?
            .into_iter()
            .map(|model| (model.id, product_from_entity(model)))
            .collect();

        // An early return drops `txn`, which rolls it back.
        let priced = price_order(lines, &catalog)?;

        let now = Utc::now();
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            order_date: Set(now.into()),
            total_amount: Set(priced.total),
            status: Set(OrderStatus::Pending.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        for line in &priced.lines {
            OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                price: Set(line.unit_price),
            }
            .insert(&txn)
            .await?;

            Products::update_many()
                .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(line.quantity))
                .col_expr(ProdCol::UpdatedAt, Expr::value(now))
                .filter(ProdCol::Id.eq(line.product_id))
                .exec(&txn)
                .await?;
        }

        let mut placed = load_details(&txn, vec![order]).await?;
        txn.commit().await?;

        placed
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("placed order was not reloaded")))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OrderDetails>> {
        let Some(order) = Orders::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(load_details(&self.db, vec![order]).await?.pop())
    }

    async fn list(&self, filter: &OrderFilter, page: Page) -> AppResult<(Vec<OrderDetails>, u64)> {
        let mut condition = Condition::all();
        if let Some(user_id) = filter.user_id {
            condition = condition.add(OrderCol::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(OrderCol::Status.eq(status.as_str()));
        }

        let mut finder = Orders::find().filter(condition);
        finder = match filter.sort_order {
            SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
            SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
        };

        let total = finder.clone().count(&self.db).await?;

        let orders = finder
            .order_by_asc(OrderCol::Id)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok((load_details(&self.db, orders).await?, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Option<OrderDetails>> {
        let updated = OrderActive {
            id: Unchanged(id),
            user_id: NotSet,
            order_date: NotSet,
            total_amount: NotSet,
            status: Set(status.to_string()),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await;

        let order = match updated {
            Ok(order) => order,
            Err(sea_orm::DbErr::RecordNotUpdated) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(load_details(&self.db, vec![order]).await?.pop())
    }
}
