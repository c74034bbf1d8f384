//! Analytics over the full purchase/sell history
//!
//! Every computation here is a pure function over in-memory collections.
//! The service wrapper only loads rows and converts configuration; the
//! numbers fall out of the functions below, which makes them trivially
//! testable without a database.
//!
//! History rows may reference products or users that no longer exist.
//! Those rows still count toward totals and show up under sentinel names
//! ("Unknown Product", "Unknown Buyer") rather than being dropped.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Category, Product, Purchase, Sell, User};
use shared::types::{NameLookup, NameRef};

use crate::error::{AppError, AppResult};

const UNKNOWN_PRODUCT: &str = "Unknown Product";
const UNKNOWN_BUYER: &str = "Unknown Buyer";
const UNKNOWN_SELLER: &str = "Unknown Seller";

/// A product paired with an accumulated count (units sold or purchased).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductStat {
    pub product: String,
    pub count: i64,
}

/// A product paired with its accumulated profit.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductProfit {
    pub product: String,
    pub profit: Decimal,
}

/// A person paired with an accumulated money total.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PersonStat {
    pub name: String,
    pub total: Decimal,
}

/// A product paired with the money spent purchasing it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductSpend {
    pub product: String,
    pub total: Decimal,
}

/// Per-category rollup of the whole trade history.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: usize,
    /// Money paid out on purchases in this category.
    pub total_spent: Decimal,
    /// Money taken in on sells in this category.
    pub total_gained: Decimal,
    /// Cash-flow profit: gained minus spent. Can be negative while stock
    /// bought but not yet sold sits in inventory.
    pub profit: Decimal,
    /// Margin profit: per-unit sell price minus effective cost, summed over
    /// every sell.
    pub margin_profit: Decimal,
    pub top_sold_product: Option<ProductStat>,
    pub top_purchased_product: Option<ProductStat>,
    /// Three most profitable products by sell margin.
    pub profitable_products: Vec<ProductProfit>,
    pub big_buyer: Option<PersonStat>,
    pub big_seller: Option<PersonStat>,
    pub best_profit_person: Option<PersonStat>,
}

/// Effective per-unit cost of a product: quantity-weighted average purchase
/// price, falling back to `price * cost_ratio` for products with no
/// purchase history.
pub fn effective_cost(product: &Product, purchases: &[Purchase], cost_ratio: Decimal) -> Decimal {
    let mut total = Decimal::ZERO;
    let mut quantity = 0i64;
    for purchase in purchases.iter().filter(|p| p.product_id == product.id) {
        total += purchase.amount();
        quantity += purchase.quantity;
    }
    if quantity > 0 {
        total / Decimal::from(quantity)
    } else {
        product.price * cost_ratio
    }
}

/// Products ranked by units sold, descending. Ties keep the order in which
/// products first appear in the sell history.
pub fn top_sold_products(products: &[Product], sells: &[Sell], n: usize) -> Vec<ProductStat> {
    let lookup = product_lookup(products);
    let mut counts: Vec<(String, i64)> = Vec::new();
    for sell in sells {
        bump_count(&mut counts, product_name(&lookup, sell.product_id), sell.quantity);
    }
    rank_counts(counts, n)
}

/// Products ranked by total purchase spend, descending.
pub fn top_products_by_spend(
    products: &[Product],
    purchases: &[Purchase],
    n: usize,
) -> Vec<ProductSpend> {
    let lookup = product_lookup(products);
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for purchase in purchases {
        bump_total(
            &mut totals,
            product_name(&lookup, purchase.product_id),
            purchase.amount(),
        );
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
        .into_iter()
        .map(|(product, total)| ProductSpend { product, total })
        .collect()
}

/// Products ranked by units purchased, descending.
pub fn top_purchased_products(
    products: &[Product],
    purchases: &[Purchase],
    n: usize,
) -> Vec<ProductStat> {
    let lookup = product_lookup(products);
    let mut counts: Vec<(String, i64)> = Vec::new();
    for purchase in purchases {
        bump_count(
            &mut counts,
            product_name(&lookup, purchase.product_id),
            purchase.quantity,
        );
    }
    rank_counts(counts, n)
}

/// Buyers ranked by total money spent on purchases, descending.
pub fn top_buyers(users: &[User], purchases: &[Purchase], n: usize) -> Vec<PersonStat> {
    let lookup = user_lookup(users);
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for purchase in purchases {
        bump_total(
            &mut totals,
            person_name(&lookup, purchase.buyer_id, UNKNOWN_BUYER),
            purchase.amount(),
        );
    }
    rank_totals(totals, n)
}

/// Sellers ranked by total money taken in on sells, descending.
pub fn top_sellers(users: &[User], sells: &[Sell], n: usize) -> Vec<PersonStat> {
    let lookup = user_lookup(users);
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for sell in sells {
        bump_total(
            &mut totals,
            person_name(&lookup, sell.seller_id, UNKNOWN_SELLER),
            sell.amount(),
        );
    }
    rank_totals(totals, n)
}

/// Products ranked by sell-margin profit, descending. Only products that
/// actually appear in the sell history are ranked.
pub fn top_profitable_products(
    products: &[Product],
    purchases: &[Purchase],
    sells: &[Sell],
    cost_ratio: Decimal,
    n: usize,
) -> Vec<ProductProfit> {
    let lookup = product_lookup(products);
    let mut profits: Vec<(String, Decimal)> = Vec::new();
    for sell in sells {
        let cost = products
            .iter()
            .find(|p| p.id == sell.product_id)
            .map(|p| effective_cost(p, purchases, cost_ratio))
            .unwrap_or(Decimal::ZERO);
        bump_total(
            &mut profits,
            product_name(&lookup, sell.product_id),
            (sell.sell_price - cost) * Decimal::from(sell.quantity),
        );
    }
    profits.sort_by(|a, b| b.1.cmp(&a.1));
    profits.truncate(n);
    profits
        .into_iter()
        .map(|(product, profit)| ProductProfit { product, profit })
        .collect()
}

/// Full rollup for one category. Products belong to the category by id, or
/// by denormalized category name when no id was ever recorded.
pub fn category_summary(
    category: &Category,
    products: &[Product],
    purchases: &[Purchase],
    sells: &[Sell],
    users: &[User],
    cost_ratio: Decimal,
) -> CategorySummary {
    let members: Vec<&Product> = products
        .iter()
        .filter(|p| in_category(p, category))
        .collect();

    let purchases: Vec<Purchase> = purchases
        .iter()
        .filter(|p| members.iter().any(|m| m.id == p.product_id))
        .cloned()
        .collect();
    let sells: Vec<Sell> = sells
        .iter()
        .filter(|s| members.iter().any(|m| m.id == s.product_id))
        .cloned()
        .collect();

    let total_spent: Decimal = purchases.iter().map(Purchase::amount).sum();
    let total_gained: Decimal = sells.iter().map(Sell::amount).sum();

    let margin_profit: Decimal = sells
        .iter()
        .map(|sell| {
            let cost = members
                .iter()
                .find(|p| p.id == sell.product_id)
                .map(|p| effective_cost(p, &purchases, cost_ratio))
                .unwrap_or(Decimal::ZERO);
            (sell.sell_price - cost) * Decimal::from(sell.quantity)
        })
        .sum();

    let member_products: Vec<Product> = members.iter().map(|p| (*p).clone()).collect();
    let user_names = user_lookup(users);

    let mut seller_margins: Vec<(String, Decimal)> = Vec::new();
    for sell in &sells {
        let cost = members
            .iter()
            .find(|p| p.id == sell.product_id)
            .map(|p| effective_cost(p, &purchases, cost_ratio))
            .unwrap_or(Decimal::ZERO);
        bump_total(
            &mut seller_margins,
            person_name(&user_names, sell.seller_id, UNKNOWN_SELLER),
            (sell.sell_price - cost) * Decimal::from(sell.quantity),
        );
    }

    CategorySummary {
        category: category.name.clone(),
        product_count: members.len(),
        total_spent,
        total_gained,
        profit: total_gained - total_spent,
        margin_profit,
        top_sold_product: top_sold_products(&member_products, &sells, 1).into_iter().next(),
        top_purchased_product: top_purchased_products(&member_products, &purchases, 1)
            .into_iter()
            .next(),
        profitable_products: top_profitable_products(
            &member_products,
            &purchases,
            &sells,
            cost_ratio,
            3,
        ),
        big_buyer: top_buyers(users, &purchases, 1).into_iter().next(),
        big_seller: top_sellers(users, &sells, 1).into_iter().next(),
        best_profit_person: rank_totals(seller_margins, 1).into_iter().next(),
    }
}

fn in_category(product: &Product, category: &Category) -> bool {
    match product.category_id {
        Some(id) => id == category.id,
        None => product
            .category_name
            .as_deref()
            .is_some_and(|name| name == category.name),
    }
}

fn product_lookup(products: &[Product]) -> NameLookup {
    products.iter().map(|p| (p.id, p.name.clone())).collect()
}

fn user_lookup(users: &[User]) -> NameLookup {
    users.iter().map(|u| (u.id, u.display_name())).collect()
}

fn product_name(lookup: &NameLookup, id: Uuid) -> String {
    NameRef::resolve_with(Some(id), None, lookup)
        .display_or(UNKNOWN_PRODUCT)
        .to_string()
}

fn person_name(lookup: &NameLookup, id: Uuid, sentinel: &str) -> String {
    NameRef::resolve_with(Some(id), None, lookup)
        .display_or(sentinel)
        .to_string()
}

/// Add to a keyed count, keeping first-appearance order for new keys.
fn bump_count(counts: &mut Vec<(String, i64)>, key: String, amount: i64) {
    match counts.iter_mut().find(|(k, _)| *k == key) {
        Some((_, total)) => *total += amount,
        None => counts.push((key, amount)),
    }
}

/// Add to a keyed money total, keeping first-appearance order for new keys.
fn bump_total(totals: &mut Vec<(String, Decimal)>, key: String, amount: Decimal) {
    match totals.iter_mut().find(|(k, _)| *k == key) {
        Some((_, total)) => *total += amount,
        None => totals.push((key, amount)),
    }
}

fn rank_counts(mut counts: Vec<(String, i64)>, n: usize) -> Vec<ProductStat> {
    // Stable sort: ties keep first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
        .into_iter()
        .map(|(product, count)| ProductStat { product, count })
        .collect()
}

fn rank_totals(mut totals: Vec<(String, Decimal)>, n: usize) -> Vec<PersonStat> {
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
        .into_iter()
        .map(|(name, total)| PersonStat { name, total })
        .collect()
}

/// Database-backed wrapper around the pure analytics functions.
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
    cost_ratio: Decimal,
}

impl AnalyticsService {
    pub fn new(db: PgPool, assumed_cost_ratio: f64) -> Self {
        let cost_ratio =
            Decimal::from_f64_retain(assumed_cost_ratio).unwrap_or_else(|| Decimal::new(75, 2));
        Self { db, cost_ratio }
    }

    /// Top-list overview across the whole history.
    pub async fn overview(&self, limit: usize) -> AppResult<AnalyticsOverview> {
        let (products, purchases, sells, users) = self.load_collections().await?;
        Ok(AnalyticsOverview {
            top_products: top_products_by_spend(&products, &purchases, limit),
            top_sold_products: top_sold_products(&products, &sells, limit),
            top_purchased_products: top_purchased_products(&products, &purchases, limit),
            top_buyers: top_buyers(&users, &purchases, limit),
            top_sellers: top_sellers(&users, &sells, limit),
            top_profitable_products: top_profitable_products(
                &products,
                &purchases,
                &sells,
                self.cost_ratio,
                limit,
            ),
        })
    }

    /// Rollup for a single category addressed by name.
    pub async fn category_by_name(&self, name: &str) -> AppResult<CategorySummary> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at, updated_at \
             FROM categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        let (products, purchases, sells, users) = self.load_collections().await?;
        Ok(category_summary(
            &category,
            &products,
            &purchases,
            &sells,
            &users,
            self.cost_ratio,
        ))
    }

    /// Products ranked by total purchase spend.
    pub async fn top_products(&self, n: usize) -> AppResult<Vec<ProductSpend>> {
        let (products, purchases, _, _) = self.load_collections().await?;
        Ok(top_products_by_spend(&products, &purchases, n))
    }

    /// Buyers ranked by total spend.
    pub async fn biggest_buyers(&self, n: usize) -> AppResult<Vec<PersonStat>> {
        let (_, purchases, _, users) = self.load_collections().await?;
        Ok(top_buyers(&users, &purchases, n))
    }

    /// Sellers ranked by total take.
    pub async fn biggest_sellers(&self, n: usize) -> AppResult<Vec<PersonStat>> {
        let (_, _, sells, users) = self.load_collections().await?;
        Ok(top_sellers(&users, &sells, n))
    }

    /// Products ranked by sell-margin profit.
    pub async fn most_profitable_products(&self, n: usize) -> AppResult<Vec<ProductProfit>> {
        let (products, purchases, sells, _) = self.load_collections().await?;
        Ok(top_profitable_products(
            &products,
            &purchases,
            &sells,
            self.cost_ratio,
            n,
        ))
    }

    /// Rollups for every category, in category name order.
    pub async fn category_summaries(&self) -> AppResult<Vec<CategorySummary>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at, updated_at \
             FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let (products, purchases, sells, users) = self.load_collections().await?;
        Ok(categories
            .iter()
            .map(|c| category_summary(c, &products, &purchases, &sells, &users, self.cost_ratio))
            .collect())
    }

    async fn load_collections(
        &self,
    ) -> AppResult<(Vec<Product>, Vec<Purchase>, Vec<Sell>, Vec<User>)> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, category_id, brand_id, category_name, price, quantity, created_at, updated_at \
             FROM products ORDER BY created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT id, product_id, firm_id, buyer_id, recorded_by, quantity, purchase_price, created_at, updated_at \
             FROM purchases ORDER BY created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let sells = sqlx::query_as::<_, Sell>(
            "SELECT id, product_id, seller_id, recorded_by, quantity, sell_price, created_at, updated_at \
             FROM sells ORDER BY created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, first_name, last_name, is_active, created_at, updated_at \
             FROM users ORDER BY created_at ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok((products, purchases, sells, users))
    }
}

/// Overview payload returned by the analytics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub top_products: Vec<ProductSpend>,
    pub top_sold_products: Vec<ProductStat>,
    pub top_purchased_products: Vec<ProductStat>,
    pub top_buyers: Vec<PersonStat>,
    pub top_sellers: Vec<PersonStat>,
    pub top_profitable_products: Vec<ProductProfit>,
}
