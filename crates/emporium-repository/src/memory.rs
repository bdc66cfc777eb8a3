//! In-memory implementation of every store trait.
//!
//! Mirrors the schema's cascades (deleting a user removes its addresses,
//! cart items and orders; deleting an order removes its items; deleting a
//! product removes the cart items holding it) and reports the removed rows
//! the way the PostgreSQL stores do. Product references to the catalog tree
//! are checked. Other references are not.

use crate::traits::{
    AddressRepository, CartItemRepository, CategoryRepository, OrderItemRepository,
    OrderRepository, ProductRepository, RemovedOrder, RemovedProduct, RemovedUser,
    UserRepository,
};
use async_trait::async_trait;
use emporium_core::{
    Address, AddressId, CartItem, CartItemId, Category, CategoryId, EmporiumError, EmporiumResult,
    NewAddress, NewCartItem, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderId,
    OrderItem, OrderItemId, Product, ProductId, SubCategory, SubCategoryId, User, UserId,
    UserProfile,
};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    next_id: i64,
    categories: BTreeMap<CategoryId, Category>,
    sub_categories: BTreeMap<SubCategoryId, SubCategory>,
    products: BTreeMap<ProductId, Product>,
    hero: BTreeSet<ProductId>,
    category_hero: BTreeSet<(CategoryId, ProductId)>,
    users: BTreeMap<UserId, User>,
    addresses: BTreeMap<AddressId, Address>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_catalog_refs(&self, product: &NewProduct) -> EmporiumResult<()> {
        let known = self.categories.contains_key(&product.category_id)
            && self.sub_categories.contains_key(&product.sub_category_id);
        if known {
            Ok(())
        } else {
            Err(EmporiumError::validation(format!(
                "reference between records violated: category {} / sub-category {}",
                product.category_id, product.sub_category_id
            )))
        }
    }

    fn remove_order(&mut self, id: &OrderId) -> Option<RemovedOrder> {
        let order = self.orders.remove(id)?;
        let item_ids: Vec<OrderItemId> = self
            .order_items
            .values()
            .filter(|item| &item.order_id == id)
            .map(|item| item.id)
            .collect();
        for item_id in &item_ids {
            self.order_items.remove(item_id);
        }
        Some(RemovedOrder { order, item_ids })
    }
}

/// Process-local stand-in for PostgreSQL.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    operations: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store with no catalog tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the same categories and sub-categories
    /// as the database migrations.
    #[must_use]
    pub fn with_catalog() -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock();
            for (id, name) in [(1, "Men"), (2, "Women"), (3, "Kids")] {
                tables.categories.insert(
                    CategoryId::new(id),
                    Category {
                        id: CategoryId::new(id),
                        name: name.to_string(),
                        description: String::new(),
                        offered: true,
                    },
                );
            }
            let subs = [
                (1, "Shirts", 1),
                (2, "Trousers", 1),
                (3, "Jackets", 1),
                (4, "Dresses", 2),
                (5, "Skirts", 2),
                (6, "Blouses", 2),
                (7, "Shoes", 2),
                (8, "Tops", 3),
                (9, "Bottoms", 3),
                (10, "Sleepwear", 3),
            ];
            for (id, name, category) in subs {
                tables.sub_categories.insert(
                    SubCategoryId::new(id),
                    SubCategory {
                        id: SubCategoryId::new(id),
                        name: name.to_string(),
                        description: String::new(),
                        category_id: CategoryId::new(category),
                        offered: true,
                    },
                );
            }
        }
        store
    }

    /// Number of store calls made so far, failed ones included.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Makes every following call fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Features a product on the landing page, or on a category page.
    pub fn mark_hero(&self, product_id: ProductId, category_id: Option<CategoryId>) {
        let mut tables = self.tables.lock();
        match category_id {
            Some(category_id) => {
                tables.category_hero.insert((category_id, product_id));
            }
            None => {
                tables.hero.insert(product_id);
            }
        }
    }

    fn tables(&self) -> EmporiumResult<MutexGuard<'_, Tables>> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EmporiumError::Database("connection refused".to_string()));
        }
        Ok(self.tables.lock())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("operations", &self.operation_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CartItemRepository for InMemoryStore {
    async fn find_by_id(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>> {
        Ok(self.tables()?.cart_items.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<CartItem>> {
        let tables = self.tables()?;
        Ok(tables
            .cart_items
            .values()
            .filter(|item| &item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: &NewCartItem) -> EmporiumResult<CartItem> {
        let mut tables = self.tables()?;
        let id = CartItemId::new(tables.next_id());
        let item = CartItem::from_new(id, fields.clone());
        tables.cart_items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        id: CartItemId,
        fields: &NewCartItem,
    ) -> EmporiumResult<Option<CartItem>> {
        let mut tables = self.tables()?;
        let Some(slot) = tables.cart_items.get_mut(&id) else {
            return Ok(None);
        };
        let previous = std::mem::replace(slot, CartItem::from_new(id, fields.clone()));
        Ok(Some(previous))
    }

    async fn delete(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>> {
        Ok(self.tables()?.cart_items.remove(&id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_id(&self, id: &OrderId) -> EmporiumResult<Option<Order>> {
        Ok(self.tables()?.orders.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Order>> {
        let tables = self.tables()?;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| &order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn insert(&self, fields: &NewOrder) -> EmporiumResult<Order> {
        let created_at = fields.created_at_utc()?;
        let mut tables = self.tables()?;
        let order = Order {
            id: OrderId::new(Uuid::new_v4().to_string()),
            user_id: fields.user_id.clone(),
            address_id: fields.address_id,
            total_price: fields.total_price,
            created_at,
            status: fields.status.clone(),
        };
        tables.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn update(&self, id: &OrderId, fields: &NewOrder) -> EmporiumResult<Option<Order>> {
        let created_at = fields.created_at_utc()?;
        let mut tables = self.tables()?;
        let Some(slot) = tables.orders.get_mut(id) else {
            return Ok(None);
        };
        let replacement = Order {
            id: id.clone(),
            user_id: fields.user_id.clone(),
            address_id: fields.address_id,
            total_price: fields.total_price,
            created_at,
            status: fields.status.clone(),
        };
        Ok(Some(std::mem::replace(slot, replacement)))
    }

    async fn delete(&self, id: &OrderId) -> EmporiumResult<Option<RemovedOrder>> {
        Ok(self.tables()?.remove_order(id))
    }
}

#[async_trait]
impl OrderItemRepository for InMemoryStore {
    async fn find_by_id(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>> {
        Ok(self.tables()?.order_items.get(&id).cloned())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> EmporiumResult<Vec<OrderItem>> {
        let tables = self.tables()?;
        Ok(tables
            .order_items
            .values()
            .filter(|item| &item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: &NewOrderItem) -> EmporiumResult<OrderItem> {
        let mut tables = self.tables()?;
        let id = OrderItemId::new(tables.next_id());
        let item = OrderItem::from_new(id, fields.clone());
        tables.order_items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        id: OrderItemId,
        fields: &NewOrderItem,
    ) -> EmporiumResult<Option<OrderItem>> {
        let mut tables = self.tables()?;
        let Some(slot) = tables.order_items.get_mut(&id) else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(slot, OrderItem::from_new(id, fields.clone()))))
    }

    async fn delete(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>> {
        Ok(self.tables()?.order_items.remove(&id))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: ProductId) -> EmporiumResult<Option<Product>> {
        Ok(self.tables()?.products.get(&id).cloned())
    }

    async fn find_all(&self) -> EmporiumResult<Vec<Product>> {
        Ok(self.tables()?.products.values().cloned().collect())
    }

    async fn find_by_category(&self, category_id: CategoryId) -> EmporiumResult<Vec<Product>> {
        let tables = self.tables()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_by_sub_category(
        &self,
        sub_category_id: SubCategoryId,
    ) -> EmporiumResult<Vec<Product>> {
        let tables = self.tables()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.sub_category_id == sub_category_id)
            .cloned()
            .collect())
    }

    async fn find_hero(&self) -> EmporiumResult<Vec<Product>> {
        let tables = self.tables()?;
        Ok(tables
            .hero
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }

    async fn find_hero_by_category(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Vec<Product>> {
        let tables = self.tables()?;
        Ok(tables
            .category_hero
            .iter()
            .filter(|(category, _)| *category == category_id)
            .filter_map(|(_, id)| tables.products.get(id).cloned())
            .collect())
    }

    async fn search(&self, query: &str) -> EmporiumResult<Vec<Product>> {
        let needle = query.to_lowercase();
        let tables = self.tables()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: &NewProduct) -> EmporiumResult<Product> {
        let mut tables = self.tables()?;
        tables.check_catalog_refs(fields)?;
        let id = ProductId::new(tables.next_id());
        let product = Product::from_new(id, fields.clone());
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn insert_many(&self, products: &[NewProduct]) -> EmporiumResult<Vec<Product>> {
        let mut tables = self.tables()?;
        for fields in products {
            tables.check_catalog_refs(fields)?;
        }
        let mut created = Vec::with_capacity(products.len());
        for fields in products {
            let id = ProductId::new(tables.next_id());
            let product = Product::from_new(id, fields.clone());
            tables.products.insert(id, product.clone());
            created.push(product);
        }
        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        fields: &NewProduct,
    ) -> EmporiumResult<Option<Product>> {
        let mut tables = self.tables()?;
        tables.check_catalog_refs(fields)?;
        let Some(slot) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(slot, Product::from_new(id, fields.clone()))))
    }

    async fn delete(&self, id: ProductId) -> EmporiumResult<Option<RemovedProduct>> {
        let mut tables = self.tables()?;
        let Some(product) = tables.products.remove(&id) else {
            return Ok(None);
        };
        tables.hero.remove(&id);
        tables.category_hero.retain(|(_, product)| *product != id);
        let cart_items: Vec<(CartItemId, UserId)> = tables
            .cart_items
            .values()
            .filter(|item| item.product_id == id)
            .map(|item| (item.id, item.user_id.clone()))
            .collect();
        for (item_id, _) in &cart_items {
            tables.cart_items.remove(item_id);
        }
        Ok(Some(RemovedProduct {
            product,
            cart_items,
        }))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_category(&self, id: CategoryId) -> EmporiumResult<Option<Category>> {
        Ok(self.tables()?.categories.get(&id).cloned())
    }

    async fn find_all_categories(&self) -> EmporiumResult<Vec<Category>> {
        Ok(self.tables()?.categories.values().cloned().collect())
    }

    async fn find_sub_category(&self, id: SubCategoryId) -> EmporiumResult<Option<SubCategory>> {
        Ok(self.tables()?.sub_categories.get(&id).cloned())
    }

    async fn find_all_sub_categories(&self) -> EmporiumResult<Vec<SubCategory>> {
        Ok(self.tables()?.sub_categories.values().cloned().collect())
    }

    async fn find_sub_categories_by_category(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Vec<SubCategory>> {
        let tables = self.tables()?;
        Ok(tables
            .sub_categories
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> EmporiumResult<Option<User>> {
        Ok(self.tables()?.users.get(id).cloned())
    }

    async fn find_all(&self) -> EmporiumResult<Vec<User>> {
        Ok(self.tables()?.users.values().cloned().collect())
    }

    async fn insert(&self, user: &NewUser) -> EmporiumResult<User> {
        let mut tables = self.tables()?;
        if tables.users.contains_key(&user.id) {
            return Err(EmporiumError::conflict(format!("user {} already exists", user.id)));
        }
        let created = User::from(user.clone());
        tables.users.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, id: &UserId, profile: &UserProfile) -> EmporiumResult<Option<User>> {
        let mut tables = self.tables()?;
        let Some(slot) = tables.users.get_mut(id) else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(
            slot,
            User::with_profile(id.clone(), profile.clone()),
        )))
    }

    async fn delete(&self, id: &UserId) -> EmporiumResult<Option<RemovedUser>> {
        let mut tables = self.tables()?;
        let Some(user) = tables.users.remove(id) else {
            return Ok(None);
        };

        let address_ids: Vec<AddressId> = tables
            .addresses
            .values()
            .filter(|address| &address.user_id == id)
            .map(|address| address.id)
            .collect();
        for address_id in &address_ids {
            tables.addresses.remove(address_id);
        }

        let cart_item_ids: Vec<CartItemId> = tables
            .cart_items
            .values()
            .filter(|item| &item.user_id == id)
            .map(|item| item.id)
            .collect();
        for item_id in &cart_item_ids {
            tables.cart_items.remove(item_id);
        }

        let order_ids: Vec<OrderId> = tables
            .orders
            .values()
            .filter(|order| &order.user_id == id)
            .map(|order| order.id.clone())
            .collect();
        let orders = order_ids
            .iter()
            .filter_map(|order_id| tables.remove_order(order_id))
            .collect();

        Ok(Some(RemovedUser {
            user,
            address_ids,
            cart_item_ids,
            orders,
        }))
    }
}

#[async_trait]
impl AddressRepository for InMemoryStore {
    async fn find_by_id(&self, id: AddressId) -> EmporiumResult<Option<Address>> {
        Ok(self.tables()?.addresses.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Address>> {
        let tables = self.tables()?;
        Ok(tables
            .addresses
            .values()
            .filter(|address| &address.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: &NewAddress) -> EmporiumResult<Address> {
        let mut tables = self.tables()?;
        let id = AddressId::new(tables.next_id());
        let address = Address::from_new(id, fields.clone());
        tables.addresses.insert(id, address.clone());
        Ok(address)
    }

    async fn update(
        &self,
        id: AddressId,
        fields: &NewAddress,
    ) -> EmporiumResult<Option<Address>> {
        let mut tables = self.tables()?;
        let Some(slot) = tables.addresses.get_mut(&id) else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(slot, Address::from_new(id, fields.clone()))))
    }

    async fn delete(&self, id: AddressId) -> EmporiumResult<Option<Address>> {
        Ok(self.tables()?.addresses.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, category: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            category_id: CategoryId::new(category),
            sub_category_id: SubCategoryId::new(1),
            image_url: "https://cdn.example.com/p.png".to_string(),
            price: 1000,
            previous_price: 0,
            offered: false,
        }
    }

    fn new_order(user: &str, created_at: &str) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user),
            address_id: AddressId::new(1),
            total_price: 500,
            created_at: created_at.to_string(),
            status: "pending".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_returns_previous_row() {
        let store = InMemoryStore::new();
        let fields = NewCartItem {
            product_id: ProductId::new(1),
            quantity: 1,
            user_id: UserId::new("alice"),
        };
        let item = CartItemRepository::insert(&store, &fields).await.unwrap();

        let moved = NewCartItem {
            user_id: UserId::new("bob"),
            ..fields
        };
        let previous = CartItemRepository::update(&store, item.id, &moved).await.unwrap();
        assert_eq!(previous.unwrap().user_id, UserId::new("alice"));

        let current = CartItemRepository::find_by_id(&store, item.id).await.unwrap();
        assert_eq!(current.unwrap().user_id, UserId::new("bob"));

        let missing = CartItemRepository::update(&store, CartItemId::new(99), &moved)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let store = InMemoryStore::with_catalog();
        let batch = vec![new_product("Shirt", 1), new_product("Ghost", 99)];

        let err = store.insert_many(&batch).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(ProductRepository::find_all(&store).await.unwrap().is_empty());

        let created = store
            .insert_many(&[new_product("Shirt", 1), new_product("Dress", 2)])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
    }

    #[tokio::test]
    async fn test_search_and_hero_views() {
        let store = InMemoryStore::with_catalog();
        let shirt = ProductRepository::insert(&store, &new_product("Linen Shirt", 1))
            .await
            .unwrap();
        let dress = ProductRepository::insert(&store, &new_product("Summer dress", 2))
            .await
            .unwrap();
        store.mark_hero(shirt.id, None);
        store.mark_hero(dress.id, Some(CategoryId::new(2)));

        assert_eq!(store.search("shirt").await.unwrap(), vec![shirt.clone()]);
        assert_eq!(store.find_hero().await.unwrap(), vec![shirt]);
        assert_eq!(
            store.find_hero_by_category(CategoryId::new(2)).await.unwrap(),
            vec![dress]
        );
    }

    #[tokio::test]
    async fn test_orders_sorted_by_creation_time() {
        let store = InMemoryStore::new();
        let later = OrderRepository::insert(&store, &new_order("alice", "2024-06-01T00:00:00Z"))
            .await
            .unwrap();
        let earlier = OrderRepository::insert(&store, &new_order("alice", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();
        OrderRepository::insert(&store, &new_order("bob", "2024-03-01T00:00:00Z"))
            .await
            .unwrap();

        let ids: Vec<OrderId> = OrderRepository::find_by_user(&store, &UserId::new("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![earlier.id, later.id]);
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let store = InMemoryStore::new();
        let alice = UserId::new("alice");
        UserRepository::insert(
            &store,
            &NewUser {
                id: alice.clone(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        let order = OrderRepository::insert(&store, &new_order("alice", "2024-01-01T00:00:00Z"))
            .await
            .unwrap();
        OrderItemRepository::insert(
            &store,
            &NewOrderItem {
                order_id: order.id.clone(),
                product_id: ProductId::new(1),
                quantity: 2,
            },
        )
        .await
        .unwrap();

        let removed = UserRepository::delete(&store, &alice).await.unwrap().unwrap();
        assert_eq!(removed.orders.len(), 1);
        assert_eq!(removed.orders[0].order.id, order.id);
        assert_eq!(removed.orders[0].item_ids.len(), 1);
        assert!(OrderRepository::find_by_user(&store, &alice).await.unwrap().is_empty());
        assert!(store.find_by_order(&order.id).await.unwrap().is_empty());
        assert!(UserRepository::delete(&store, &alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_delete_reports_cart_rows() {
        let store = InMemoryStore::with_catalog();
        let product = ProductRepository::insert(&store, &new_product("Scarf", 2))
            .await
            .unwrap();
        let other = ProductRepository::insert(&store, &new_product("Hat", 1))
            .await
            .unwrap();
        let mut held = Vec::new();
        for (product_id, user) in [(product.id, "alice"), (other.id, "alice"), (product.id, "bob")] {
            let item = CartItemRepository::insert(
                &store,
                &NewCartItem {
                    product_id,
                    quantity: 1,
                    user_id: UserId::new(user),
                },
            )
            .await
            .unwrap();
            if product_id == product.id {
                held.push((item.id, item.user_id));
            }
        }

        let removed = ProductRepository::delete(&store, product.id).await.unwrap().unwrap();
        assert_eq!(removed.product, product);
        assert_eq!(removed.cart_items, held);
        assert_eq!(
            CartItemRepository::find_by_user(&store, &UserId::new("alice"))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(ProductRepository::delete(&store, product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_conflicts() {
        let store = InMemoryStore::new();
        let user = NewUser {
            id: UserId::new("alice"),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
        };
        UserRepository::insert(&store, &user).await.unwrap();
        let err = UserRepository::insert(&store, &user).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_counts() {
        let store = InMemoryStore::with_catalog();
        store.set_unavailable(true);
        let err = store.find_all_categories().await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(store.operation_count(), 1);

        store.set_unavailable(false);
        assert_eq!(store.find_all_categories().await.unwrap().len(), 3);
        assert_eq!(store.operation_count(), 2);
    }
}
