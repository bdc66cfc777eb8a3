//! Entity store trait definitions.
//!
//! Implementations receive input that has already passed validation.

use async_trait::async_trait;
use emporium_core::{
    Address, AddressId, CartItem, CartItemId, Category, CategoryId, EmporiumResult, Interface,
    NewAddress, NewCartItem, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderId,
    OrderItem, OrderItemId, Product, ProductId, SubCategory, SubCategoryId, User, UserId,
    UserProfile,
};

/// An order and the item rows removed with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedOrder {
    pub order: Order,
    pub item_ids: Vec<OrderItemId>,
}

/// A product and the cart rows that held it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedProduct {
    pub product: Product,
    pub cart_items: Vec<(CartItemId, UserId)>,
}

/// A user and every row that belonged to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedUser {
    pub user: User,
    pub address_ids: Vec<AddressId>,
    pub cart_item_ids: Vec<CartItemId>,
    pub orders: Vec<RemovedOrder>,
}

/// Cart item store.
#[async_trait]
pub trait CartItemRepository: Interface + Send + Sync {
    /// Finds a cart item by ID.
    async fn find_by_id(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>>;

    /// Finds every cart item of a user.
    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<CartItem>>;

    /// Inserts a cart item and returns it with its new ID.
    async fn insert(&self, fields: &NewCartItem) -> EmporiumResult<CartItem>;

    /// Replaces a cart item, returning the row as it was before.
    ///
    /// Returns `None` when no row has this ID.
    async fn update(&self, id: CartItemId, fields: &NewCartItem)
        -> EmporiumResult<Option<CartItem>>;

    /// Deletes a cart item, returning the removed row if there was one.
    async fn delete(&self, id: CartItemId) -> EmporiumResult<Option<CartItem>>;
}

/// Order store.
#[async_trait]
pub trait OrderRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> EmporiumResult<Option<Order>>;

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Order>>;

    /// Inserts an order under a freshly generated ID.
    async fn insert(&self, fields: &NewOrder) -> EmporiumResult<Order>;

    /// Replaces an order, returning the row as it was before.
    async fn update(&self, id: &OrderId, fields: &NewOrder) -> EmporiumResult<Option<Order>>;

    /// Deletes an order together with its items.
    async fn delete(&self, id: &OrderId) -> EmporiumResult<Option<RemovedOrder>>;
}

/// Order item store.
#[async_trait]
pub trait OrderItemRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>>;

    async fn find_by_order(&self, order_id: &OrderId) -> EmporiumResult<Vec<OrderItem>>;

    async fn insert(&self, fields: &NewOrderItem) -> EmporiumResult<OrderItem>;

    async fn update(
        &self,
        id: OrderItemId,
        fields: &NewOrderItem,
    ) -> EmporiumResult<Option<OrderItem>>;

    async fn delete(&self, id: OrderItemId) -> EmporiumResult<Option<OrderItem>>;
}

/// Product store, including the hero and search views.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> EmporiumResult<Option<Product>>;

    async fn find_all(&self) -> EmporiumResult<Vec<Product>>;

    async fn find_by_category(&self, category_id: CategoryId) -> EmporiumResult<Vec<Product>>;

    async fn find_by_sub_category(
        &self,
        sub_category_id: SubCategoryId,
    ) -> EmporiumResult<Vec<Product>>;

    /// Products featured on the landing page.
    async fn find_hero(&self) -> EmporiumResult<Vec<Product>>;

    /// Products featured on a category page.
    async fn find_hero_by_category(&self, category_id: CategoryId)
        -> EmporiumResult<Vec<Product>>;

    /// Case-insensitive substring match on the product name.
    async fn search(&self, query: &str) -> EmporiumResult<Vec<Product>>;

    async fn insert(&self, fields: &NewProduct) -> EmporiumResult<Product>;

    /// Inserts every product or none of them.
    async fn insert_many(&self, products: &[NewProduct]) -> EmporiumResult<Vec<Product>>;

    async fn update(&self, id: ProductId, fields: &NewProduct) -> EmporiumResult<Option<Product>>;

    /// Deletes a product together with its hero entries and the cart items
    /// holding it.
    async fn delete(&self, id: ProductId) -> EmporiumResult<Option<RemovedProduct>>;
}

/// Category and sub-category store. The catalog tree is read-only.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    async fn find_category(&self, id: CategoryId) -> EmporiumResult<Option<Category>>;

    async fn find_all_categories(&self) -> EmporiumResult<Vec<Category>>;

    async fn find_sub_category(&self, id: SubCategoryId) -> EmporiumResult<Option<SubCategory>>;

    async fn find_all_sub_categories(&self) -> EmporiumResult<Vec<SubCategory>>;

    async fn find_sub_categories_by_category(
        &self,
        category_id: CategoryId,
    ) -> EmporiumResult<Vec<SubCategory>>;
}

/// User store.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> EmporiumResult<Option<User>>;

    async fn find_all(&self) -> EmporiumResult<Vec<User>>;

    /// Inserts a user under the caller-supplied ID.
    async fn insert(&self, user: &NewUser) -> EmporiumResult<User>;

    async fn update(&self, id: &UserId, profile: &UserProfile) -> EmporiumResult<Option<User>>;

    /// Deletes a user; addresses, cart items and orders go with it.
    async fn delete(&self, id: &UserId) -> EmporiumResult<Option<RemovedUser>>;
}

/// Address store.
#[async_trait]
pub trait AddressRepository: Interface + Send + Sync {
    async fn find_by_id(&self, id: AddressId) -> EmporiumResult<Option<Address>>;

    async fn find_by_user(&self, user_id: &UserId) -> EmporiumResult<Vec<Address>>;

    async fn insert(&self, fields: &NewAddress) -> EmporiumResult<Address>;

    async fn update(&self, id: AddressId, fields: &NewAddress) -> EmporiumResult<Option<Address>>;

    async fn delete(&self, id: AddressId) -> EmporiumResult<Option<Address>>;
}
