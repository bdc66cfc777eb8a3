//! Integration tests for the PostgreSQL stores.
//!
//! These run against a real database started with testcontainers and need
//! Docker: `cargo test -p emporium-repository -- --ignored`.

mod common;

use common::TestDatabase;
use emporium_core::{
    AddressId, CartItemId, CategoryId, NewAddress, NewCartItem, NewOrder, NewOrderItem,
    NewProduct, NewUser, ProductId, SubCategoryId, UserId, UserProfile,
};
use emporium_repository::{
    AddressRepository, CartItemRepository, CategoryRepository, OrderItemRepository,
    OrderRepository, PgAddressRepository, PgCartItemRepository, PgCategoryRepository,
    PgOrderItemRepository, PgOrderRepository, PgProductRepository, PgUserRepository,
    ProductRepository, UserRepository,
};

fn new_product(name: &str, category: i64, sub_category: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: "test product".to_string(),
        category_id: CategoryId::new(category),
        sub_category_id: SubCategoryId::new(sub_category),
        image_url: "https://cdn.example.com/p.png".to_string(),
        price: 2500,
        previous_price: 3000,
        offered: true,
    }
}

async fn seed_user(db: &TestDatabase, id: &str) -> UserId {
    let users = PgUserRepository::new(db.pool());
    let user = users
        .insert(&NewUser {
            id: UserId::new(id),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{id}@example.com"),
        })
        .await
        .expect("Failed to insert user");
    user.id
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_catalog_tree_is_seeded() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.pool());

    assert_eq!(repo.find_all_categories().await.unwrap().len(), 3);
    assert_eq!(repo.find_all_sub_categories().await.unwrap().len(), 10);

    let women = repo
        .find_sub_categories_by_category(CategoryId::new(2))
        .await
        .unwrap();
    assert!(women.iter().all(|s| s.category_id == CategoryId::new(2)));
    assert!(repo.find_category(CategoryId::new(4)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_cart_item_crud() {
    let db = TestDatabase::new().await;
    let alice = seed_user(&db, "alice").await;
    let bob = seed_user(&db, "bob").await;
    let product = PgProductRepository::new(db.pool())
        .insert(&new_product("Linen shirt", 1, 1))
        .await
        .unwrap();
    let repo = PgCartItemRepository::new(db.pool());

    let fields = NewCartItem {
        product_id: product.id,
        quantity: 2,
        user_id: alice.clone(),
    };
    let item = repo.insert(&fields).await.unwrap();
    assert_eq!(repo.find_by_user(&alice).await.unwrap(), vec![item.clone()]);

    let moved = NewCartItem {
        user_id: bob.clone(),
        quantity: 3,
        ..fields
    };
    let previous = repo.update(item.id, &moved).await.unwrap().unwrap();
    assert_eq!(previous.user_id, alice);
    assert_eq!(repo.find_by_id(item.id).await.unwrap().unwrap().quantity, 3);
    assert!(repo.find_by_user(&alice).await.unwrap().is_empty());

    assert!(repo.update(CartItemId::new(9999), &moved).await.unwrap().is_none());
    assert!(repo.delete(item.id).await.unwrap().is_some());
    assert!(repo.delete(item.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_bulk_insert_rolls_back_on_failure() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.pool());

    let batch = vec![new_product("Shirt", 1, 1), new_product("Orphan", 99, 1)];
    let err = repo.insert_many(&batch).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(repo.find_all().await.unwrap().is_empty());

    let created = repo
        .insert_many(&[new_product("Shirt", 1, 1), new_product("Dress", 2, 4)])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(repo.find_by_category(CategoryId::new(2)).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_product_search_matches_literally() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.pool());
    repo.insert(&new_product("Linen Shirt", 1, 1)).await.unwrap();
    repo.insert(&new_product("100% wool jacket", 1, 3)).await.unwrap();

    assert_eq!(repo.search("shirt").await.unwrap().len(), 1);
    assert_eq!(repo.search("100%").await.unwrap().len(), 1);
    assert!(repo.search("_").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_orders_items_and_user_cascade() {
    let db = TestDatabase::new().await;
    let alice = seed_user(&db, "alice").await;
    let product = PgProductRepository::new(db.pool())
        .insert(&new_product("Skirt", 2, 5))
        .await
        .unwrap();
    let address = PgAddressRepository::new(db.pool())
        .insert(&NewAddress {
            street: "1 Main St".to_string(),
            city: "Porto".to_string(),
            state: "Porto".to_string(),
            country: "PT".to_string(),
            zip_code: "4000-001".to_string(),
            user_id: alice.clone(),
        })
        .await
        .unwrap();

    let orders = PgOrderRepository::new(db.pool());
    let items = PgOrderItemRepository::new(db.pool());
    let order = orders
        .insert(&NewOrder {
            user_id: alice.clone(),
            address_id: address.id,
            total_price: 5000,
            created_at: "2024-05-01T10:00:00+02:00".to_string(),
            status: "pending".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(order.created_at.to_rfc3339(), "2024-05-01T08:00:00+00:00");

    let item = items
        .insert(&NewOrderItem {
            order_id: order.id.clone(),
            product_id: product.id,
            quantity: 2,
        })
        .await
        .unwrap();
    assert_eq!(items.find_by_order(&order.id).await.unwrap(), vec![item.clone()]);

    let users = PgUserRepository::new(db.pool());
    users
        .update(
            &alice,
            &UserProfile {
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
        .await
        .unwrap();
    let removed = users.delete(&alice).await.unwrap().unwrap();
    assert_eq!(removed.address_ids, vec![address.id]);
    assert_eq!(removed.orders.len(), 1);
    assert_eq!(removed.orders[0].order.id, order.id);
    assert_eq!(removed.orders[0].item_ids, vec![item.id]);
    assert!(users.delete(&alice).await.unwrap().is_none());

    assert!(orders.find_by_id(&order.id).await.unwrap().is_none());
    assert!(items.find_by_order(&order.id).await.unwrap().is_empty());
    assert!(PgAddressRepository::new(db.pool())
        .find_by_id(AddressId::new(address.id.into_inner()))
        .await
        .unwrap()
        .is_none());
    assert!(PgProductRepository::new(db.pool())
        .find_by_id(ProductId::new(product.id.into_inner()))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_product_delete_reports_cascaded_cart_items() {
    let db = TestDatabase::new().await;
    let alice = seed_user(&db, "alice").await;
    let products = PgProductRepository::new(db.pool());
    let carts = PgCartItemRepository::new(db.pool());
    let product = products.insert(&new_product("Scarf", 2, 5)).await.unwrap();
    let item = carts
        .insert(&NewCartItem {
            product_id: product.id,
            quantity: 1,
            user_id: alice.clone(),
        })
        .await
        .unwrap();

    let removed = products.delete(product.id).await.unwrap().unwrap();
    assert_eq!(removed.product, product);
    assert_eq!(removed.cart_items, vec![(item.id, alice.clone())]);
    assert!(carts.find_by_user(&alice).await.unwrap().is_empty());
    assert!(products.delete(product.id).await.unwrap().is_none());
}
