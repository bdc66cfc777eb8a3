//! Address service.

use crate::cache::keyspace::{ADDRESS, USER_ADDRESSES};
use crate::cache::CacheInterface;
use crate::cache_aside::{CacheAsideInvalidator, CacheAsideReader, Invalidation};
use async_trait::async_trait;
use emporium_core::{
    require_valid_id, Address, AddressId, Collection, EmporiumError, EmporiumResult, Interface,
    NewAddress, RequestStatus, UserId, ValidateExt,
};
use emporium_repository::AddressRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Address service trait.
#[async_trait]
pub trait AddressService: Interface + Send + Sync {
    async fn get_address(&self, id: AddressId) -> EmporiumResult<Address>;

    async fn get_user_addresses(&self, user_id: &UserId) -> EmporiumResult<Collection<Address>>;

    async fn add_address(&self, address: NewAddress) -> EmporiumResult<Address>;

    /// Replaces an address, possibly moving it to another user.
    async fn update_address(&self, id: AddressId, address: NewAddress)
        -> EmporiumResult<RequestStatus>;

    async fn delete_address(&self, id: AddressId) -> EmporiumResult<RequestStatus>;
}

/// Address service component for dependency injection.
#[derive(Component)]
#[shaku(interface = AddressService)]
pub struct AddressServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn AddressRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl AddressServiceComponent {
    #[must_use]
    pub fn new(repository: Arc<dyn AddressRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self { repository, cache }
    }

    fn invalidator(&self) -> CacheAsideInvalidator {
        CacheAsideInvalidator::new(Arc::clone(&self.cache))
    }
}

#[async_trait]
impl AddressService for AddressServiceComponent {
    async fn get_address(&self, id: AddressId) -> EmporiumResult<Address> {
        debug!("Getting address: {}", id);
        require_valid_id("address", &id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), ADDRESS)
            .fetch(&id, || async {
                self.repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| EmporiumError::not_found("Address", id))
            })
            .await
    }

    async fn get_user_addresses(&self, user_id: &UserId) -> EmporiumResult<Collection<Address>> {
        debug!("Getting addresses of user: {}", user_id);
        require_valid_id("user", user_id)?;

        CacheAsideReader::new(Arc::clone(&self.cache), USER_ADDRESSES)
            .fetch(user_id, || async {
                Ok(Collection::new(self.repository.find_by_user(user_id).await?))
            })
            .await
    }

    async fn add_address(&self, address: NewAddress) -> EmporiumResult<Address> {
        address.validate_request()?;

        let created = self.repository.insert(&address).await?;
        info!("Address added: {} for user {}", created.id, created.user_id);

        self.invalidator()
            .invalidate(Invalidation::new().key(&USER_ADDRESSES, &created.user_id));
        Ok(created)
    }

    async fn update_address(
        &self,
        id: AddressId,
        address: NewAddress,
    ) -> EmporiumResult<RequestStatus> {
        require_valid_id("address", &id)?;
        address.validate_request()?;

        let previous = self
            .repository
            .update(id, &address)
            .await?
            .ok_or_else(|| EmporiumError::not_found("Address", id))?;
        info!("Address updated: {}", id);

        self.invalidator().invalidate(
            Invalidation::new()
                .key(&ADDRESS, id)
                .key(&USER_ADDRESSES, &previous.user_id)
                .key(&USER_ADDRESSES, &address.user_id),
        );
        Ok(RequestStatus::success())
    }

    async fn delete_address(&self, id: AddressId) -> EmporiumResult<RequestStatus> {
        require_valid_id("address", &id)?;

        let mut invalidation = Invalidation::new().key(&ADDRESS, id);
        if let Some(removed) = self.repository.delete(id).await? {
            info!("Address deleted: {}", id);
            invalidation = invalidation.key(&USER_ADDRESSES, &removed.user_id);
        }

        self.invalidator().invalidate(invalidation);
        Ok(RequestStatus::success())
    }
}

impl std::fmt::Debug for AddressServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{eventually, InMemoryCache, InMemoryStore};

    fn setup() -> (AddressServiceComponent, Arc<InMemoryStore>, Arc<InMemoryCache>) {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = AddressServiceComponent::new(store.clone(), cache.clone());
        (service, store, cache)
    }

    fn new_address(user: &str, street: &str) -> NewAddress {
        NewAddress {
            street: street.to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            zip_code: "62701".to_string(),
            user_id: UserId::new(user),
        }
    }

    #[tokio::test]
    async fn test_add_makes_address_visible_in_user_list() {
        let (service, _store, cache) = setup();
        let alice = UserId::new("alice");

        assert!(service.get_user_addresses(&alice).await.unwrap().is_empty());
        let key = USER_ADDRESSES.key(&alice);
        assert!(eventually(|| cache.contains(&key)).await);

        let created = service.add_address(new_address("alice", "1 Main St")).await.unwrap();
        assert!(eventually(|| !cache.contains(&key)).await);

        let listed = service.get_user_addresses(&alice).await.unwrap();
        assert_eq!(listed.into_inner(), vec![created]);
    }

    #[tokio::test]
    async fn test_moving_address_invalidates_both_users() {
        let (service, _store, cache) = setup();
        let created = service.add_address(new_address("alice", "1 Main St")).await.unwrap();

        service.get_address(created.id).await.unwrap();
        service.get_user_addresses(&UserId::new("alice")).await.unwrap();
        service.get_user_addresses(&UserId::new("bob")).await.unwrap();
        let keys = [
            ADDRESS.key(created.id),
            USER_ADDRESSES.key("alice"),
            USER_ADDRESSES.key("bob"),
        ];
        assert!(eventually(|| keys.iter().all(|k| cache.contains(k))).await);

        service
            .update_address(created.id, new_address("bob", "2 Elm St"))
            .await
            .unwrap();
        assert!(eventually(|| keys.iter().all(|k| !cache.contains(k))).await);

        assert!(service
            .get_user_addresses(&UserId::new("alice"))
            .await
            .unwrap()
            .is_empty());
        let moved = service.get_address(created.id).await.unwrap();
        assert_eq!(moved.street, "2 Elm St");
        assert_eq!(moved.user_id, UserId::new("bob"));
    }

    #[tokio::test]
    async fn test_update_missing_and_delete_twice() {
        let (service, _store, _cache) = setup();

        let err = service
            .update_address(AddressId::new(77), new_address("alice", "1 Main St"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let created = service.add_address(new_address("alice", "1 Main St")).await.unwrap();
        assert!(service.delete_address(created.id).await.unwrap().is_success());
        assert!(service.delete_address(created.id).await.unwrap().is_success());
        assert_eq!(
            service.get_address(created.id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let (service, store, _cache) = setup();

        assert!(service.add_address(new_address("alice", " ")).await.is_err());
        assert!(service.add_address(new_address("", "1 Main St")).await.is_err());
        assert!(service.get_address(AddressId::new(0)).await.is_err());
        assert!(service
            .update_address(AddressId::new(-3), new_address("alice", "1 Main St"))
            .await
            .is_err());
        assert_eq!(store.operation_count(), 0);
    }
}
