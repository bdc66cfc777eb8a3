//! Application state for Axum handlers.

use emporium_config::AppMetadata;
use emporium_repository::DatabasePoolInterface;
use emporium_security::AuthenticatorInterface;
use emporium_service::{
    AddressService, CacheInterface, CartService, CategoryService, OrderService, ProductService,
    UserService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use shaku::{HasComponent, Module};
use std::sync::Arc;
use utoipa::ToSchema;

/// Static description of the running service, served by `/core/info`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub cache_enabled: bool,
}

impl ServiceInfo {
    #[must_use]
    pub fn new(app: &AppMetadata, cache_enabled: bool) -> Self {
        Self {
            name: app.name.clone(),
            version: app.version.clone(),
            environment: app.environment.clone(),
            cache_enabled,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cart_service: Arc<dyn CartService>,
    pub order_service: Arc<dyn OrderService>,
    pub product_service: Arc<dyn ProductService>,
    pub category_service: Arc<dyn CategoryService>,
    pub user_service: Arc<dyn UserService>,
    pub address_service: Arc<dyn AddressService>,
    pub authenticator: Arc<dyn AuthenticatorInterface>,
    pub database: Arc<dyn DatabasePoolInterface>,
    pub info: Arc<ServiceInfo>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Resolves every handler dependency from a Shaku module.
    pub fn from_module<M>(module: &M, app: &AppMetadata) -> Self
    where
        M: Module
            + HasComponent<dyn CartService>
            + HasComponent<dyn OrderService>
            + HasComponent<dyn ProductService>
            + HasComponent<dyn CategoryService>
            + HasComponent<dyn UserService>
            + HasComponent<dyn AddressService>
            + HasComponent<dyn AuthenticatorInterface>
            + HasComponent<dyn DatabasePoolInterface>
            + HasComponent<dyn CacheInterface>,
    {
        let cache: Arc<dyn CacheInterface> = module.resolve();
        Self {
            cart_service: module.resolve(),
            order_service: module.resolve(),
            product_service: module.resolve(),
            category_service: module.resolve(),
            user_service: module.resolve(),
            address_service: module.resolve(),
            authenticator: module.resolve(),
            database: module.resolve(),
            info: Arc::new(ServiceInfo::new(app, cache.is_enabled())),
            metrics: None,
        }
    }

    /// Exposes the given Prometheus recorder on `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
