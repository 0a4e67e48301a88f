//! Collection wiring: seeded in-memory stores, id generators and one
//! resource handler per resource type.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use gatewaysim_catalog::Product;
use gatewaysim_core::{IdGenerator, IdStrategy, Resource, SequentialIds, UuidIds};
use gatewaysim_infra::{Collection, InMemoryCollection, ResourceHandler, SeedError, SeedSet, seed};
use gatewaysim_users::User;

use crate::config::ApiConfig;

/// Shared application state, injected into handlers as an `Extension`.
pub struct AppServices {
    users: ResourceHandler<User>,
    products: ResourceHandler<Product>,
    service_name: String,
    started_at: DateTime<Utc>,
    started: Instant,
}

/// Lookup of the handler serving resource type `R`.
pub trait HandlerFor<R: Resource> {
    fn handler(&self) -> &ResourceHandler<R>;
}

impl HandlerFor<User> for AppServices {
    fn handler(&self) -> &ResourceHandler<User> {
        &self.users
    }
}

impl HandlerFor<Product> for AppServices {
    fn handler(&self) -> &ResourceHandler<Product> {
        &self.products
    }
}

impl AppServices {
    pub fn resource<R: Resource>(&self) -> &ResourceHandler<R>
    where
        Self: HandlerFor<R>,
    {
        HandlerFor::<R>::handler(self)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Build services from config: load the seed set and wire every collection.
pub fn build_services(config: &ApiConfig) -> Result<AppServices, SeedError> {
    let seed = SeedSet::load(&config.seed)?;
    build_services_with(config, seed)
}

/// Build services from an explicit seed set (tests, embedding).
pub fn build_services_with(config: &ApiConfig, seed: SeedSet) -> Result<AppServices, SeedError> {
    let users = resource_handler(seed.users, config.id_strategy)?;
    let products = resource_handler(seed.products, config.id_strategy)?;

    tracing::info!(
        users = users.count()?,
        products = products.count()?,
        id_strategy = ?config.id_strategy,
        "collections ready"
    );

    Ok(AppServices {
        users,
        products,
        service_name: config.service_name.clone(),
        started_at: Utc::now(),
        started: Instant::now(),
    })
}

fn resource_handler<R: Resource>(
    records: Vec<R>,
    strategy: IdStrategy,
) -> Result<ResourceHandler<R>, SeedError> {
    let collection = Arc::new(InMemoryCollection::<R>::new());
    seed::populate(&*collection, records)?;

    let ids: Arc<dyn IdGenerator> = match strategy {
        IdStrategy::Sequential => {
            let existing = collection.list()?;
            Arc::new(SequentialIds::following(existing.iter().map(R::id)))
        }
        IdStrategy::Uuid => Arc::new(UuidIds),
    };

    Ok(ResourceHandler::new(collection, ids))
}
