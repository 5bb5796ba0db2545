//! Business logic services

pub mod catalog;
pub mod ledger;
pub mod renters;

use crate::{
    config::{AuthConfig, SeedConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub ledger: ledger::LedgerService,
    pub renters: renters::RentersService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            ledger: ledger::LedgerService::new(repository.clone()),
            renters: renters::RentersService::new(repository.clone(), auth_config),
            repository,
        }
    }

    /// Startup seeding: admin account, then demo catalog
    pub async fn seed(&self, seed: &SeedConfig) -> AppResult<()> {
        self.renters.seed_admin(seed).await?;
        if seed.demo_titles {
            self.catalog.seed_demo_titles().await?;
        }
        Ok(())
    }
}
