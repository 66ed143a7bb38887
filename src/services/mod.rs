// src/services/mod.rs
use crate::models::{Delegation, Team, User};
use crate::utils::store::{Collection, JsonCollection, MemoryCollection};
use std::sync::Arc;

pub mod audit;
pub mod catalog;
pub mod conflict;
pub mod delegation_manager;
pub mod directory;
pub mod export;
pub mod resolver;
pub mod stats;

pub use conflict::ConflictDetector;
pub use delegation_manager::DelegationManager;
pub use directory::Directory;
pub use resolver::EffectivePermissionResolver;
pub use stats::StatisticsAggregator;

// Shared service graph handed to the route handlers via actix app data.
#[derive(Clone)]
pub struct AppState {
    pub directory: Directory,
    pub delegations: DelegationManager,
    pub resolver: EffectivePermissionResolver,
    pub stats: StatisticsAggregator,
}

impl AppState {
    pub fn new(
        users: Arc<dyn Collection<User>>,
        teams: Arc<dyn Collection<Team>>,
        delegations: Arc<dyn Collection<Delegation>>,
    ) -> Self {
        let manager = DelegationManager::new(delegations.clone(), users.clone());
        Self {
            directory: Directory::new(teams.clone(), users.clone(), manager.clone()),
            resolver: EffectivePermissionResolver::new(
                users.clone(),
                teams.clone(),
                manager.clone(),
            ),
            stats: StatisticsAggregator::new(teams, delegations),
            delegations: manager,
        }
    }

    // JSON-file collections under the storage directory.
    pub fn file_backed() -> Self {
        let dir = crate::utils::store::storage_dir();
        Self::new(
            Arc::new(JsonCollection::new(dir.join("users.json"))),
            Arc::new(JsonCollection::new(dir.join("teams.json"))),
            Arc::new(JsonCollection::new(dir.join("delegations.json"))),
        )
    }

    // In-memory collections, used by the test suite.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCollection::new()),
            Arc::new(MemoryCollection::new()),
            Arc::new(MemoryCollection::new()),
        )
    }
}
