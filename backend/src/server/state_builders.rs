//! Builders wiring repositories into services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use taskboard::domain::ports::{StoreHealth, TaskRepository, UserRepository};
use taskboard::domain::{TasksService, UsersService};
use taskboard::inbound::http::state::HttpState;
use taskboard::outbound::memory::InMemoryStore;
use taskboard::outbound::persistence::{
    DbPool, DieselStoreHealth, DieselTaskRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository trio backing the services.
struct Repositories {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
    health: Arc<dyn StoreHealth>,
}

fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
        health: Arc::new(DieselStoreHealth::new(pool.clone())),
    }
}

fn memory_repositories() -> Repositories {
    let store = Arc::new(InMemoryStore::new());
    Repositories {
        users: store.clone(),
        tasks: store.clone(),
        health: store,
    }
}

/// Build handler state over the given clock.
///
/// Uses the Diesel repositories when a pool is configured, otherwise a
/// process-local store whose contents are lost on restart.
pub(crate) fn build_http_state_with_clock(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let repositories = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_repositories(pool)
        }
        None => {
            warn!("no database configured; data is kept in memory only");
            memory_repositories()
        }
    };
    let Repositories {
        users,
        tasks,
        health,
    } = repositories;

    let users_service = Arc::new(UsersService::new(users.clone(), clock.clone()));
    let tasks_service = Arc::new(TasksService::new(tasks, users, clock));
    web::Data::new(HttpState::from_services(
        users_service,
        tasks_service,
        health,
    ))
}

/// Build handler state stamped by the system clock.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    build_http_state_with_clock(config, Arc::new(DefaultClock))
}
