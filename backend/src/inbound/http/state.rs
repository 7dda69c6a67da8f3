//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{StoreHealth, TasksCommand, TasksQuery, UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User mutations.
    pub users: Arc<dyn UsersCommand>,
    /// User reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Task mutations.
    pub tasks: Arc<dyn TasksCommand>,
    /// Task reads.
    pub tasks_query: Arc<dyn TasksQuery>,
    /// Backing store probe.
    pub store_health: Arc<dyn StoreHealth>,
}

impl HttpState {
    /// Build state from services that implement both halves of a resource.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use taskboard::domain::{TasksService, UsersService};
    /// use taskboard::inbound::http::state::HttpState;
    /// use taskboard::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(UsersService::new(store.clone(), clock.clone()));
    /// let tasks = Arc::new(TasksService::new(store.clone(), store.clone(), clock));
    /// let state = HttpState::from_services(users, tasks, store);
    /// let _query = state.users_query.clone();
    /// ```
    pub fn from_services<U, T>(
        users: Arc<U>,
        tasks: Arc<T>,
        store_health: Arc<dyn StoreHealth>,
    ) -> Self
    where
        U: UsersCommand + UsersQuery + 'static,
        T: TasksCommand + TasksQuery + 'static,
    {
        Self {
            users: users.clone(),
            users_query: users,
            tasks: tasks.clone(),
            tasks_query: tasks,
            store_health,
        }
    }
}
