//! Shared helpers for the HTTP integration tests.
//!
//! Each test drives the real services over the in-memory store through the
//! same routing, extractor configuration and trace middleware the server
//! mounts.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::Value;
use taskboard::Trace;
use taskboard::domain::ports::TaskRepository;
use taskboard::domain::{TasksService, UsersService};
use taskboard::inbound::http::configure_api;
use taskboard::inbound::http::state::HttpState;
use taskboard::outbound::memory::InMemoryStore;

/// Outcome of a single request.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

/// Build handler state over `store`, reading and writing tasks through
/// `tasks`.
pub fn state_over<T>(store: &Arc<InMemoryStore>, tasks: Arc<T>) -> HttpState
where
    T: TaskRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(UsersService::new(Arc::clone(store), clock.clone()));
    let tasks = Arc::new(TasksService::new(tasks, Arc::clone(store), clock));
    HttpState::from_services(users, tasks, store.clone())
}

/// Send `request` through a fresh app sharing `state`.
pub async fn send(state: &HttpState, request: test::TestRequest) -> Reply {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .configure(configure_api),
    )
    .await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    Reply {
        status,
        location,
        body,
    }
}
