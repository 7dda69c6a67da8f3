//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockStoreHealth, MockTasksCommand, MockTasksQuery, MockUsersCommand, MockUsersQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// Mocked ports for handler tests; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub tasks: MockTasksCommand,
    pub tasks_query: MockTasksQuery,
    pub store_health: MockStoreHealth,
}

impl MockPorts {
    /// Wrap the mocks in handler state.
    pub fn into_state(self) -> HttpState {
        HttpState {
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            tasks: Arc::new(self.tasks),
            tasks_query: Arc::new(self.tasks_query),
            store_health: Arc::new(self.store_health),
        }
    }

    /// Build an app serving `/api/v1` over these mocks.
    pub fn into_app(
        self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.into_state()))
            .configure(configure_api)
    }
}

/// Send `request` to an app over `ports`; returns the status, the `Location`
/// header and the JSON body (`Null` when empty).
pub async fn send(
    ports: MockPorts,
    request: test::TestRequest,
) -> (StatusCode, Option<String>, Value) {
    let app = test::init_service(ports.into_app()).await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, location, body)
}
