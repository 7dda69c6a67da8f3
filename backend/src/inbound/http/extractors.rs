//! Extractor configuration turning malformed requests into validation errors.
//!
//! Actix rejects unparsable bodies and path segments before a handler runs;
//! these handlers give those rejections the same body shape as any other
//! `validation_failed` response.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use tracing::debug;

use crate::domain::Error;

/// Field name reported for body-level parse failures.
const BODY_FIELD: &str = "body";

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "request body is too large".to_owned()
        }
        _ => "request body could not be read".to_owned(),
    };
    Error::invalid_field(BODY_FIELD, message).into()
}

fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected path parameter");
    Error::invalid_field("id", "id must be a positive integer").into()
}

/// JSON body extractor configuration for every `/api/v1` route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path extractor configuration for every `/api/v1` route.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Body {
        #[expect(dead_code, reason = "only deserialisation is exercised")]
        title: String,
    }

    async fn echo(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn by_id(_id: web::Path<i64>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn call(request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(path_config())
                .route("/items", web::post().to(echo))
                .route("/items/{id}", web::get().to(by_id)),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("json error body"))
    }

    #[rstest]
    #[case(r#"{"title":"#)]
    #[case(r#"{"title":"x","createdAt":"2024-01-01T00:00:00Z"}"#)]
    #[case(r#"{"title":7}"#)]
    #[actix_web::test]
    async fn malformed_bodies_are_validation_failures(#[case] raw: &str) {
        let request = test::TestRequest::post()
            .uri("/items")
            .insert_header(("content-type", "application/json"))
            .set_payload(raw.to_owned());

        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
        assert!(body["errors"][BODY_FIELD].is_array());
    }

    #[rstest]
    #[actix_web::test]
    async fn non_json_content_type_is_rejected() {
        let request = test::TestRequest::post()
            .uri("/items")
            .insert_header(("content-type", "text/plain"))
            .set_payload("title");

        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"][BODY_FIELD][0],
            "request body must be application/json"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn non_integer_path_ids_are_validation_failures() {
        let (status, body) = call(test::TestRequest::get().uri("/items/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
        assert!(body["errors"]["id"].is_array());
    }
}
