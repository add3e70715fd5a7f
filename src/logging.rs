//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

/// Form bodies longer than this are only logged at the `debug` level.
const LOG_BODY_LENGTH_LIMIT: usize = 256;

/// Log the request and response for each request.
///
/// Requests and response statuses are logged at the `info` level. Form
/// bodies are logged with password fields redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request = if is_form_submission(&request) {
        let (parts, body) = request.into_parts();
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        let body_text = String::from_utf8_lossy(&body_bytes).to_string();

        log_form_body(&method, &uri, &body_text);

        Request::from_parts(parts, Body::from(body_bytes))
    } else {
        tracing::info!("received {method} {uri}");
        request
    };

    let response = next.run(request).await;

    tracing::info!("{method} {uri} -> {}", response.status());

    response
}

fn is_form_submission(request: &Request) -> bool {
    *request.method() == Method::POST
        && request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn log_form_body(method: &Method, uri: &axum::http::Uri, body_text: &str) {
    let display_text = redact_form_field(body_text, "password");
    let display_text = redact_form_field(&display_text, "confirm_password");

    if display_text.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "received {method} {uri} with form body {}...",
            &display_text[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("full form body: {display_text}");
    } else {
        tracing::info!("received {method} {uri} with form body {display_text}");
    }
}

/// Replace the value of `field_name` in a URL-encoded form body with
/// asterisks.
fn redact_form_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{key}=********"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod redact_form_field_tests {
    use super::redact_form_field;

    #[test]
    fn redacts_the_named_field() {
        let redacted = redact_form_field("username=alice&password=hunter2", "password");

        assert_eq!(redacted, "username=alice&password=********");
    }

    #[test]
    fn leaves_other_fields_untouched() {
        let redacted = redact_form_field("username=alice&amount=42", "password");

        assert_eq!(redacted, "username=alice&amount=42");
    }

    #[test]
    fn does_not_redact_fields_with_a_matching_prefix() {
        let redacted = redact_form_field("confirm_password=hunter2", "password");

        assert_eq!(redacted, "confirm_password=hunter2");
    }
}
