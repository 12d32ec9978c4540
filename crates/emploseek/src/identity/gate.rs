use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::IdentityProvider;
use crate::http::error_response;

pub const UNAUTHORIZED_MESSAGE: &str = "Non autorise";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Layered once over every admin route. Lets the request through only when the bearer
/// token resolves to a principal with the admin claim; the principal is then available
/// to handlers as an `Extension<Principal>`.
pub async fn require_admin<P>(
    State(provider): State<Arc<P>>,
    mut request: Request,
    next: Next,
) -> Response
where
    P: IdentityProvider + 'static,
{
    let path = request.uri().path().to_string();
    let principal = match bearer_token(request.headers()).map(|token| provider.resolve(token)) {
        Some(Ok(Some(principal))) if principal.is_admin => principal,
        Some(Ok(Some(principal))) => {
            warn!(
                %path,
                subject = %principal.subject,
                email = principal.email.as_deref().unwrap_or("-"),
                "non-admin principal refused"
            );
            return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE);
        }
        Some(Err(err)) => {
            warn!(%path, error = %err, "identity lookup failed");
            return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE);
        }
        Some(Ok(None)) | None => {
            warn!(%path, "admin request without a valid session");
            return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE);
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Principal, StaticTokenProvider};
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    fn gated() -> Router {
        let provider = StaticTokenProvider::new()
            .with_session(
                "admin",
                Principal {
                    subject: "alice".to_string(),
                    email: Some("alice@emploseek.fr".to_string()),
                    is_admin: true,
                },
            )
            .with_session(
                "member",
                Principal {
                    subject: "bob".to_string(),
                    email: Some("bob@emploseek.fr".to_string()),
                    is_admin: false,
                },
            );

        Router::new()
            .route(
                "/whoami",
                get(|Extension(principal): Extension<Principal>| async move {
                    principal.email.unwrap_or_default()
                }),
            )
            .route_layer(from_fn_with_state(
                Arc::new(provider),
                require_admin::<StaticTokenProvider>,
            ))
    }

    async fn whoami(token: &str) -> (StatusCode, String) {
        let response = gated()
            .oneshot(
                axum::http::Request::get("/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn admin_principal_reaches_handler_with_its_email() {
        assert_eq!(
            whoami("admin").await,
            (StatusCode::OK, "alice@emploseek.fr".to_string())
        );
    }

    #[tokio::test]
    async fn non_admin_principal_is_refused() {
        let (status, body) = whoami("member").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains(UNAUTHORIZED_MESSAGE));
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  abc "));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);
    }
}
