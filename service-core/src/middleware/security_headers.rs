use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Content security policy for the landing page and its same-origin assets.
const PAGE_CSP: &str = "default-src 'self'; \
                        script-src 'self'; \
                        style-src 'self'; \
                        img-src 'self' data:; \
                        connect-src 'self'; \
                        frame-ancestors 'none'";

/// Content security policy for JSON endpoints.
const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let path = req.uri().path();
    let is_page_route = path == "/" || path == "/static" || path.starts_with("/static/");

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(if is_page_route { PAGE_CSP } else { API_CSP }),
    );

    response
}
