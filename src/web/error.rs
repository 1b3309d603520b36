use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Fallback body used when the not-found page itself fails to render.
pub(super) const PLAIN_NOT_FOUND: &str = "<!DOCTYPE html><title>Page Not Found</title><h1>Page Not Found</h1>";

/// Why a page could not be served.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Nothing lives at the requested path. Carries the rendered 404 page.
    #[error("Page not found")]
    NotFound(String),

    /// A template failed to render.
    #[error("Failed to render page: {0}")]
    Render(#[from] tera::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
            Self::Render(error) => {
                tracing::error!(error = ?error, "Template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_its_body() {
        let response = PageError::NotFound(PLAIN_NOT_FOUND.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn render_failures_are_server_errors() {
        let response = PageError::Render(tera::Error::msg("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
