//! The news desk over HTTP.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Request, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::instrument;

use super::{AppState, pages::parse_id};
use crate::{
    domain::{ArticleUpdate, NewsArticle},
    storage::DeskError,
};

/// Body of every news desk response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskResponse {
    /// Whether the action took effect.
    pub success: bool,
    /// Message shown to the editor.
    pub message: String,
    /// The article acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<NewsArticle>,
    /// The listing, for `GET /admin/news`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<NewsArticle>>,
}

impl DeskResponse {
    fn done(message: impl Into<String>, article: NewsArticle) -> Self {
        Self {
            success: true,
            message: message.into(),
            article: Some(article),
            articles: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            article: None,
            articles: None,
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(error) => {
                tracing::error!(%error, "News desk action failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::EmptyTopic | Self::NoChanges | Self::Publish(_) | Self::Unpublish(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, Json(DeskResponse::failed(self.to_string()))).into_response()
    }
}

/// Why a desk request was refused before or during the action.
#[derive(Debug)]
enum Refusal {
    Desk(DeskError),
    UnknownId(String),
    BadBody(String),
}

impl From<DeskError> for Refusal {
    fn from(error: DeskError) -> Self {
        Self::Desk(error)
    }
}

impl From<JsonRejection> for Refusal {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for Refusal {
    fn into_response(self) -> Response {
        match self {
            Self::Desk(error) => error.into_response(),
            Self::UnknownId(raw) => (
                StatusCode::NOT_FOUND,
                Json(DeskResponse::failed(format!("Article {raw} not found"))),
            )
                .into_response(),
            Self::BadBody(reason) => (
                StatusCode::BAD_REQUEST,
                Json(DeskResponse::failed(format!("Invalid request body: {reason}"))),
            )
                .into_response(),
        }
    }
}

/// The article id in the path. Anything but a positive integer is unknown.
fn article_id(path: Result<Path<String>, PathRejection>) -> Result<i64, Refusal> {
    let raw = match path {
        Ok(Path(raw)) => raw,
        Err(rejection) => return Err(Refusal::UnknownId(rejection.body_text())),
    };
    parse_id(&raw).ok_or(Refusal::UnknownId(raw))
}

type DeskResult = Result<(StatusCode, Json<DeskResponse>), Refusal>;

fn ok(message: impl Into<String>, article: NewsArticle) -> DeskResult {
    Ok((StatusCode::OK, Json(DeskResponse::done(message, article))))
}

/// Routes under `/admin`, guarded by `token`.
pub fn router(token: &str) -> Router<AppState> {
    let token: Arc<str> = Arc::from(token);
    Router::new()
        .route("/news", get(list).post(create))
        .route("/news/{id}", patch(update).delete(remove))
        .route("/news/{id}/publish", post(publish))
        .route("/news/{id}/unpublish", post(unpublish))
        .route_layer(middleware::from_fn_with_state(token, require_token))
}

async fn require_token(State(token): State<Arc<str>>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if presented.is_some_and(|presented| token_matches(presented.trim(), &token)) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        (
            StatusCode::UNAUTHORIZED,
            Json(DeskResponse::failed("Unauthorized")),
        )
            .into_response()
    }
}

/// Compares SHA-256 digests in constant time, so neither the contents nor
/// the length of the token leak through timing.
fn token_matches(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented.ct_eq(&expected).into()
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> DeskResult {
    let articles = state.desk().list().await?;
    Ok((
        StatusCode::OK,
        Json(DeskResponse {
            success: true,
            message: format!("{} articles", articles.len()),
            article: None,
            articles: Some(articles),
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct DraftRequest {
    #[serde(default)]
    topic: String,
}

#[instrument(skip(state))]
async fn create(
    State(state): State<AppState>,
    request: Result<Json<DraftRequest>, JsonRejection>,
) -> DeskResult {
    let Json(request) = request?;
    let draft = state.desk().create_draft(&request.topic).await?;
    Ok((
        StatusCode::CREATED,
        Json(DeskResponse::done("Draft created.", draft)),
    ))
}

#[instrument(skip(state, update))]
async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    update: Result<Json<ArticleUpdate>, JsonRejection>,
) -> DeskResult {
    let id = article_id(id)?;
    let Json(update) = update?;
    let article = state.desk().update(id, &update).await?;
    ok("Article updated.", article)
}

#[derive(Debug, Default, Deserialize)]
struct PublishRequest {
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

/// The body is optional; an empty body publishes now.
#[instrument(skip(state, body))]
async fn publish(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> DeskResult {
    let id = article_id(id)?;
    let request: PublishRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PublishRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|error| Refusal::BadBody(error.to_string()))?
    };

    let article = state.desk().publish(id, request.published_at).await?;
    ok("Article published.", article)
}

#[instrument(skip(state))]
async fn unpublish(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> DeskResult {
    let id = article_id(id)?;
    let article = state.desk().unpublish(id).await?;
    ok("Article moved back to draft.", article)
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> DeskResult {
    let id = article_id(id)?;
    let article = state.desk().delete(id).await?;
    ok("Article deleted.", article)
}
