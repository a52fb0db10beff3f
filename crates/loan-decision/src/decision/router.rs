use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::error;

use super::domain::{DecisionRequest, DecisionResponse};
use super::engine::DecisionEngine;
use super::error::DecisionError;
use super::identifier::IdentifierValidator;

pub(crate) const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Router exposing `POST /loan/decision`.
pub fn decision_router<V>(engine: Arc<DecisionEngine<V>>) -> Router
where
    V: IdentifierValidator + 'static,
{
    Router::new()
        .route("/loan/decision", post(decision_handler::<V>))
        .with_state(engine)
}

pub(crate) async fn decision_handler<V>(
    State(engine): State<Arc<DecisionEngine<V>>>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response
where
    V: IdentifierValidator + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match engine.evaluate(&request) {
        Ok(decision) => (StatusCode::OK, Json(DecisionResponse::from(decision))).into_response(),
        Err(err) => {
            let body = DecisionResponse::rejected(err.to_string());
            (status_for(err), Json(body)).into_response()
        }
    }
}

pub(crate) fn status_for(err: DecisionError) -> StatusCode {
    match err {
        DecisionError::InvalidIdentifier
        | DecisionError::InvalidAmount
        | DecisionError::InvalidPeriod
        | DecisionError::InvalidAge => StatusCode::BAD_REQUEST,
        DecisionError::NoValidLoan => StatusCode::NOT_FOUND,
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let (status, message) = match &rejection {
        JsonRejection::JsonDataError(_)
        | JsonRejection::JsonSyntaxError(_)
        | JsonRejection::MissingJsonContentType(_) => {
            (StatusCode::BAD_REQUEST, rejection.body_text())
        }
        _ => {
            error!(error = %rejection.body_text(), "failed to read decision request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                UNEXPECTED_ERROR_MESSAGE.to_string(),
            )
        }
    };

    (status, Json(DecisionResponse::rejected(message))).into_response()
}
