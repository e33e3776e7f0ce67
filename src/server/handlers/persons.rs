use super::SharedDirectory;
use crate::contact::{Contact, ContactId, ContactInput};
use crate::directory::CreateOutcome;
use crate::server::structured_error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use http::StatusCode;

pub async fn list_persons(
    State(directory): State<SharedDirectory>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(directory.list().await?))
}

pub async fn get_person(
    State(directory): State<SharedDirectory>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(directory.get(&ContactId::from(id)).await?))
}

/// 201 for a new record, 200 when the merge policy updated an existing one.
pub async fn create_person(
    State(directory): State<SharedDirectory>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(input) = payload?;
    let outcome = directory.create(input).await?;
    let status = match outcome {
        CreateOutcome::Created(_) => StatusCode::CREATED,
        CreateOutcome::Merged(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into_contact())))
}

pub async fn update_person(
    State(directory): State<SharedDirectory>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(directory.update(&ContactId::from(id), input).await?))
}

pub async fn delete_person(
    State(directory): State<SharedDirectory>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    directory.delete(&ContactId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
