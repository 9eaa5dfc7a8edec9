// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::{
    auth::{Authorized, DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteResponse, DrinkDetailResponse, DrinkId, DrinkMenuResponse,
        UpdateDrinkRequest,
    },
    state::AppState,
};

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::unprocessable(rejection.body_text()))
}

fn drink_id(id: Result<Path<DrinkId>, PathRejection>) -> Result<DrinkId, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::not_found())
}

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, body = DrinkMenuResponse))
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<DrinkMenuResponse> {
    let store = state.store.read().await;
    Json(DrinkMenuResponse {
        success: true,
        drinks: store.list_drinks().iter().map(|drink| drink.short()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer_auth" = ["get:drinks-detail"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted")
    )
)]
pub async fn list_drink_details(
    _authorized: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Json<DrinkDetailResponse> {
    let store = state.store.read().await;
    Json(DrinkDetailResponse::new(store.list_drinks()))
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    security(("bearer_auth" = ["post:drinks"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 422, description = "Invalid or duplicate drink")
    )
)]
pub async fn create_drink(
    Authorized { claims, .. }: Authorized<PostDrinks>,
    State(state): State<AppState>,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let request = json_body(body)?;
    let drink = state.store.write().await.create_drink(request)?;

    tracing::info!(
        drink_id = drink.id,
        title = %drink.title,
        subject = claims.subject().unwrap_or("unknown"),
        "Drink created"
    );
    Ok(Json(DrinkDetailResponse::new(vec![drink])))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Identifier of the drink to edit")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    security(("bearer_auth" = ["patch:drinks"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 404, description = "No such drink"),
        (status = 422, description = "Invalid or duplicate title")
    )
)]
pub async fn update_drink(
    Authorized { claims, .. }: Authorized<PatchDrinks>,
    State(state): State<AppState>,
    id: Result<Path<DrinkId>, PathRejection>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let id = drink_id(id)?;
    let request = json_body(body)?;
    let drink = state.store.write().await.update_drink(id, request)?;

    tracing::info!(
        drink_id = drink.id,
        subject = claims.subject().unwrap_or("unknown"),
        "Drink updated"
    );
    Ok(Json(DrinkDetailResponse::new(vec![drink])))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Identifier of the drink to delete")),
    tag = "Drinks",
    security(("bearer_auth" = ["delete:drinks"])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "No such drink")
    )
)]
pub async fn delete_drink(
    Authorized { claims, .. }: Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    id: Result<Path<DrinkId>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = drink_id(id)?;
    state.store.write().await.delete_drink(id)?;

    tracing::info!(
        drink_id = id,
        subject = claims.subject().unwrap_or("unknown"),
        "Drink deleted"
    );
    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
