use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::models::{Recipe, RecipeDetail, RecipeIngredientRow, RecipePayload};
use crate::routes::{parse_id, AppJson};
use crate::services::recipes;
use crate::session::AuthContext;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/ingredients", get(list_recipes_with_ingredients))
        .route("/ingredients/:id", get(get_recipe_with_ingredients))
        .route(
            "/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>> {
    Ok(Json(recipes::list_recipes(&state.db).await?))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>> {
    let id = parse_id(&id)?;
    Ok(Json(recipes::get_recipe(&state.db, id).await?))
}

pub async fn list_recipes_with_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeIngredientRow>>> {
    Ok(Json(recipes::list_recipes_with_ingredients(&state.db).await?))
}

pub async fn get_recipe_with_ingredients(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(recipes::get_recipe_with_ingredients(&state.db, id).await?))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    context: AuthContext,
    AppJson(payload): AppJson<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeDetail>)> {
    let recipe = recipes::create_recipe(&state.db, &context.user, payload).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Replaces the result item and the whole ingredient set
pub async fn update_recipe(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
    AppJson(payload): AppJson<RecipePayload>,
) -> Result<Json<RecipeDetail>> {
    let id = parse_id(&id)?;
    Ok(Json(
        recipes::update_recipe(&state.db, &context.user, id, payload).await?,
    ))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    context: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    recipes::delete_recipe(&state.db, &context.user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
