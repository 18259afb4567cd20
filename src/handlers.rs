use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::store::RecipeStore;
use crate::templates::{EditRecipeTemplate, HomeTemplate, RecipeListTemplate};

/// Author stamped on every recipe submitted through the list-page form.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Field names must match the `name` attributes in the HTML forms.
#[derive(Deserialize)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
}

pub async fn home() -> Result<Html<String>, AppError> {
    Ok(Html(HomeTemplate.render()?))
}

pub async fn list_recipes(
    State(store): State<Arc<RecipeStore>>,
) -> Result<Html<String>, AppError> {
    let recipes = store.list_all()?;
    Ok(Html(RecipeListTemplate { recipes }.render()?))
}

pub async fn create_recipe(
    State(store): State<Arc<RecipeStore>>,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect, AppError> {
    let recipe = store.create(&form.title, &form.description, DEFAULT_AUTHOR)?;
    info!(id = recipe.id, title = %recipe.title, "recipe submitted");
    Ok(Redirect::to("/recipes/"))
}

pub async fn edit_recipe(
    State(store): State<Arc<RecipeStore>>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let recipe = store.get(id)?;
    Ok(Html(EditRecipeTemplate { recipe }.render()?))
}

pub async fn update_recipe(
    State(store): State<Arc<RecipeStore>>,
    Path(id): Path<i64>,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect, AppError> {
    store.update(id, &form.title, &form.description)?;
    info!(id, "recipe edited");
    // The edit form redirects without the trailing slash, unlike create.
    Ok(Redirect::to("/recipes"))
}

pub async fn delete_recipe(
    State(store): State<Arc<RecipeStore>>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    store.delete(id)?;
    info!(id, "recipe deleted");
    Ok(Redirect::to("/recipes/"))
}
