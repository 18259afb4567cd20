use askama::Template;

use crate::model::Recipe;

#[derive(Template)]
#[template(path = "recipes.html")]
pub struct RecipeListTemplate {
    pub recipes: Vec<Recipe>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditRecipeTemplate {
    pub recipe: Recipe,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate;
