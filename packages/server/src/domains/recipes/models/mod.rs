pub mod cook;
pub mod favorite;
pub mod rating;
pub mod recipe;

pub use cook::Cook;
pub use favorite::Favorite;
pub use rating::Rating;
pub use recipe::{CreateRecipe, Recipe, RecipeStatus};
