//! Drink record and its two serialization views.
//!
//! The recipe column stores a JSON-serialized ingredient list. Writes always
//! go through the same encoder, so a stored recipe that fails to deserialize
//! is an internal-consistency fault, not a user input error.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A drink row as stored. Owned by the store; never cached across requests.
#[derive(Debug, Clone, FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

/// One ingredient entry in a drink recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: i64,
}

/// Summary projection of an ingredient: omits the name.
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: i64,
}

/// Summary view, used for the public listing.
#[derive(Debug, Serialize)]
pub struct DrinkSummary {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

/// Detailed view, used for authorized listing and mutation responses.
#[derive(Debug, Serialize)]
pub struct DrinkDetail {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// Deserialize the stored recipe text.
    pub fn ingredients(&self) -> Result<Vec<Ingredient>, serde_json::Error> {
        serde_json::from_str(&self.recipe)
    }

    /// Summary view: `{id, title, recipe: [{color, parts}]}`.
    pub fn short(&self) -> Result<DrinkSummary, serde_json::Error> {
        let recipe = self
            .ingredients()?
            .into_iter()
            .map(|i| IngredientSummary {
                color: i.color,
                parts: i.parts,
            })
            .collect();

        Ok(DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe,
        })
    }

    /// Detailed view: `{id, title, recipe: [{color, name, parts}]}`.
    pub fn long(&self) -> Result<DrinkDetail, serde_json::Error> {
        Ok(DrinkDetail {
            id: self.id,
            title: self.title.clone(),
            recipe: self.ingredients()?,
        })
    }
}
