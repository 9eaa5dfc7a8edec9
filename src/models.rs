// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! A drink is a titled recipe of coloured ingredient parts. It has two
//! representations on the wire:
//!
//! - **short**: what the public menu shows (`color` and `parts` per ingredient)
//! - **long**: the full record, including ingredient names (baristas only)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type DrinkId = u64;

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name, e.g. `milk`.
    pub name: String,
    /// Display colour used to draw the cup.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// Public view of an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// A drink on the menu (long form).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    pub id: DrinkId,
    /// Unique drink title.
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public view of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }
}

/// A recipe as submitted: either one ingredient or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(ingredients) => ingredients,
            RecipeInput::One(ingredient) => vec![ingredient],
        }
    }
}

/// Request to add a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Request to edit a drink. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

// =============================================================================
// Response Bodies
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Public menu: `{"success": true, "drinks": [short...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkMenuResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// Barista view: `{"success": true, "drinks": [long...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkDetailResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

impl DrinkDetailResponse {
    pub fn new(drinks: Vec<Drink>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    /// Identifier of the removed drink.
    pub delete: DrinkId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn latte() -> Drink {
        Drink {
            id: 3,
            title: "latte".into(),
            recipe: vec![
                Ingredient {
                    name: "espresso".into(),
                    color: "brown".into(),
                    parts: 1,
                },
                Ingredient {
                    name: "milk".into(),
                    color: "white".into(),
                    parts: 3,
                },
            ],
        }
    }

    #[test]
    fn short_form_hides_ingredient_names() {
        let short = serde_json::to_value(latte().short()).unwrap();
        assert_eq!(
            short,
            json!({
                "id": 3,
                "title": "latte",
                "recipe": [
                    { "color": "brown", "parts": 1 },
                    { "color": "white", "parts": 3 },
                ],
            })
        );
    }

    #[test]
    fn recipe_accepts_single_ingredient_or_list() {
        let one: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "water",
            "recipe": { "name": "water", "color": "blue", "parts": 1 },
        }))
        .unwrap();
        assert_eq!(one.recipe.into_ingredients().len(), 1);

        let many: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "latte",
            "recipe": [
                { "name": "espresso", "color": "brown", "parts": 1 },
                { "name": "milk", "color": "white", "parts": 3 },
            ],
        }))
        .unwrap();
        assert_eq!(many.recipe.into_ingredients(), latte().recipe);
    }

    #[test]
    fn update_request_fields_are_optional() {
        let request: UpdateDrinkRequest = serde_json::from_value(json!({ "title": "flat white" })).unwrap();
        assert_eq!(request.title.as_deref(), Some("flat white"));
        assert!(request.recipe.is_none());
    }
}
