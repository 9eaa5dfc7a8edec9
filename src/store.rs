// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drink store.
//!
//! Drinks are kept in id order; ids are assigned sequentially from 1 and
//! never reused. Titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, DrinkId, Ingredient, UpdateDrinkRequest};

#[derive(Default)]
pub struct InMemoryStore {
    drinks: BTreeMap<DrinkId, Drink>,
    last_id: DrinkId,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the demo `water` drink.
    pub fn with_demo_drink() -> Self {
        let mut store = Self::new();
        store.insert(
            "water".to_string(),
            vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        );
        store
    }

    pub fn list_drinks(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn drink(&self, id: DrinkId) -> Result<&Drink, ApiError> {
        self.drinks.get(&id).ok_or_else(ApiError::not_found)
    }

    pub fn create_drink(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        let title = validate_title(&request.title)?;
        let recipe = validate_recipe(request.recipe.into_ingredients())?;
        self.ensure_title_free(&title, None)?;

        Ok(self.insert(title, recipe))
    }

    pub fn update_drink(
        &mut self,
        id: DrinkId,
        request: UpdateDrinkRequest,
    ) -> Result<Drink, ApiError> {
        self.drink(id)?;

        let title = request.title.as_deref().map(validate_title).transpose()?;
        let recipe = request
            .recipe
            .map(|recipe| validate_recipe(recipe.into_ingredients()))
            .transpose()?;
        if let Some(title) = &title {
            self.ensure_title_free(title, Some(id))?;
        }

        let drink = self.drinks.get_mut(&id).ok_or_else(ApiError::not_found)?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }

        Ok(drink.clone())
    }

    pub fn delete_drink(&mut self, id: DrinkId) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found())
        }
    }

    fn insert(&mut self, title: String, recipe: Vec<Ingredient>) -> Drink {
        self.last_id += 1;
        let drink = Drink {
            id: self.last_id,
            title,
            recipe,
        };
        self.drinks.insert(drink.id, drink.clone());
        drink
    }

    fn ensure_title_free(&self, title: &str, except: Option<DrinkId>) -> Result<(), ApiError> {
        let taken = self
            .drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except);

        if taken {
            Err(ApiError::unprocessable(format!(
                "A drink titled '{title}' already exists."
            )))
        } else {
            Ok(())
        }
    }
}

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::unprocessable("Drink title must not be empty."));
    }
    Ok(title.to_string())
}

fn validate_recipe(recipe: Vec<Ingredient>) -> Result<Vec<Ingredient>, ApiError> {
    if recipe.is_empty() {
        return Err(ApiError::unprocessable(
            "Drink recipe must contain at least one ingredient.",
        ));
    }
    Ok(recipe)
}
