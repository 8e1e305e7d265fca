//! Defines the category store trait.

use std::future::Future;

use crate::{
    category::{Category, CategoryName},
    stores::RemoteError,
};

/// Provides read-only access to the categories transactions may reference.
pub trait CategoryStore {
    /// Retrieve every category.
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>, RemoteError>> + Send;
}

/// Retrieve the categories from `store`, or [default_categories] if the store fails.
pub async fn categories_or_default<S: CategoryStore>(store: &S) -> Vec<Category> {
    match store.categories().await {
        Ok(categories) => categories,
        Err(error) => {
            tracing::warn!("Failed to load categories, using defaults: {error}");
            default_categories()
        }
    }
}

/// The categories to fall back on when the category store cannot be reached.
pub fn default_categories() -> Vec<Category> {
    [
        "Salary",
        "Freelance",
        "Food",
        "Transport",
        "Housing",
        "Utilities",
        "Entertainment",
        "Shopping",
        "Healthcare",
        "Other",
    ]
    .into_iter()
    .zip(1..)
    .map(|(name, id)| Category {
        id,
        name: CategoryName::new_unchecked(name),
    })
    .collect()
}
