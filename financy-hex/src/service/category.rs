//! Category management, scoped to the owning user.

use std::sync::Arc;

use financy_types::validation::{self, CATEGORY_NAME_LIMITS};
use financy_types::{
    AppError, Category, CategoryId, CategoryRepository, CreateCategoryInput, RepoError,
    UpdateCategoryInput, UserId,
};

const CATEGORY_NAME_IN_USE: &str = "Category name is already in use.";
const CATEGORY_NOT_FOUND: &str = "Category not found.";

pub struct CategoryService<R: CategoryRepository> {
    repo: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Lists the owner's categories, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, owner: UserId) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories(owner).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateCategoryInput,
    ) -> Result<Category, AppError> {
        let name = validation::required_text(&input.name, "Category name", CATEGORY_NAME_LIMITS)?;

        self.repo
            .create_category(Category::new(name, owner))
            .await
            .map_err(|e| match e {
                RepoError::Conflict(_) => AppError::bad_input(CATEGORY_NAME_IN_USE),
                other => {
                    tracing::error!(error = %other, "category insert failed");
                    AppError::bad_input("Could not create category.")
                }
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        owner: UserId,
        input: UpdateCategoryInput,
    ) -> Result<Category, AppError> {
        let id: Option<CategoryId> = validation::record_id(&input.id, "Category ID")?;
        let name = validation::required_text(&input.name, "Category name", CATEGORY_NAME_LIMITS)?;

        let Some(id) = id else {
            return Err(AppError::not_found(CATEGORY_NOT_FOUND));
        };

        match self.repo.rename_category(id, owner, name).await {
            Ok(Some(category)) => Ok(category),
            Ok(None) => Err(AppError::not_found(CATEGORY_NOT_FOUND)),
            Err(RepoError::Conflict(_)) => Err(AppError::bad_input(CATEGORY_NAME_IN_USE)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes at most one owned category. Returns whether one was deleted.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: UserId, id: &str) -> Result<bool, AppError> {
        let Some(id) = validation::record_id::<CategoryId>(id, "Category ID")? else {
            return Ok(false);
        };

        Ok(self.repo.delete_category(id, owner).await?)
    }
}
