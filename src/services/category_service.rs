// src/services/category_service.rs
use std::sync::Arc;

use log::info;

use crate::application::dto::{CategoryOutput, ListInput, PaginationOutput};
use crate::domain::{
    AggregateRoot, Category, CategoryCreateCommand, CategoryFilter, CategoryId, DomainError,
    GenreFilter, SearchParams, DEFAULT_PER_PAGE,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{CategoryRepository, GenreRepository};
use crate::services::ApplicationService;

#[derive(Debug, Clone, Default)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryRequest {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    app_service: Arc<ApplicationService>,
    default_per_page: usize,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<dyn CategoryRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        app_service: Arc<ApplicationService>,
    ) -> Self {
        Self {
            category_repo,
            genre_repo,
            app_service,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn create_category(&self, request: CreateCategoryRequest) -> AppResult<CategoryOutput> {
        let category = Category::create(CategoryCreateCommand {
            name: request.name,
            description: request.description,
            is_active: request.is_active,
        })?;

        self.app_service
            .run(|_| self.category_repo.insert(&category))?;

        info!("Category created: {}", category.category_id);
        Ok(CategoryOutput::from(&category))
    }

    pub fn update_category(&self, request: UpdateCategoryRequest) -> AppResult<CategoryOutput> {
        let id = CategoryId::parse(&request.id)?;
        let mut category = self.load(&id)?;

        if let Some(name) = request.name {
            category.change_name(name);
        }
        if let Some(description) = request.description {
            category.change_description(description);
        }
        match request.is_active {
            Some(true) => category.activate(),
            Some(false) => category.deactivate(),
            None => {}
        }
        category.ensure_valid()?;

        self.app_service
            .run(|_| self.category_repo.update(&category))?;

        Ok(CategoryOutput::from(&category))
    }

    pub fn get_category(&self, id: &str) -> AppResult<CategoryOutput> {
        let id = CategoryId::parse(id)?;
        let category = self.load(&id)?;
        Ok(CategoryOutput::from(&category))
    }

    pub fn list_categories(
        &self,
        input: ListInput<CategoryFilter>,
    ) -> AppResult<PaginationOutput<CategoryOutput>> {
        let params = input.into_params(self.default_per_page);
        let result = self.category_repo.search(&params)?;
        Ok(result.map_items(|c| CategoryOutput::from(&c)).into())
    }

    /// Refused while any genre still lists the category: a genre must keep
    /// at least one
    pub fn delete_category(&self, id: &str) -> AppResult<()> {
        let id = CategoryId::parse(id)?;
        self.app_service.run(|_| {
            self.ensure_not_linked_to_genres(&id)?;
            self.category_repo.delete(&id)
        })?;
        info!("Category deleted: {}", id);
        Ok(())
    }

    fn ensure_not_linked_to_genres(&self, id: &CategoryId) -> AppResult<()> {
        let params = SearchParams::new().with_per_page(1).with_filter(GenreFilter {
            name: None,
            categories_id: Some(vec![*id]),
        });
        let linked = self.genre_repo.search(&params)?.total;
        if linked > 0 {
            return Err(DomainError::InvalidStateTransition(format!(
                "Category {} is still linked to {} genre(s)",
                id, linked
            ))
            .into());
        }
        Ok(())
    }

    fn load(&self, id: &CategoryId) -> AppResult<Category> {
        self.category_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(id, "Category"))
    }
}
