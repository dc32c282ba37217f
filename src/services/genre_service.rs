// src/services/genre_service.rs
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::application::dto::{GenreOutput, ListInput, PaginationOutput};
use crate::domain::{
    parse_ids, AggregateRoot, Category, Genre, GenreCreateCommand, GenreFilter,
    GenreId, DEFAULT_PER_PAGE,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{CategoryRepository, GenreRepository};
use crate::services::ids_exist_validator::{take_existing, CategoriesIdExistsValidator};
use crate::services::{unique_ids, ApplicationService};

#[derive(Debug, Clone, Default)]
pub struct CreateGenreRequest {
    pub name: String,
    pub categories_id: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGenreRequest {
    pub id: String,
    pub name: Option<String>,
    pub categories_id: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Listing filter with ids still in raw form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreListFilter {
    pub name: Option<String>,
    pub categories_id: Option<Vec<String>>,
}

pub struct GenreService {
    genre_repo: Arc<dyn GenreRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    categories_validator: CategoriesIdExistsValidator,
    app_service: Arc<ApplicationService>,
    default_per_page: usize,
}

impl GenreService {
    pub fn new(
        genre_repo: Arc<dyn GenreRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        app_service: Arc<ApplicationService>,
    ) -> Self {
        Self {
            genre_repo,
            categories_validator: CategoriesIdExistsValidator::new(Arc::clone(&category_repo)),
            category_repo,
            app_service,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn create_genre(&self, request: CreateGenreRequest) -> AppResult<GenreOutput> {
        let mut genre = Genre::draft(GenreCreateCommand {
            name: request.name,
            categories_id: Vec::new(),
            is_active: request.is_active,
        });

        self.sync_categories(&mut genre, &request.categories_id)?;
        genre.ensure_valid()?;

        self.app_service.run(|_| self.genre_repo.insert(&genre))?;

        info!("Genre created: {}", genre.genre_id);
        self.to_output(&genre)
    }

    pub fn update_genre(&self, request: UpdateGenreRequest) -> AppResult<GenreOutput> {
        let id = GenreId::parse(&request.id)?;
        let mut genre = self.load(&id)?;

        if let Some(name) = request.name {
            genre.change_name(name);
        }
        match request.is_active {
            Some(true) => genre.activate(),
            Some(false) => genre.deactivate(),
            None => {}
        }
        if let Some(raw_ids) = request.categories_id {
            self.sync_categories(&mut genre, &raw_ids)?;
        }
        genre.ensure_valid()?;

        self.app_service.run(|_| self.genre_repo.update(&genre))?;

        self.to_output(&genre)
    }

    pub fn get_genre(&self, id: &str) -> AppResult<GenreOutput> {
        let id = GenreId::parse(id)?;
        let genre = self.load(&id)?;
        self.to_output(&genre)
    }

    pub fn list_genres(
        &self,
        input: ListInput<GenreListFilter>,
    ) -> AppResult<PaginationOutput<GenreOutput>> {
        let params = input
            .try_map_filter(|raw| -> AppResult<GenreFilter> {
                Ok(GenreFilter {
                    name: raw.name,
                    categories_id: raw.categories_id.as_deref().map(parse_ids).transpose()?,
                })
            })?
            .into_params(self.default_per_page);
        let result = self.genre_repo.search(&params)?;

        // One lookup for every category referenced on the page
        let page_ids = unique_ids(result.items.iter().flat_map(|g| g.categories_id.iter()));
        let categories = self.category_repo.find_by_ids(&page_ids)?;

        Ok(result
            .map_items(|genre| GenreOutput::new(&genre, &categories))
            .into())
    }

    pub fn delete_genre(&self, id: &str) -> AppResult<()> {
        let id = GenreId::parse(id)?;
        self.app_service.run(|_| self.genre_repo.delete(&id))?;
        info!("Genre deleted: {}", id);
        Ok(())
    }

    /// Missing categories land in the notification; otherwise the set is
    /// replaced and must not be empty
    fn sync_categories(&self, genre: &mut Genre, raw_ids: &[String]) -> AppResult<()> {
        let checked = self.categories_validator.validate(raw_ids)?;
        let all_exist = checked.is_ok();
        let categories_id = take_existing(checked, genre.notification_mut(), "categories_id");
        if all_exist {
            genre.sync_categories_id(categories_id);
            genre.validate(Some(&["categories_id"][..]));
        }
        Ok(())
    }

    fn load(&self, id: &GenreId) -> AppResult<Genre> {
        self.genre_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(id, "Genre"))
    }

    fn to_output(&self, genre: &Genre) -> AppResult<GenreOutput> {
        let categories: Vec<Category> =
            self.category_repo.find_by_ids(&genre.categories_id.to_vec())?;
        Ok(GenreOutput::new(genre, &categories))
    }
}
