// src/services/cast_member_service.rs
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::application::dto::{CastMemberOutput, ListInput, PaginationOutput};
use crate::domain::{
    AggregateRoot, CastMember, CastMemberCreateCommand, CastMemberFilter, CastMemberId,
    CastMemberType, DEFAULT_PER_PAGE,
};
use crate::error::{AppError, AppResult};
use crate::repositories::CastMemberRepository;
use crate::services::ApplicationService;

#[derive(Debug, Clone, Default)]
pub struct CreateCastMemberRequest {
    pub name: String,
    pub cast_member_type: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCastMemberRequest {
    pub id: String,
    pub name: Option<String>,
    pub cast_member_type: Option<i32>,
}

/// Listing filter with the type still as its raw code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMemberListFilter {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub cast_member_type: Option<i32>,
}

pub struct CastMemberService {
    cast_member_repo: Arc<dyn CastMemberRepository>,
    app_service: Arc<ApplicationService>,
    default_per_page: usize,
}

impl CastMemberService {
    pub fn new(
        cast_member_repo: Arc<dyn CastMemberRepository>,
        app_service: Arc<ApplicationService>,
    ) -> Self {
        Self {
            cast_member_repo,
            app_service,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn create_cast_member(
        &self,
        request: CreateCastMemberRequest,
    ) -> AppResult<CastMemberOutput> {
        let (kind, kind_error) = CastMemberType::create(request.cast_member_type).as_array();
        let mut cast_member = CastMember::draft(CastMemberCreateCommand {
            name: request.name,
            cast_member_type: kind.unwrap_or_default(),
        });
        if let Some(error) = kind_error {
            cast_member
                .notification_mut()
                .set_error(error.to_string(), Some("type"));
        }
        cast_member.ensure_valid()?;

        self.app_service
            .run(|_| self.cast_member_repo.insert(&cast_member))?;

        info!(
            "Cast member created: {} ({})",
            cast_member.cast_member_id, cast_member.cast_member_type
        );
        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn update_cast_member(
        &self,
        request: UpdateCastMemberRequest,
    ) -> AppResult<CastMemberOutput> {
        let id = CastMemberId::parse(&request.id)?;
        let mut cast_member = self.load(&id)?;

        if let Some(name) = request.name {
            cast_member.change_name(name);
        }
        if let Some(code) = request.cast_member_type {
            match CastMemberType::create(code).into_result() {
                Ok(kind) => cast_member.change_type(kind),
                Err(error) => cast_member
                    .notification_mut()
                    .set_error(error.to_string(), Some("type")),
            }
        }
        cast_member.ensure_valid()?;

        self.app_service
            .run(|_| self.cast_member_repo.update(&cast_member))?;

        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn get_cast_member(&self, id: &str) -> AppResult<CastMemberOutput> {
        let id = CastMemberId::parse(id)?;
        let cast_member = self.load(&id)?;
        Ok(CastMemberOutput::from(&cast_member))
    }

    pub fn list_cast_members(
        &self,
        input: ListInput<CastMemberListFilter>,
    ) -> AppResult<PaginationOutput<CastMemberOutput>> {
        let params = input
            .try_map_filter(|raw| -> AppResult<CastMemberFilter> {
                let cast_member_type = raw
                    .cast_member_type
                    .map(|code| {
                        CastMemberType::create(code)
                            .into_result()
                            .map_err(|error| AppError::field_validation("type", error.to_string()))
                    })
                    .transpose()?;
                Ok(CastMemberFilter {
                    name: raw.name,
                    cast_member_type,
                })
            })?
            .into_params(self.default_per_page);
        let result = self.cast_member_repo.search(&params)?;
        Ok(result.map_items(|c| CastMemberOutput::from(&c)).into())
    }

    pub fn delete_cast_member(&self, id: &str) -> AppResult<()> {
        let id = CastMemberId::parse(id)?;
        self.app_service
            .run(|_| self.cast_member_repo.delete(&id))?;
        info!("Cast member deleted: {}", id);
        Ok(())
    }

    fn load(&self, id: &CastMemberId) -> AppResult<CastMember> {
        self.cast_member_repo
            .find_by_id(id)?
            .ok_or_else(|| AppError::not_found(id, "CastMember"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, InMemoryMessageBroker};
    use crate::repositories::{InMemoryCastMemberRepository, InMemoryUnitOfWork};

    fn service() -> (Arc<InMemoryCastMemberRepository>, CastMemberService) {
        let repo = Arc::new(InMemoryCastMemberRepository::new());
        let app_service = Arc::new(ApplicationService::new(
            Arc::new(InMemoryUnitOfWork::new()),
            Arc::new(EventBus::new()),
            Arc::new(InMemoryMessageBroker::new()),
        ));
        (Arc::clone(&repo), CastMemberService::new(repo, app_service))
    }

    #[test]
    fn test_create_cast_member_stores_type_code() {
        let (repo, service) = service();

        let output = service
            .create_cast_member(CreateCastMemberRequest {
                name: "Denis Villeneuve".into(),
                cast_member_type: 1,
            })
            .unwrap();

        assert_eq!(output.cast_member_type, 1);
        assert_eq!(
            repo.items()[0].cast_member_type,
            CastMemberType::Director
        );
    }

    #[test]
    fn test_create_accumulates_name_and_type_errors() {
        let (repo, service) = service();

        let err = service
            .create_cast_member(CreateCastMemberRequest {
                name: String::new(),
                cast_member_type: 5,
            })
            .unwrap_err();

        let AppError::EntityValidation(entries) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<Option<&str>> = entries.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec![Some("name"), Some("type")]);
        assert!(repo.items().is_empty());
    }

    #[test]
    fn test_update_rejects_unknown_type() {
        let (repo, service) = service();
        let actor = CastMember::fake().with_name("Actor").build();
        repo.insert(&actor).unwrap();

        let err = service
            .update_cast_member(UpdateCastMemberRequest {
                id: actor.cast_member_id.to_string(),
                name: Some("Renamed".into()),
                cast_member_type: Some(0),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::EntityValidation(_)));
        assert_eq!(repo.items()[0].name, "Actor");

        let updated = service
            .update_cast_member(UpdateCastMemberRequest {
                id: actor.cast_member_id.to_string(),
                name: None,
                cast_member_type: Some(1),
            })
            .unwrap();
        assert_eq!(updated.cast_member_type, CastMemberType::Director.code());
    }

    #[test]
    fn test_list_cast_members_by_type() {
        let (repo, service) = service();
        repo.bulk_insert(&[
            CastMember::fake().with_name("Greta Gerwig").director().build(),
            CastMember::fake().with_name("Cillian Murphy").build(),
        ])
        .unwrap();

        let page = service
            .list_cast_members(ListInput {
                filter: Some(CastMemberListFilter {
                    name: None,
                    cast_member_type: Some(1),
                }),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Greta Gerwig");

        let err = service
            .list_cast_members(ListInput {
                filter: Some(CastMemberListFilter {
                    name: None,
                    cast_member_type: Some(9),
                }),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, AppError::EntityValidation(_)));
    }

    #[test]
    fn test_delete_unknown_cast_member() {
        let (_, service) = service();
        let missing = CastMemberId::new().to_string();

        let err = service.delete_cast_member(&missing).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("CastMember Not Found using ID {missing}")
        );
    }
}
