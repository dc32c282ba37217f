// src/domain/shared/mod.rs
//
// Building blocks shared by every aggregate: identifiers, the Either result
// container, the Notification accumulator, declarative field validation and
// the search contract.

pub mod aggregate;
pub mod either;
pub mod identifier;
pub mod notification;
pub mod related_ids;
pub mod search;
pub mod validator_fields;

pub use aggregate::{AggregateEvents, AggregateRoot, Entity};
pub use either::{Either, Slot};
pub use identifier::{parse_ids, EntityId};
pub use notification::{Notification, NotificationEntry};
pub use related_ids::RelatedIds;
pub use search::{
    contains_ignore_case, fold_case, SearchParams, SearchResult, Searchable, SortDirection,
    SortValue, DEFAULT_PER_PAGE,
};
pub use validator_fields::{validate_rules, ValidatorFields};
