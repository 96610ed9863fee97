use async_trait::async_trait;
use shared::domain::{Customer, CustomerId};

pub mod config;
pub mod controller;
pub mod error;
pub mod http_repository;
pub mod types;

pub use controller::{parse_count, CustomerFormController};
pub use error::{FormError, RepositoryError, ValidationError};
pub use http_repository::HttpListRepository;
pub use types::{FieldEdit, FormMode, FormSnapshot, Notice, NoticeKind, SubmitOutcome};

/// Persistence collaborator for the customer form. Implementations are bound
/// to one named collection when they are constructed.
#[async_trait]
pub trait RecordsRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;
    /// Creates a record; the service assigns the identifier.
    async fn add(&self, customer: &Customer) -> Result<Customer, RepositoryError>;
    /// Overwrites the editable fields of `id`. An absent site URL clears it.
    async fn update(&self, id: CustomerId, customer: &Customer) -> Result<(), RepositoryError>;
}

/// Credentials supplied by the hosting front-end.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub bearer_token: Option<String>,
}

/// What the host hands to the component: a caption to display and the
/// session used to reach the list service.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pub caption: String,
    pub session: Session,
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/http_repository_tests.rs"]
mod http_repository_tests;
