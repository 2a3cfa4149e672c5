//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead.

use crate::domain::types::TypeConstraintError;
use crate::forms::products::ProductFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Validation(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
