//! Uniform CRUD access to one REST collection.

use std::fmt::Display;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ApiClient, ApiError};

/// An entity served from `/<COLLECTION>` and `/<COLLECTION>/:id`.
pub trait Resource: DeserializeOwned + Send {
    const COLLECTION: &'static str;
    type Id: Display + Send + Sync;
    /// Partial form for create and update. Absent fields must not be
    /// serialized so the server leaves them unchanged.
    type Patch: Serialize + Send + Sync;
}

/// Typed CRUD over one collection.
///
/// The server assigns ids and timestamps on create. Update changes only the
/// fields present in the patch. Deleting a missing id fails with
/// `ApiError::NotFound`. No operation retries or substitutes defaults.
pub struct ResourceGateway<'a, R: Resource> {
    client: &'a ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> ResourceGateway<'a, R> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        R::COLLECTION
    }

    fn item_path(id: &R::Id) -> String {
        format!("{}/{}", R::COLLECTION, id)
    }

    /// Whole collection in server order.
    pub async fn get_all(&self) -> Result<Vec<R>, ApiError> {
        let items: Vec<R> = self.client.get(R::COLLECTION).await?;
        debug!(collection = R::COLLECTION, count = items.len(), "Fetched collection");
        Ok(items)
    }

    pub async fn get_by_id(&self, id: R::Id) -> Result<R, ApiError> {
        self.client.get(&Self::item_path(&id)).await
    }

    pub async fn create(&self, patch: &R::Patch) -> Result<R, ApiError> {
        self.client.post(R::COLLECTION, patch).await
    }

    pub async fn update(&self, id: R::Id, patch: &R::Patch) -> Result<R, ApiError> {
        self.client.put(&Self::item_path(&id), patch).await
    }

    pub async fn delete(&self, id: R::Id) -> Result<(), ApiError> {
        self.client.delete(&Self::item_path(&id)).await
    }
}

pub type StudentGateway<'a> = ResourceGateway<'a, crate::models::Student>;
pub type TeacherGateway<'a> = ResourceGateway<'a, crate::models::Teacher>;
pub type CourseGateway<'a> = ResourceGateway<'a, crate::models::Course>;
pub type EnrollmentGateway<'a> = ResourceGateway<'a, crate::models::Enrollment>;
pub type GradeGateway<'a> = ResourceGateway<'a, crate::models::Grade>;
