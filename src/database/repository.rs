use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::database::error::StoreError;
use crate::database::models::{FavsList, FavsPatch, NewFavs, NewUser, User};

/// Persistence contract for favorites lists.
///
/// Implementations validate input themselves and own the global uniqueness
/// of `name`: a duplicate surfaces as `name: is already taken` whether it was
/// caught before the write or by the backend's unique constraint.
#[async_trait]
pub trait FavsStore: Send + Sync {
    /// Persist a new list owned by `owner`
    async fn create(&self, input: NewFavs, owner: ObjectId) -> Result<FavsList, StoreError>;

    /// Every list of `owner` in insertion order, `NoContent` when there are none
    async fn find_all_by_owner(&self, owner: ObjectId) -> Result<Vec<FavsList>, StoreError>;

    /// `Cast` for a malformed id, `NotFound` for a well-formed id with no record
    async fn find_by_id(&self, id: &str) -> Result<FavsList, StoreError>;

    /// Merge supplied top-level fields and return the post-update document
    async fn update_by_id(&self, id: ObjectId, patch: FavsPatch) -> Result<FavsList, StoreError>;

    /// Remove permanently and return the removed document
    async fn delete_by_id(&self, id: ObjectId) -> Result<FavsList, StoreError>;
}

/// Persistence contract for user accounts; `email` is unique
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
