use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::database::error::{parse_object_id, StoreError};
use crate::database::models::{self, favs, user, FavsList, FavsPatch, NewFavs, NewUser, User};
use crate::database::repository::{FavsStore, UserStore};

/// Favorites lists held in process memory, in insertion order.
///
/// The uniqueness check and the write happen under the same write lock.
#[derive(Debug, Default)]
pub struct MemoryFavsStore {
    lists: RwLock<Vec<FavsList>>,
}

impl MemoryFavsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavsStore for MemoryFavsStore {
    async fn create(&self, input: NewFavs, owner: ObjectId) -> Result<FavsList, StoreError> {
        let valid = input.validate()?;

        let mut lists = self.lists.write().await;
        if lists.iter().any(|f| f.name == valid.name) {
            return Err(favs::name_taken());
        }
        let created = FavsList::new(valid, owner, models::now());
        lists.push(created.clone());
        Ok(created)
    }

    async fn find_all_by_owner(&self, owner: ObjectId) -> Result<Vec<FavsList>, StoreError> {
        let lists = self.lists.read().await;
        let owned: Vec<FavsList> = lists.iter().filter(|f| f.owner == owner).cloned().collect();
        if owned.is_empty() {
            return Err(StoreError::NoContent { model: favs::MODEL });
        }
        Ok(owned)
    }

    async fn find_by_id(&self, id: &str) -> Result<FavsList, StoreError> {
        let id = parse_object_id(id, favs::MODEL)?;
        let lists = self.lists.read().await;
        lists
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { model: favs::MODEL })
    }

    async fn update_by_id(&self, id: ObjectId, patch: FavsPatch) -> Result<FavsList, StoreError> {
        let patch = patch.validate()?;

        let mut lists = self.lists.write().await;
        if let Some(name) = &patch.name {
            if lists.iter().any(|f| f.id != id && &f.name == name) {
                return Err(favs::name_taken());
            }
        }
        let target = lists
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::NotFound { model: favs::MODEL })?;
        patch.apply_to(target, models::now());
        Ok(target.clone())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<FavsList, StoreError> {
        let mut lists = self.lists.write().await;
        let index = lists
            .iter()
            .position(|f| f.id == id)
            .ok_or(StoreError::NotFound { model: favs::MODEL })?;
        Ok(lists.remove(index))
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(user::email_taken());
        }
        let created = User::new(new_user, models::now());
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
