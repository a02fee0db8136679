use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::error::{parse_object_id, StoreError};
use crate::database::models::{self, favs, user, FavsList, FavsPatch, Item, NewFavs, NewUser, User};
use crate::database::repository::{FavsStore, UserStore};

const DUPLICATE_KEY: i32 = 11000;

pub const FAVS_COLLECTION: &str = "favs";
pub const USERS_COLLECTION: &str = "users";

/// Favorites lists in the `favs` collection.
///
/// `name` carries a unique index; the index is the only uniqueness check.
#[derive(Debug, Clone)]
pub struct MongoFavsStore {
    collection: Collection<FavsDoc>,
}

impl MongoFavsStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(FAVS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_owner = IndexModel::builder().keys(doc! { "owner": 1 }).build();
        self.collection.create_indexes([unique_name, by_owner], None).await?;
        Ok(())
    }
}

#[async_trait]
impl FavsStore for MongoFavsStore {
    async fn create(&self, input: NewFavs, owner: ObjectId) -> Result<FavsList, StoreError> {
        let created = FavsList::new(input.validate()?, owner, models::now());

        match self.collection.insert_one(FavsDoc::from(&created), None).await {
            Ok(_) => Ok(created),
            Err(e) if is_duplicate_key(&e) => Err(favs::name_taken()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all_by_owner(&self, owner: ObjectId) -> Result<Vec<FavsList>, StoreError> {
        let cursor = self.collection.find(doc! { "owner": owner }, None).await?;
        let docs: Vec<FavsDoc> = cursor.try_collect().await?;
        if docs.is_empty() {
            return Err(StoreError::NoContent { model: favs::MODEL });
        }
        Ok(docs.into_iter().map(FavsList::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<FavsList, StoreError> {
        let id = parse_object_id(id, favs::MODEL)?;
        match self.collection.find_one(doc! { "_id": id }, None).await? {
            Some(doc) => Ok(doc.into()),
            None => Err(StoreError::NotFound { model: favs::MODEL }),
        }
    }

    async fn update_by_id(&self, id: ObjectId, patch: FavsPatch) -> Result<FavsList, StoreError> {
        let patch = patch.validate()?;

        let mut set = doc! { "updatedAt": to_bson_datetime(models::now()) };
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(list) = patch.list {
            let items: Vec<ItemDoc> = list.iter().map(ItemDoc::from).collect();
            set.insert("list", bson::to_bson(&items)?);
        }
        debug!(%id, fields = ?set.keys().collect::<Vec<_>>(), "updating favs list");

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        match self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await
        {
            Ok(Some(doc)) => Ok(doc.into()),
            Ok(None) => Err(StoreError::NotFound { model: favs::MODEL }),
            Err(e) if is_duplicate_key(&e) => Err(favs::name_taken()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<FavsList, StoreError> {
        match self.collection.find_one_and_delete(doc! { "_id": id }, None).await? {
            Some(doc) => Ok(doc.into()),
            None => Err(StoreError::NotFound { model: favs::MODEL }),
        }
    }
}

/// User accounts in the `users` collection, unique on `email`
#[derive(Debug, Clone)]
pub struct MongoUserStore {
    collection: Collection<UserDoc>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(unique_email, None).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let created = User::new(new_user, models::now());

        match self.collection.insert_one(UserDoc::from(&created), None).await {
            Ok(_) => Ok(created),
            Err(e) if is_duplicate_key(&e) => Err(user::email_taken()),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = self.collection.find_one(doc! { "email": email }, None).await?;
        Ok(found.map(User::from))
    }
}

/// Unique index violations come back as write errors from inserts and as
/// command errors from find-and-modify
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(dt.timestamp_millis()).single().unwrap_or_default()
}

/// Stored form of a favorites list: native ObjectIds and BSON dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FavsDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    #[serde(default)]
    list: Vec<ItemDoc>,
    owner: ObjectId,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ItemDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UserDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    password: String,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
}

impl From<&Item> for ItemDoc {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            link: item.link.clone(),
        }
    }
}

impl From<ItemDoc> for Item {
    fn from(doc: ItemDoc) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            link: doc.link,
        }
    }
}

impl From<&FavsList> for FavsDoc {
    fn from(favs: &FavsList) -> Self {
        Self {
            id: favs.id,
            name: favs.name.clone(),
            list: favs.list.iter().map(ItemDoc::from).collect(),
            owner: favs.owner,
            created_at: to_bson_datetime(favs.created_at),
            updated_at: to_bson_datetime(favs.updated_at),
        }
    }
}

impl From<FavsDoc> for FavsList {
    fn from(doc: FavsDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            list: doc.list.into_iter().map(Item::from).collect(),
            owner: doc.owner,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

impl From<&User> for UserDoc {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            password: user.password.clone(),
            created_at: to_bson_datetime(user.created_at),
            updated_at: to_bson_datetime(user.updated_at),
        }
    }
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        Self {
            id: doc.id,
            email: doc.email,
            name: doc.name,
            password: doc.password,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ItemInput;

    fn singers(name: &str) -> NewFavs {
        NewFavs {
            name: Some(name.to_string()),
            list: vec![
                ItemInput {
                    title: Some("Cerati".to_string()),
                    link: Some("https://example.com".to_string()),
                    ..Default::default()
                },
                ItemInput {
                    title: Some("Spinetta".to_string()),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn stored_favs_use_native_bson_types() {
        let favs = FavsList::new(singers("singers").validate().unwrap(), ObjectId::new(), models::now());

        let doc = bson::to_document(&FavsDoc::from(&favs)).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), favs.id);
        assert_eq!(doc.get_object_id("owner").unwrap(), favs.owner);
        assert!(doc.get_datetime("createdAt").is_ok());
        let items = doc.get_array("list").unwrap();
        assert!(items[0].as_document().unwrap().get_object_id("_id").is_ok());
        assert!(items[1].as_document().unwrap().get("link").is_none());

        let stored: FavsDoc = bson::from_document(doc).unwrap();
        assert_eq!(FavsList::from(stored), favs);
    }

    #[test]
    fn stored_user_keeps_password_hash() {
        let user = User::new(
            NewUser {
                email: "owner@email.com".to_string(),
                password_hash: "$2b$10$hash".to_string(),
                name: None,
            },
            models::now(),
        );

        let doc = bson::to_document(&UserDoc::from(&user)).unwrap();
        assert_eq!(doc.get_str("password").unwrap(), "$2b$10$hash");
        assert!(doc.get("name").is_none());
    }

    #[test]
    fn malformed_items_are_rejected_not_dropped() {
        let now = bson::DateTime::now();
        let base = doc! {
            "_id": ObjectId::new(),
            "name": "singers",
            "owner": ObjectId::new(),
            "createdAt": now,
            "updatedAt": now,
        };

        let mut doc = base.clone();
        doc.insert("list", vec![bson::Bson::Int32(5)]);
        assert!(bson::from_document::<FavsDoc>(doc).is_err());

        let mut doc = base;
        doc.insert(
            "list",
            vec![bson::Bson::Document(doc! { "_id": ObjectId::new(), "title": "Cerati", "link": 7 })],
        );
        assert!(bson::from_document::<FavsDoc>(doc).is_err());
    }

    /// Runs against a live server: `DATABASE_URL=mongodb://localhost:27017 cargo test -- --ignored`
    mod live {
        use super::*;
        use mongodb::options::ClientOptions;
        use mongodb::Client;

        async fn database() -> Option<Database> {
            let url = std::env::var("DATABASE_URL").ok()?;
            let options = ClientOptions::parse(&url).await.ok()?;
            let client = Client::with_options(options).ok()?;
            Some(client.database(&format!("favs_test_{}", ObjectId::new().to_hex())))
        }

        #[tokio::test]
        #[ignore]
        async fn unique_index_reports_taken_names() {
            let Some(db) = database().await else { return };
            let store = MongoFavsStore::new(&db);
            store.ensure_indexes().await.unwrap();

            let first = store.create(singers("singers"), ObjectId::new()).await.unwrap();
            let second = store.create(singers("bands"), ObjectId::new()).await.unwrap();

            let err = store.create(singers("singers"), ObjectId::new()).await.unwrap_err();
            assert!(err.to_string().contains("name: is already taken"));

            let rename = FavsPatch {
                name: Some(Some("singers".to_string())),
                list: None,
            };
            let err = store.update_by_id(second.id, rename).await.unwrap_err();
            assert!(err.to_string().contains("name: is already taken"));

            let found = store.find_by_id(&first.id.to_hex()).await.unwrap();
            assert_eq!(found, first);

            db.drop(None).await.unwrap();
        }

        #[tokio::test]
        #[ignore]
        async fn missing_documents_are_not_found() {
            let Some(db) = database().await else { return };
            let store = MongoFavsStore::new(&db);
            store.ensure_indexes().await.unwrap();

            let patch = FavsPatch {
                name: Some(Some("renamed".to_string())),
                list: None,
            };
            assert!(matches!(
                store.update_by_id(ObjectId::new(), patch).await,
                Err(StoreError::NotFound { .. })
            ));
            assert!(matches!(
                store.delete_by_id(ObjectId::new()).await,
                Err(StoreError::NotFound { .. })
            ));
            assert!(matches!(
                store.find_all_by_owner(ObjectId::new()).await,
                Err(StoreError::NoContent { .. })
            ));

            let users = MongoUserStore::new(&db);
            users.ensure_indexes().await.unwrap();
            let user = NewUser {
                email: "owner@email.com".to_string(),
                password_hash: "$2b$04$hash".to_string(),
                name: None,
            };
            users.create(user.clone()).await.unwrap();
            let err = users.create(user).await.unwrap_err();
            assert!(err.to_string().contains("email: is already taken"));

            db.drop(None).await.unwrap();
        }
    }
}
