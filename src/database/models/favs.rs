use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{explicit_null, lenient_string, non_blank, serialize_object_id};
use crate::database::error::{StoreError, ValidationErrors};

pub const MODEL: &str = "Favs";
pub const TITLE_MIN_LENGTH: usize = 2;

/// A named collection of favorite items owned by one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavsList {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub name: String,
    pub list: Vec<Item>,
    #[serde(serialize_with = "serialize_object_id")]
    pub owner: ObjectId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// An item as sent by a client; nothing is trusted until validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
}

/// Body of a create request. Unknown fields such as `owner` are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFavs {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub list: Vec<ItemInput>,
}

/// Body of an update request: only supplied top-level fields change.
/// `name` is `Some(None)` when sent as an explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavsPatch {
    #[serde(default, deserialize_with = "explicit_null")]
    pub name: Option<Option<String>>,
    pub list: Option<Vec<ItemInput>>,
}

/// A create request that passed every field check
#[derive(Debug, Clone)]
pub struct ValidFavs {
    pub name: String,
    pub list: Vec<Item>,
}

/// An update request that passed every field check
#[derive(Debug, Clone, Default)]
pub struct ValidPatch {
    pub name: Option<String>,
    pub list: Option<Vec<Item>>,
}

impl NewFavs {
    pub fn validate(self) -> Result<ValidFavs, StoreError> {
        let mut errors = ValidationErrors::new(MODEL);
        let name = non_blank(self.name.as_deref());
        if name.is_none() {
            errors.add("name", "is required");
        }
        let list = validate_items(self.list, &mut errors);
        errors.into_result()?;

        Ok(ValidFavs {
            name: name.unwrap_or_default(),
            list,
        })
    }
}

impl FavsPatch {
    pub fn validate(self) -> Result<ValidPatch, StoreError> {
        let mut errors = ValidationErrors::new(MODEL);
        let name = match self.name {
            Some(raw) => {
                let name = non_blank(raw.as_deref());
                if name.is_none() {
                    errors.add("name", "is required");
                }
                name
            }
            None => None,
        };
        let list = self.list.map(|items| validate_items(items, &mut errors));
        errors.into_result()?;

        Ok(ValidPatch { name, list })
    }
}

impl ValidPatch {
    /// Merge into an existing list, replacing `list` wholesale
    pub fn apply_to(self, favs: &mut FavsList, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            favs.name = name;
        }
        if let Some(list) = self.list {
            favs.list = list;
        }
        favs.updated_at = now;
    }
}

impl FavsList {
    pub fn new(valid: ValidFavs, owner: ObjectId, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            name: valid.name,
            list: valid.list,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn name_taken() -> StoreError {
    StoreError::Validation(ValidationErrors::single(MODEL, "name", "is already taken"))
}

fn validate_items(items: Vec<ItemInput>, errors: &mut ValidationErrors) -> Vec<Item> {
    let mut list = Vec::with_capacity(items.len());
    for (index, input) in items.into_iter().enumerate() {
        let path = format!("list.{}.title", index);
        match input.title {
            Some(title) if title.is_empty() => errors.add(path, "item title is required"),
            None => errors.add(path, "item title is required"),
            Some(title) if title.chars().count() < TITLE_MIN_LENGTH => errors.add(
                path,
                format!("item title must be at least {} characters", TITLE_MIN_LENGTH),
            ),
            Some(title) => list.push(Item {
                id: ObjectId::new(),
                title,
                description: input.description,
                link: input.link,
            }),
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(title: &str) -> ItemInput {
        ItemInput {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_name() {
        let err = NewFavs::default().validate().unwrap_err();
        assert!(err.to_string().contains("name: is required"));

        let blank = NewFavs {
            name: Some("   ".to_string()),
            list: vec![],
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn create_trims_name() {
        let valid = NewFavs {
            name: Some("  books ".to_string()),
            list: vec![item("Dune")],
        }
        .validate()
        .unwrap();
        assert_eq!(valid.name, "books");
        assert_eq!(valid.list.len(), 1);
    }

    #[test]
    fn items_need_a_title_of_two_chars() {
        let err = NewFavs {
            name: Some("books".to_string()),
            list: vec![item("Dune"), ItemInput::default(), item("x")],
        }
        .validate()
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("list.1.title: item title is required"));
        assert!(message.contains("list.2.title: item title must be at least 2 characters"));
        assert!(!message.contains("list.0"));
    }

    #[test]
    fn ignores_owner_in_body() {
        let body: NewFavs = serde_json::from_value(json!({
            "name": "movies",
            "owner": "123456789012345678901234"
        }))
        .unwrap();
        assert_eq!(body.name.as_deref(), Some("movies"));
    }

    #[test]
    fn patch_replaces_list_wholesale() {
        let owner = ObjectId::new();
        let now = crate::database::models::now();
        let mut favs = FavsList::new(
            NewFavs {
                name: Some("singers".to_string()),
                list: vec![item("Cerati"), item("Spinetta")],
            }
            .validate()
            .unwrap(),
            owner,
            now,
        );

        let patch = FavsPatch {
            name: None,
            list: Some(vec![item("Calamaro")]),
        }
        .validate()
        .unwrap();
        patch.apply_to(&mut favs, now);

        assert_eq!(favs.name, "singers");
        assert_eq!(favs.list.len(), 1);
        assert_eq!(favs.list[0].title, "Calamaro");
        assert_eq!(favs.owner, owner);
    }

    #[test]
    fn patch_rejects_blank_name() {
        let patch = FavsPatch {
            name: Some(Some(String::new())),
            list: None,
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_tells_null_name_from_absent_name() {
        let patch: FavsPatch = serde_json::from_value(json!({ "name": null })).unwrap();
        assert_eq!(patch.name, Some(None));
        let err = patch.validate().unwrap_err();
        assert!(err.to_string().contains("name: is required"));

        let patch: FavsPatch = serde_json::from_value(json!({ "list": [] })).unwrap();
        assert_eq!(patch.name, None);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn scalar_fields_are_cast_to_strings() {
        let body: NewFavs = serde_json::from_value(json!({
            "name": 2024,
            "list": [{ "title": 12, "link": null }, { "title": true }]
        }))
        .unwrap();
        assert_eq!(body.name.as_deref(), Some("2024"));
        assert_eq!(body.list[0].title.as_deref(), Some("12"));
        assert_eq!(body.list[0].link, None);

        let valid = body.validate().unwrap();
        assert_eq!(valid.list[1].title, "true");

        let nested = serde_json::from_value::<NewFavs>(json!({ "name": { "nested": 1 } }));
        assert!(nested.is_err());
    }

    #[test]
    fn serializes_ids_as_hex() {
        let favs = FavsList::new(
            NewFavs {
                name: Some("books".to_string()),
                list: vec![item("Dune")],
            }
            .validate()
            .unwrap(),
            ObjectId::new(),
            crate::database::models::now(),
        );

        let value = serde_json::to_value(&favs).unwrap();
        assert_eq!(value["_id"].as_str().map(str::len), Some(24));
        assert_eq!(value["owner"], json!(favs.owner.to_hex()));
        assert!(value["list"][0]["_id"].is_string());
        assert!(value["list"][0].get("link").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
