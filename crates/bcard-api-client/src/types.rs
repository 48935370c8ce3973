// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// A business card as served by the bcard directory.
///
/// The local copy is a cache; the remote service is the source of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub web: String,

    #[serde(default)]
    pub image: CardImage,

    #[serde(default)]
    pub address: CardAddress,

    #[serde(rename = "bizNumber", default)]
    pub biz_number: u64,

    // User ids of everyone who liked this card. Set semantics: no duplicates.
    #[serde(default)]
    pub likes: Vec<String>,

    // The owner arrives under either of two historical field names.
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub legacy_user_id: Option<String>,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Card {
    /// The creating user's id, checking both historical field names.
    /// First non-empty wins.
    pub fn owner_id(&self) -> Option<&str> {
        [self.user_id.as_deref(), self.legacy_user_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id().map_or(false, |owner| owner == user_id)
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }
}

/// Card image on the wire: either a bare url string or a structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardImage {
    Url(String),
    Structured {
        #[serde(default)]
        url: String,
        #[serde(default)]
        alt: String,
    },
}

impl CardImage {
    pub fn url(&self) -> &str {
        match self {
            CardImage::Url(url) => url,
            CardImage::Structured { url, .. } => url,
        }
    }

    pub fn alt(&self) -> &str {
        match self {
            CardImage::Url(_) => "",
            CardImage::Structured { alt, .. } => alt,
        }
    }
}

impl Default for CardImage {
    fn default() -> Self {
        CardImage::Url(String::new())
    }
}

/// Card address on the wire: either free text or a structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardAddress {
    Structured(Address),
    Text(String),
}

impl CardAddress {
    /// Normalize both wire forms to the structured shape. Free text lands in
    /// the street field with everything else empty.
    pub fn to_structured(&self) -> Address {
        match self {
            CardAddress::Structured(address) => address.clone(),
            CardAddress::Text(text) => Address {
                street: text.clone(),
                ..Default::default()
            },
        }
    }
}

impl Default for CardAddress {
    fn default() -> Self {
        CardAddress::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub street: String,

    #[serde(rename = "houseNumber", default)]
    pub house_number: u64,

    #[serde(default)]
    pub zip: u64,
}

/// A registered directory user, as returned by the user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: UserName,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(rename = "isBusiness", default)]
    pub is_business: bool,

    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<CardAddress>,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Display name on the wire: a plain string on older records, a structured
/// object on newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserName {
    Structured {
        #[serde(default)]
        first: String,
        #[serde(default)]
        middle: String,
        #[serde(default)]
        last: String,
    },
    Text(String),
}

impl UserName {
    pub fn display(&self) -> String {
        match self {
            UserName::Text(name) => name.clone(),
            UserName::Structured { first, middle, last } => [first, middle, last]
                .into_iter()
                .filter(|part| !part.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl Default for UserName {
    fn default() -> Self {
        UserName::Text(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_json(image: &str, address: &str) -> String {
        format!(
            r#"{{
                "_id": "c1",
                "title": "Plumbing",
                "subtitle": "24/7",
                "description": "Emergency plumbing",
                "image": {image},
                "address": {address},
                "bizNumber": 1234567,
                "likes": ["u2"],
                "user_id": "u1"
            }}"#
        )
    }

    #[test]
    fn image_accepts_both_wire_forms() {
        let bare: Card =
            serde_json::from_str(&card_json(r#""https://x/img.png""#, r#""Main st 1""#)).unwrap();
        assert_eq!(bare.image.url(), "https://x/img.png");
        assert_eq!(bare.image.alt(), "");

        let structured: Card = serde_json::from_str(&card_json(
            r#"{"url": "https://x/img.png", "alt": "logo"}"#,
            r#""Main st 1""#,
        ))
        .unwrap();
        assert_eq!(structured.image.url(), "https://x/img.png");
        assert_eq!(structured.image.alt(), "logo");
    }

    #[test]
    fn address_accepts_both_wire_forms() {
        let text: Card =
            serde_json::from_str(&card_json(r#""""#, r#""Main st 1, Tel Aviv""#)).unwrap();
        assert_eq!(text.address.to_structured().street, "Main st 1, Tel Aviv");

        let structured: Card = serde_json::from_str(&card_json(
            r#""""#,
            r#"{"street": "Main", "houseNumber": 1, "city": "Tel Aviv", "state": "", "zip": 12345, "country": "Israel"}"#,
        ))
        .unwrap();
        let address = structured.address.to_structured();
        assert_eq!(address.street, "Main");
        assert_eq!(address.house_number, 1);
        assert_eq!(address.zip, 12345);
    }

    #[test]
    fn owner_id_checks_both_legacy_fields() {
        let mut card: Card =
            serde_json::from_str(&card_json(r#""""#, r#""""#)).unwrap();
        assert_eq!(card.owner_id(), Some("u1"));

        card.user_id = Some(String::new());
        card.legacy_user_id = Some("u9".to_string());
        assert_eq!(card.owner_id(), Some("u9"));

        card.legacy_user_id = None;
        assert_eq!(card.owner_id(), None);
    }
}
