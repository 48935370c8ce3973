// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Address;

pub const DEFAULT_COUNTRY: &str = "Israel";
pub const BIZ_NUMBER_MIN: u64 = 1_000_000;
pub const BIZ_NUMBER_MAX: u64 = 9_999_999;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequestBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequestBody {
    pub name: NameBody,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub image: ImageBody,
    pub address: Address,
    #[serde(rename = "isBusiness")]
    pub is_business: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NameBody {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl NameBody {
    /// Split a free-form display name into the nested shape the registration
    /// endpoint expects. First whitespace-separated word becomes the first
    /// name, the second (when present) the last name.
    pub fn from_display(name: &str) -> Self {
        let mut parts = name.split_whitespace();
        let first = parts.next().unwrap_or(name).to_string();
        let last = parts.next().unwrap_or("").to_string();
        NameBody {
            first,
            middle: String::new(),
            last,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImageBody {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Flat card form input as collected by a create/edit page. House number,
/// zip and bizNumber arrive as strings and are parsed at submission time.
#[derive(Debug, Clone, Default)]
pub struct CardForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image_url: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub zip: String,
    pub biz_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequestBody {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image: ImageBody,
    pub address: Address,
    pub biz_number: u64,
}

impl CreateCardRequestBody {
    pub fn from_form(form: CardForm) -> Self {
        let biz_number = form
            .biz_number
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or_else(generate_biz_number);
        CreateCardRequestBody {
            image: ImageBody {
                url: form.image_url,
                alt: image_alt_for(&form.title),
            },
            address: Address {
                state: String::new(),
                country: non_empty(form.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
                city: form.city,
                street: form.street,
                house_number: form.house_number.parse().unwrap_or(0),
                zip: form.zip.parse().unwrap_or(0),
            },
            biz_number,
            title: form.title,
            subtitle: form.subtitle,
            description: form.description,
            phone: form.phone,
            email: form.email,
            web: form.web,
        }
    }
}

/// Partial card update. Only fields the caller actually supplied are
/// serialized; omitted fields are left untouched server-side.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub biz_number: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageBody>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Flat edit-form input; empty strings mean "not supplied".
#[derive(Debug, Clone, Default)]
pub struct CardUpdateForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image_url: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
    pub zip: String,
    pub biz_number: String,
}

impl UpdateCardRequestBody {
    pub fn from_form(form: CardUpdateForm) -> Self {
        let image = non_empty(form.image_url).map(|url| ImageBody {
            url,
            alt: image_alt_for(&form.title),
        });

        // Address sub-fields are only sent as a group, and only when at
        // least city or street is present. A partial address is never sent
        // alone.
        let address = if !form.city.is_empty() || !form.street.is_empty() {
            Some(Address {
                state: String::new(),
                country: non_empty(form.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
                city: form.city,
                street: form.street,
                house_number: form.house_number.parse().unwrap_or(0),
                zip: form.zip.parse().unwrap_or(0),
            })
        } else {
            None
        };

        UpdateCardRequestBody {
            biz_number: form.biz_number.parse().ok().filter(|n| *n > 0),
            title: non_empty(form.title),
            subtitle: non_empty(form.subtitle),
            description: non_empty(form.description),
            phone: non_empty(form.phone),
            email: non_empty(form.email),
            web: non_empty(form.web),
            image,
            address,
        }
    }
}

fn image_alt_for(title: &str) -> String {
    if title.is_empty() {
        "Business card image".to_string()
    } else {
        title.to_string()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn generate_biz_number() -> u64 {
    rand::thread_rng().gen_range(BIZ_NUMBER_MIN..=BIZ_NUMBER_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_generates_biz_number_in_range() {
        for _ in 0..32 {
            let body = CreateCardRequestBody::from_form(CardForm {
                title: "Plumbing".to_string(),
                ..Default::default()
            });
            assert!((BIZ_NUMBER_MIN..=BIZ_NUMBER_MAX).contains(&body.biz_number));
        }
    }

    #[test]
    fn create_body_keeps_explicit_biz_number() {
        let body = CreateCardRequestBody::from_form(CardForm {
            biz_number: "42".to_string(),
            ..Default::default()
        });
        assert_eq!(body.biz_number, 42);
    }

    #[test]
    fn create_body_defaults_country_and_alt() {
        let body = CreateCardRequestBody::from_form(CardForm {
            title: "Plumbing".to_string(),
            image_url: "https://x/img.png".to_string(),
            ..Default::default()
        });
        assert_eq!(body.address.country, "Israel");
        assert_eq!(body.image.alt, "Plumbing");
    }

    #[test]
    fn update_body_omits_untouched_fields() {
        let body = UpdateCardRequestBody::from_form(CardUpdateForm {
            title: "New title".to_string(),
            ..Default::default()
        });
        let json = serde_json::to_value(&body).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["title"], "New title");
    }

    #[test]
    fn update_body_never_sends_partial_address() {
        let zip_only = UpdateCardRequestBody::from_form(CardUpdateForm {
            zip: "12345".to_string(),
            ..Default::default()
        });
        assert!(zip_only.address.is_none());

        let with_city = UpdateCardRequestBody::from_form(CardUpdateForm {
            city: "Haifa".to_string(),
            zip: "12345".to_string(),
            ..Default::default()
        });
        let address = with_city.address.unwrap();
        assert_eq!(address.city, "Haifa");
        assert_eq!(address.zip, 12345);
    }

    #[test]
    fn name_split_from_display() {
        let name = NameBody::from_display("Ada Lovelace");
        assert_eq!(name.first, "Ada");
        assert_eq!(name.last, "Lovelace");

        let single = NameBody::from_display("Ada");
        assert_eq!(single.first, "Ada");
        assert_eq!(single.last, "");
    }
}
