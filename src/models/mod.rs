use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::error::{ApiError, FieldErrors};

pub const GENDERS: [&str; 2] = ["Male", "Female"];

/// Fields a payload must carry on create and full update.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "gender", "bank", "shop"];

/// Player row as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub own_money: i64,
    pub credit: i64,
    pub bank: i64,
    pub shop: i64,
}

impl Player {
    pub fn fields(&self) -> PlayerFields {
        PlayerFields {
            name: self.name.clone(),
            gender: self.gender.clone(),
            own_money: self.own_money,
            credit: self.credit,
            bank: self.bank,
            shop: self.shop,
        }
    }
}

/// The writable columns of a player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFields {
    pub name: String,
    pub gender: String,
    pub own_money: i64,
    pub credit: i64,
    pub bank: i64,
    pub shop: i64,
}

impl PlayerFields {
    /// Overwrites every field the payload supplies and keeps the rest.
    pub fn merged(mut self, payload: PlayerPayload) -> Self {
        if let Some(name) = payload.name {
            self.name = name;
        }
        if let Some(gender) = payload.gender {
            self.gender = gender;
        }
        if let Some(own_money) = payload.own_money {
            self.own_money = own_money;
        }
        if let Some(credit) = payload.credit {
            self.credit = credit;
        }
        if let Some(bank) = payload.bank {
            self.bank = bank;
        }
        if let Some(shop) = payload.shop {
            self.shop = shop;
        }
        self
    }
}

/// Incoming player body. Absent fields are `None`; `id` and unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct PlayerPayload {
    #[validate(length(min = 1, max = 100, message = "Must be between 1 and 100 characters."))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub own_money: Option<i64>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub credit: Option<i64>,
    pub bank: Option<i64>,
    pub shop: Option<i64>,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_choice");
        err.message = Some(format!("\"{}\" is not a valid choice.", gender).into());
        Err(err)
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn take_field<T: DeserializeOwned>(
    body: &Map<String, Value>,
    field: &str,
    type_message: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                push_error(errors, field, type_message);
                None
            }
        },
    }
}

impl PlayerPayload {
    /// Parses and validates a request body.
    ///
    /// With `partial` false every field in [`REQUIRED_FIELDS`] must be present.
    /// All problems are collected and reported together, keyed by field.
    pub fn parse(body: Value, partial: bool) -> Result<Self, ApiError> {
        let Value::Object(body) = body else {
            return Err(ApiError::BadRequest(
                "Invalid data. Expected a JSON object.".to_string(),
            ));
        };

        let mut errors = FieldErrors::new();
        let payload = PlayerPayload {
            name: take_field::<String>(&body, "name", "Not a valid string.", &mut errors)
                .map(|name| name.trim().to_string()),
            gender: take_field(&body, "gender", "Not a valid string.", &mut errors),
            own_money: take_field(&body, "own_money", "A valid integer is required.", &mut errors),
            credit: take_field(&body, "credit", "A valid integer is required.", &mut errors),
            bank: take_field(&body, "bank", "Incorrect type. Expected pk value.", &mut errors),
            shop: take_field(&body, "shop", "Incorrect type. Expected pk value.", &mut errors),
        };

        if !partial {
            for field in REQUIRED_FIELDS {
                let supplied = body.get(field).is_some_and(|value| !value.is_null());
                if !supplied {
                    push_error(&mut errors, field, "This field is required.");
                }
            }
        }

        if let Err(invalid) = payload.validate() {
            for (field, field_errors) in invalid.field_errors() {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    push_error(&mut errors, &field.to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Query parameters accepted by `GET /players`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPlayersQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bank: Option<i64>,
    #[serde(default)]
    pub shop: Option<i64>,
}

impl ListPlayersQuery {
    pub fn filter(&self) -> PlayerFilter {
        PlayerFilter {
            name: self.name.clone(),
            gender: self.gender.clone(),
            bank: self.bank,
            shop: self.shop,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }
}

/// Exact-match filters for listing; `None` matches everything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub bank: Option<i64>,
    pub shop: Option<i64>,
}

impl PlayerFilter {
    /// Query-string form of the active filters, e.g. `&gender=Male`.
    pub fn to_query_suffix(&self) -> String {
        let mut suffix = String::new();
        if let Some(name) = &self.name {
            suffix.push_str(&format!("&name={}", urlencoding::encode(name)));
        }
        if let Some(gender) = &self.gender {
            suffix.push_str(&format!("&gender={}", urlencoding::encode(gender)));
        }
        if let Some(bank) = self.bank {
            suffix.push_str(&format!("&bank={}", bank));
        }
        if let Some(shop) = self.shop {
            suffix.push_str(&format!("&shop={}", shop));
        }
        suffix
    }
}

/// Limit/offset page envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
