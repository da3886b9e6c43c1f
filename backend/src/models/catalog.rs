//! Reference data managed from the admin panel: sports, categories,
//! sponsors, stories and global configuration.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sport {
    pub id: Uuid,
    pub name: String,
    pub icon_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSport {
    pub name: String,
    pub icon_url: Option<String>,
}

/// What a category groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Product,
    Venue,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Product => "product",
            CategoryKind::Venue => "venue",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSponsor {
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSponsor {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Short-lived promotional media shown on the home screen
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Story {
    pub id: Uuid,
    pub title: String,
    pub media_url: String,
    pub link_url: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Story {
    pub fn is_visible_at(&self, now: NaiveDateTime) -> bool {
        self.is_active && self.expires_at.map_or(true, |exp| exp > now)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub media_url: String,
    pub link_url: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStory {
    pub title: Option<String>,
    pub media_url: Option<String>,
    pub link_url: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

/// Key/value settings read by the clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GlobalConfig {
    pub key: String,
    pub value: Value,
    pub updated_at: NaiveDateTime,
}
