use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SeedError;

/// Maps a natural key (username, common name, group name) to a backend id
pub type IdMap = HashMap<String, String>;

/// Account roles understood by the user service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Guest,
    BasicUser,
    AdminUser,
    SuperUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::BasicUser => "BASIC_USER",
            Role::AdminUser => "ADMIN_USER",
            Role::SuperUser => "SUPER_USER",
        }
    }

    /// Signup always yields a basic account, anything else needs a role change
    pub fn needs_assignment(&self) -> bool {
        *self != Role::BasicUser
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generation of the backend API the seeder talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// JSON bodies against /users, /birds, /groups, /posts
    Legacy,
    /// Signup/login plus multipart bodies against /birds, /groups, /sightings
    #[default]
    Multipart,
}

impl Flavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Legacy => "legacy",
            Flavor::Multipart => "multipart",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" | "json" => Ok(Flavor::Legacy),
            "multipart" | "v2" => Ok(Flavor::Multipart),
            other => Err(SeedError::Config(format!("unknown flavor '{other}'"))),
        }
    }
}

/// Outcome of a create call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// 2xx, with the id if the response carried one
    Created(Option<String>),
    /// 409
    AlreadyExists,
    /// Any other status
    Rejected(u16),
}

impl Created {
    pub fn from_status(status: u16, id: Option<String>) -> Self {
        match status {
            200..=299 => Created::Created(id),
            409 => Created::AlreadyExists,
            other => Created::Rejected(other),
        }
    }
}

/// An authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserFixture {
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct BirdFixture {
    pub common_name: &'static str,
    pub scientific_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupFixture {
    pub name: &'static str,
    pub description: &'static str,
    /// Username of the owner
    pub owner: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SightingFixture {
    pub author: &'static str,
    pub bird: &'static str,
    pub group: &'static str,
    pub header: &'static str,
    pub text_body: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Optional file attached to a multipart create
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// A group create with its owner resolved
#[derive(Debug, Clone)]
pub struct NewGroup<'a> {
    pub fixture: &'a GroupFixture,
    pub owner_id: &'a str,
}

/// A sighting create with every reference resolved
#[derive(Debug, Clone)]
pub struct NewSighting<'a> {
    pub fixture: &'a SightingFixture,
    pub user_id: &'a str,
    pub bird_id: &'a str,
    pub group_id: &'a str,
}
