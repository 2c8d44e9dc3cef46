//! The index schema: the fixed set of slices an application starts with

use gentleman_core::StoreError;
use gentleman_state::SliceKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every valid slice name of the index store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKey {
    User,
    Company,
    Settings,
}

impl IndexKey {
    pub const ALL: [IndexKey; 3] = [IndexKey::User, IndexKey::Company, IndexKey::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKey::User => "user",
            IndexKey::Company => "company",
            IndexKey::Settings => "settings",
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| StoreError::entity_not_found(s))
    }
}

/// User profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u32,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: "user-0".to_string(),
            name: "Guest".to_string(),
            age: 0,
        }
    }
}

/// Organization profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub address: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            id: "company-0".to_string(),
            name: "Unnamed Company".to_string(),
            address: String::new(),
        }
    }
}

/// Application settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub id: String,
    pub name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: "settings-0".to_string(),
            name: "default".to_string(),
        }
    }
}

pub const USER: SliceKey<IndexKey, User> = SliceKey::new(IndexKey::User);
pub const COMPANY: SliceKey<IndexKey, Company> = SliceKey::new(IndexKey::Company);
pub const SETTINGS: SliceKey<IndexKey, Settings> = SliceKey::new(IndexKey::Settings);
