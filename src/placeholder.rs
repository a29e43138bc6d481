//! Resources of the JSONPlaceholder CRUD API.
//!
//! Used to exercise the generic client against a public API with no
//! revisioning.

use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    /// Author
    pub user_id: u64,
    /// Assigned by the server; omitted from request bodies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
}

impl Post {
    /// A post without an id, ready to be created.
    pub fn new(user_id: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Post {
            user_id,
            id: None,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// User id
    pub id: u64,
    /// Full name
    pub name: String,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Postal address
    pub address: Option<Address>,
    /// Phone number
    pub phone: String,
    /// Website host
    pub website: String,
    /// Employer
    pub company: Option<Company>,
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Street
    pub street: String,
    /// Suite or apartment
    pub suite: String,
    /// City
    pub city: String,
    /// Postal code
    pub zipcode: String,
    /// Coordinates
    pub geo: Option<Geo>,
}

/// Latitude and longitude, as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    /// Latitude
    pub lat: String,
    /// Longitude
    pub lng: String,
}

/// An employer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    /// Company name
    pub name: String,
    /// Slogan
    pub catch_phrase: String,
    /// Business line
    pub bs: String,
}
