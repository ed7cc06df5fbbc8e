//! Key material published to the user directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's public signing key and the signed device and one-time keys that
/// hang off it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfiguration {
    #[serde(rename = "a", with = "super::blob")]
    pub signing_public_key: Vec<u8>,
    #[serde(rename = "b", default)]
    pub signed_devices: Vec<SignedDeviceConfiguration>,
    #[serde(rename = "c", default)]
    pub signed_public_one_time_keys: Vec<SignedPublicOneTimeKey>,
    #[serde(rename = "d", default)]
    pub signed_public_kyber_one_time_keys: Vec<SignedKyberOneTimeKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDeviceConfiguration {
    #[serde(rename = "a")]
    pub id: Uuid,
    #[serde(rename = "b", with = "super::blob")]
    pub data: Vec<u8>,
    #[serde(rename = "c", with = "super::blob")]
    pub signature: Vec<u8>,
}

/// Curve25519 one-time prekey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPublicOneTimeKey {
    #[serde(rename = "a")]
    pub id: Uuid,
    #[serde(rename = "b")]
    pub device_id: Uuid,
    #[serde(rename = "c", with = "super::blob")]
    pub data: Vec<u8>,
    #[serde(rename = "d", with = "super::blob")]
    pub signature: Vec<u8>,
}

/// Kyber one-time prekey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedKyberOneTimeKey {
    #[serde(rename = "a")]
    pub id: Uuid,
    #[serde(rename = "b")]
    pub device_id: Uuid,
    #[serde(rename = "c", with = "super::blob")]
    pub data: Vec<u8>,
    #[serde(rename = "d", with = "super::blob")]
    pub signature: Vec<u8>,
}

/// Body of `POST /api/store/create-user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub configuration: UserConfiguration,
}

impl User {
    pub fn new(username: impl Into<String>, configuration: UserConfiguration) -> Self {
        Self {
            username: username.into(),
            configuration,
        }
    }
}
