//! JSON payloads of the gateway REST API.
//!
//! Field names follow the gateway's camelCase aliases. Optional fields use
//! `#[serde(default)]` so partial payloads from older gateway versions still
//! decode.

pub mod auth;
pub mod bulk;
pub mod error;
pub mod group;
pub mod history;
pub mod repository;
pub mod search;
pub mod user;
