//! Shared models and client-side logic for the gateway administration client.
//!
//! Everything in this crate is free of browser and server dependencies so it
//! compiles for `wasm32` (the Yew client in `frontend`) and natively (the host
//! server in `backend` and the unit tests).
//!
//! - `model`: JSON payloads exchanged with the gateway REST API.
//! - `jobs`: background task states and the bounded polling state machine.
//! - `bulk`: the bulk user-import workflow (upload checks, missing-user
//!   selection, step guards).
//! - `history`: public-status echo and lazy child paging for the history browser.
//! - `pagination`, `search`, `requests`: paging ranges, stale-response guards
//!   and query-string normalization used by every list page.
//! - `errors`, `config`: HTTP error mapping and the client configuration.

pub mod bulk;
pub mod config;
pub mod errors;
pub mod history;
pub mod jobs;
pub mod model;
pub mod pagination;
pub mod requests;
pub mod search;
