// Core library for the training tracker client.
// UI layers (screens, navigation, dialogs) consume these modules; nothing
// here draws or formats.

pub mod auth;
pub mod models;
pub mod remote;
pub mod services;
pub mod storage;
