//! Client for ordering caixas de brigadeiro from the shop backend.
//!
//! ARCHITECTURE
//! ============
//! The crate mirrors the screens of the shop app. Each screen in [`screens`]
//! is a small controller: it owns its form fields, and its submit operation
//! resolves to an [`screens::Outcome`] (an alert the user dismisses, or a
//! navigation). The only state that outlives a screen is the
//! [`session::SessionGate`], owned by [`app::App`], which decides whether the
//! authenticated tabs or the login screen are shown.
//!
//! Network access goes through the [`api::Backend`] trait so screens can be
//! exercised against a mock; [`api::ApiClient`] is the reqwest implementation.

pub mod api;
pub mod app;
pub mod attachment;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod screens;
pub mod session;
pub mod storage;
