//! Shopdeck seller dashboard frontend
//!
//! Yew application over the Shopdeck API: session restore and silent
//! token refresh, cross-tab logout, image uploads with AI enhancement,
//! the AI assistant panel, and marketplace credential settings.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod services;
pub mod storage;

pub use app::App;
