//! # Core Application Logic
//!
//! This module contains Medichat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatSession          │
//!                    │  • Action / update()    │
//!                    │  • Reply generation     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │ inference  │
//!     │  Adapter   │                          │ (reqwest)  │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the transcript and its pending-placeholder state machine
//! - [`action`]: the `Action` enum and the `update` reducer
//! - [`generator`]: turns a provider call into exactly one `Reply`
//! - [`state`]: the `App` struct
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod generator;
pub mod session;
pub mod state;
