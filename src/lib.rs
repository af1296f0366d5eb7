//! # deckpulse - project health analytics for Deck boards
//!
//! Reads a Deck-style task store and turns its cards into dashboard widgets
//! and a rule-based alert feed.
//!
//! ## Features
//!
//! - **Classification**: one status and due bucket per task, shared by every view
//! - **Widgets**: project progress, productivity by label, delay composition, weekly velocity
//! - **Drill-down**: the task rows behind each widget
//! - **Alerts**: overdue, unassigned, undated, stalled and zero-progress checks
//! - **Export**: CSV, JSON and Excel output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deckpulse::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
