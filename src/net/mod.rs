//! Networking layer for the Argent Bank REST API.
//!
//! ARCHITECTURE
//! ============
//! `types` holds the wire DTOs and the validated values they produce
//! (`BearerToken`, `UserProfile`); `api` holds the `BankApi` seam and its
//! `reqwest` implementation.

pub mod api;
pub mod types;
