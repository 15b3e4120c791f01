//! # medtrack-entity
//!
//! Domain entities for MedTrack. Models mirror the upstream REST API's
//! JSON wire format: camelCase field names and opaque string ids.

pub mod auth;
pub mod medication;
pub mod user;
