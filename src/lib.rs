//! CORE Framework - Session engine for guided project planning
//!
//! This crate stores answers to the four-phase CORE questionnaire (Clarify,
//! Organize, Refine, Equip), persists sessions on the device or in a shared
//! remote backend with per-call fallback, and renders each session as
//! markdown, JSON and an AI planning prompt.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
