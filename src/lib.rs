//! Persona Engine - Behavioral self-assessment engine.
//!
//! This crate implements a multi-trait personality questionnaire: session
//! lifecycle, adaptive question generation with a deterministic bank
//! fallback, Likert scoring, and a bounded behavioral-adjustment overlay.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
