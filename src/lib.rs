//! blogd: a small self-hosted blog post service.
//!
//! The library target is shared by the `blogd` server binary and the
//! `blogd_cli` client binary. Domain rules live under [`domain`], the
//! post service and its storage seam under [`application`], and the
//! HTTP surface, file store, and telemetry under [`infra`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
