//! azrm: Azure environment profiles and Site Recovery replication policies
//!
//! Layers, innermost first: `domain` (parameter sets, validation, payloads),
//! `application` (services behind boundary traits), `infrastructure`
//! (HTTP client, profile file, prompt, wiring) and `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
