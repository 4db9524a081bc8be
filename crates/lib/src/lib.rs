//! sysenv-lib: Core types and logic for sysenv
//!
//! sysenv expands a declarative environment config into shell `export`
//! statements and records what it injected, so the next reload can strip the
//! old values back out before applying the new ones:
//! - `config`: section-based config file parsing
//! - `template`: `$name` / `${name}` expansion over list-valued variables
//! - `resolve`: dependency-ordered expansion with cycle detection
//! - `reconcile`: recovery of the baseline environment from the previous run
//! - `render`: generation of the sourceable shell script
//! - `reload`: the full pipeline, persisting state in the meta file

pub mod config;
pub mod consts;
pub mod context;
pub mod meta;
pub mod reconcile;
pub mod reload;
pub mod render;
pub mod resolve;
pub mod template;
pub mod types;
