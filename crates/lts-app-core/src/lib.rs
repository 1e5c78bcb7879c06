// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the LTS explorer (storage, layouts, prefs, notices).
//! Keeps surface/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod config_port;
pub mod layout_store;
pub mod notice;
pub mod prefs;
