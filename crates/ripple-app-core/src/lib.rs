// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Ripple tools (config storage, settings).
//! Keeps runtime adapters thin and free of filesystem details.

pub mod config;
pub mod config_port;
pub mod prefs;
