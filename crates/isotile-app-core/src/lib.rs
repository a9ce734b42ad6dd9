// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared configuration services for isotile hosts (config store, view prefs).
//! Keeps engine and adapters free of storage concerns.

pub mod config;
pub mod prefs;
