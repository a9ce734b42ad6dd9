// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON codec for isotile-port types.
//!
//! Serialization is deliberately separated from the port contract.
//! This keeps isotile-port free of serde.

mod json;

pub use json::*;
