// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The content-defined property bag carried by every object.
//!
//! Content scripts store arbitrary state under string keys; we reuse
//! `serde_json::Value` rather than inventing a value enum since player
//! saves (§6 "Persisted state") are serialized straight out of this bag.

/// A single property value.
pub type PropertyValue = serde_json::Value;

/// An object's content-defined state bag, string key to arbitrary value.
pub type PropertyBag = serde_json::Map<String, PropertyValue>;
