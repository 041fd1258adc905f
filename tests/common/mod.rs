//! Common test utilities for xroms.
//!
//! This module provides shared grids, fixtures and assertions for the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod test_data;
