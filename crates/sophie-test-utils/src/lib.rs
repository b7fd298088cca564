// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sophie integration tests.
//!
//! Provides mock adapters and a test harness for end-to-end session
//! testing without a model server or network access.

pub mod harness;
pub mod mock_feed;
pub mod mock_provider;

pub use harness::{HARNESS_DIMENSIONS, HARNESS_MODEL, TestHarness, TestHarnessBuilder, fixed_now};
pub use mock_feed::MockFeedSource;
pub use mock_provider::{DEFAULT_RESPONSE, MockProvider};
