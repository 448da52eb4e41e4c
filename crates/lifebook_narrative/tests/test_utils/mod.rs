//! Test utilities for narrative tests.
//!
//! This module provides a scripted prompt chain and fact/chapter helpers.

#![allow(dead_code)]

pub mod mock_chain;

pub use mock_chain::MockChain;

use std::time::Duration;

use lifebook_core::Fact;
use lifebook_retry::{RetryConfig, RetryExecutor};

/// Facts with sequential question ids.
pub fn facts(texts: &[&str]) -> Vec<Fact> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Fact::now(format!("q{}", i + 1), *text))
        .collect()
}

/// Three attempts, 1 s base delay; pair with paused tokio time.
pub fn executor() -> RetryExecutor {
    RetryExecutor::new(&RetryConfig::default()).with_timeout(Duration::from_secs(5))
}
