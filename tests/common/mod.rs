//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Temporary file management
//! - Synthetic seasonal series generation
//! - A figure sink that records what it was shown

#![allow(dead_code, unused_imports)]

pub mod test_utils;

pub use test_utils::{
    create_test_csv, seasonal_csv, seasonal_values, test_temp_path, RecordingSink, TempTestFile,
};
