//! Prompt module for LLM-based operations.
//!
//! This module provides modular prompt templates for various LLM tasks.

pub mod research_analysis;

pub use research_analysis::*;
