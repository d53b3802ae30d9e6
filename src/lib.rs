//! Store Builder — conversational store-creation wizard core.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod wizard;
