//! Integration tests for collection-sync

mod cli;
mod orchestrator;
mod reconcile_scenarios;
mod support;
