//! Integration tests for the outbox publishing flow
//!
//! These tests drive the public API end to end: post files on disk, the
//! publisher with a scripted client, the audit log and the watch loop.

pub mod audit_log;
pub mod config_flow;
pub mod helpers;
pub mod publish_flow;
pub mod watch_loop;
