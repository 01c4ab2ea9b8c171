//! Data models shared across storage, agents and API handlers.

pub mod agent_log;
pub mod lead;
pub mod webhook;
