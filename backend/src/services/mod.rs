pub mod agent_log;
pub mod challenge;
pub mod completion;
pub mod event_logger;
pub mod payload_store;
pub mod verifier;
pub mod webhook;
