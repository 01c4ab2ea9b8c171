pub mod agent_log;
