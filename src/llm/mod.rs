pub mod adapter;
pub mod openai_compat;
pub mod transport;
pub mod workers_ai;
