pub mod chat_api;
pub mod static_pages;
pub mod web_console;
