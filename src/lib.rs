pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod leaderboard;
pub mod output;
pub mod parser;
pub mod render;
