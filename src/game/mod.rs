pub mod board;
pub mod generator;
pub mod rules;
pub mod state;
pub mod types;
pub mod wordlist;
