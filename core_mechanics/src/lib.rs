pub mod action;
pub mod board;
pub mod card;
pub mod catalog;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod gem;
pub mod history;
pub mod noble;
pub mod player;
pub mod snapshot;
pub mod tokens;
pub mod validator;
