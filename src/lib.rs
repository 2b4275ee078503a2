#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod links;
pub mod pipeline;
pub mod security;
pub mod subscribers;
pub mod telegram;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use bot::Bot;
pub use config::Config;
