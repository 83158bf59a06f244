#![deny(unreachable_patterns)]
#![deny(unused_must_use)]
#[macro_use]
extern crate logging;

pub mod auth;
pub mod communications;
pub mod config;
pub mod controllers;
pub mod db;
pub mod domain_events;
pub mod errors;
pub mod graphql;
pub mod orders;
pub mod payments;
pub mod server;
