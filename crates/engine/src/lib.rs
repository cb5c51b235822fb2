//! Core reaction engine: notification parsing, keyword matching, sender
//! eligibility, dedup and cooldown policies, and action dispatch.

pub mod client;
pub mod cooldown;
pub mod dedup;
pub mod dispatcher;
pub mod filter;
pub mod matcher;
pub mod parser;
pub mod processor;
