//! Domain types for the profile backend

pub mod profiles;
