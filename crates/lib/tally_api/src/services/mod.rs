//! Business-flow services invoked by the handlers.

pub mod auth;
