//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the REST API and wires the WebSocket handlers
//! into the router.

pub mod http;
pub mod rest;
pub mod state;
