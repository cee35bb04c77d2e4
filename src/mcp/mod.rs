//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes relationship scanning and the resolver to AI assistants over stdio.
//!
//! ## Module Structure
//!
//! - `server`: Main MCP server implementation
//! - `types`: Tool parameter and result types

mod server;
pub mod types;

pub use server::{OrmDoctorMcpServer, run_server};
