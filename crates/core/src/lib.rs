//! Core library for explainer
//!
//! This crate is the **Functional Core** of the explainer application. The
//! binary crate (`explainer`) is the Imperative Shell: it talks to Ollama,
//! reads files and stdin, and runs the panel bridge and the MCP server.
//!
//! Nothing in here performs I/O. Every function is deterministic and can be
//! tested with plain fixture data.
//!
//! # Module Organization
//!
//! - [`explain`]: explanation request/result types and the prompt builder
//! - [`panel`]: the JSON-lines message contract spoken with the editor panel
//! - [`config`]: config file parsing and layered settings resolution
//! - [`models`]: transformation of the Ollama model list
//!
//! # Example Usage
//!
//! ```rust
//! use explainer_core::explain::build_prompt;
//!
//! let prompt = build_prompt("const x = 1;", "javascript");
//! assert!(prompt.human.contains("```javascript\nconst x = 1;\n```"));
//! ```

pub mod config;
pub mod explain;
pub mod models;
pub mod panel;
