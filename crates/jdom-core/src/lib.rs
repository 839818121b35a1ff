//! # jdom-core
//!
//! An in-memory, DOM-style JSON document tree: parse, build, mutate,
//! duplicate, compare, and print typed JSON nodes.
//!
//! All nodes live inside a [`Document`], a generational arena that is the
//! single allocation boundary, and are addressed by [`NodeId`] handles.
//! Nodes are either *owned* (destroying them tears down their subtree) or
//! *references* (thin aliases that place an existing subtree at a second
//! location without a second owner), so the same array or string can
//! appear twice in a tree and still be freed exactly once.
//!
//! ## Quick start
//!
//! ```rust
//! use jdom_core::{Document, KeyMatch};
//!
//! let mut doc = Document::new();
//! let root = doc.parse(br#"{"num":123,"str":"hello"}"#).unwrap();
//!
//! assert_eq!(doc.number_value(doc.get(root, "num", KeyMatch::Exact).unwrap()), Some(123.0));
//!
//! doc.add_bool(root, "flag", true).unwrap();
//! assert_eq!(
//!     doc.print(root, false).unwrap(),
//!     r#"{"num":123,"str":"hello","flag":true}"#,
//! );
//! ```
//!
//! ## Modules
//!
//! - [`arena`]: `Document` storage, node lifecycle, read accessors
//! - [`builder`]: constructors, reference constructors, tree mutators
//! - [`parser`]: JSON text to tree, plus in-place [`minify`]
//! - [`printer`]: tree to JSON text in growable and bounded modes
//! - [`compare`]: deep structural equality
//! - [`duplicate`]: deep/shallow cloning
//! - [`interop`]: `serde_json::Value` conversions
//! - [`error`]: parse error type

pub mod arena;
pub mod builder;
pub mod compare;
pub mod duplicate;
pub mod error;
pub mod interop;
pub mod parser;
pub mod printer;
pub mod types;

pub use arena::Document;
pub use error::ParseError;
pub use parser::{minify, ParseOptions, Parsed, DEFAULT_MAX_DEPTH};
pub use types::{KeyMatch, Kind, NodeId, Ownership};
