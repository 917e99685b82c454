//! # nido_relief
//!
//! Relief - The stylesheet tree surface for Nido.
//!
//! ## Name Origin
//!
//! A **relief** is a sculpture whose forms stand out from a flat background
//! while remaining attached to it. `nido_relief` holds the stylesheet as a
//! tree of rules, at-rules, declarations and comments that stay attached to
//! their source: every node keeps its surrounding whitespace, so a tree that
//! was not rewritten prints back byte for byte.
//!
//! ## Usage
//!
//! ```
//! use nido_relief::Stylesheet;
//!
//! let mut sheet = Stylesheet::new();
//! let root = sheet.root();
//! let rule = sheet.create_rule(".a");
//! let decl = sheet.create_decl("color", "red");
//! sheet.append(root, rule);
//! sheet.append(rule, decl);
//!
//! assert_eq!(sheet.to_css(), ".a {\n    color: red\n}");
//! ```

pub mod ast;
pub mod list;
mod stringify;
mod tree;

pub use ast::{Node, NodeId, NodeKind, NodeType, Position, Raws, SourceSpan};
pub use tree::Stylesheet;
