//! In-memory XML element trees.
//!
//! Elements live in an [`XmlArena`](domain::XmlArena) and are addressed by
//! [`NodeId`](domain::NodeId) handles or by positional [`NodePath`](domain::NodePath)s
//! from a tree root. Trees can be mutated, walked in pre-order, and written out
//! as indented XML.
//!
//! ```
//! use xmlnode::domain::{ElementSpec, XmlArena};
//!
//! let mut arena = XmlArena::new();
//! let root = arena.new_node("bookstore", true);
//! let book = arena
//!     .make_child(root, ElementSpec::new("book").attribute("category", "cooking"))
//!     .unwrap();
//! arena
//!     .make_child(book, ElementSpec::new("title").value("Matthew"))
//!     .unwrap();
//!
//! assert_eq!(
//!     arena.to_xml_string(root).unwrap(),
//!     "<bookstore>\n  <book category=\"cooking\">\n    <title>Matthew</title>\n  </book>\n</bookstore>\n"
//! );
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
