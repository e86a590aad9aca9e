//! Assembly of standalone HTML documents (typically rendered notebooks) into
//! one navigable, printable document.
//!
//! The pipeline is: extract head and body ([`extract`]), rewrite relative
//! asset references ([`assets`]), assign heading anchors ([`anchors`]),
//! insert navigation ([`nav`]), build the table of contents ([`toc`]) and
//! concatenate everything ([`compose`]). [`Assembler`] runs it end to end.
pub mod anchors;
pub mod assemble;
pub mod assets;
pub mod compose;
pub mod document;
pub mod dom;
pub mod error;
pub mod extract;
pub mod nav;
pub mod toc;
pub mod types;
pub mod utils;

pub use assemble::{AssembleOptions, Assembler};
pub use document::{Document, Fragment};
pub use error::{HtmlError, HtmlResult};
pub use types::{Heading, Section, TocEntry, TocLevel};
