//! Diagram conformance.
//!
//! A [`Diagram`] is parsed from PlantUML text or built from an explicit rule
//! list. [`DiagramCheck`] reports projected edges the diagram does not allow;
//! [`ForbiddenCheck`] reports edges matching an explicit deny list.

mod checker;
mod parser;

pub use checker::{DiagramCheck, ForbiddenCheck};
pub use parser::{Diagram, DiagramError};
