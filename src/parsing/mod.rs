//! Regex scanners over C# source text.
//!
//! All scanners run on [`normalize`]d text so comments and literals cannot
//! produce false matches, and every offset they report is an offset into the
//! original buffer.

pub mod declarations;
pub mod heritage;
pub mod members;
pub mod normalize;
pub mod target;

pub use declarations::{lookup, scan as scan_declarations, scope_zones};
pub use heritage::{TypeDeclaration, TypeKind, base_type_names, enclosing_type, type_declarations};
pub use members::{MemberScan, scan_methods, scan_properties, zone_end};
pub use normalize::{Enclosure, blank_enclosed, matching_close, normalize};
pub use target::{INDEX_SENTINEL, LookupTarget, Segment};
