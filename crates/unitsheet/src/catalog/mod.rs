//! Symbol catalog: prefix and unit symbols with their canonical URIs.
//!
//! The catalog is supplied by the unit-parsing library. Here it is a plain
//! value that can be loaded from JSON:
//!
//! ```json
//! {
//!   "prefixes": { "k": { "uri": "http://www.qudt.org/qudt/owl/1.0.0/unit/Instances.html#Kilo" } },
//!   "units": {
//!     "g": [ { "priority": 0,
//!              "uri": "http://www.qudt.org/qudt/owl/1.0.0/unit/Instances.html#Gram",
//!              "quantity_kind": "http://www.qudt.org/qudt/owl/1.0.0/quantity/Instances.html#Mass" } ]
//!   },
//!   "dimensions": { "Mass": { "M": 1 } }
//! }
//! ```

mod symbols;

pub use symbols::{PrefixDefinition, SymbolCatalog, UnitDefinition};

/// Namespace used for unit and prefix URIs entered by hand.
pub const QUDT_NAMESPACE: &str = "http://www.qudt.org/qudt/owl/1.0.0/unit/Instances.html#";

/// Separator between a URI's namespace and its local name.
pub const URI_SEPARATOR: char = '#';

/// Local name of a URI: the text after the last `#`, or the whole string
/// when there is no separator.
pub fn local_name(uri: &str) -> &str {
    uri.rsplit(URI_SEPARATOR).next().unwrap_or(uri)
}

/// Expand a local name into a full URI in [`QUDT_NAMESPACE`].
///
/// Values that already look like URIs are returned unchanged.
pub fn qualify(name: &str) -> String {
    if name.contains(URI_SEPARATOR) || name.contains("://") {
        name.to_string()
    } else {
        format!("{}{}", QUDT_NAMESPACE, name)
    }
}
