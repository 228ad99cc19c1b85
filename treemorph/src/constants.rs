//! Constants used throughout treemorph.

/// Attribute values that mean "unset" when assigned over an existing attribute.
///
/// Templating layers stringify missing values to these literals.
pub const NULL_SENTINELS: [&str; 2] = ["null", "undefined"];

/// Live value sentinel that resets a form control.
pub const NULL_VALUE: &str = "null";

/// Attribute carrying a node's identifier.
pub const ID_ATTR: &str = "id";

/// Attribute holding a form control's initial value.
pub const VALUE_ATTR: &str = "value";

/// Attribute holding a form control's type.
pub const TYPE_ATTR: &str = "type";

/// Tag name of form controls that carry live state.
pub const INPUT_TAG: &str = "input";

/// Control type used when a form control has no `type` attribute.
pub const DEFAULT_CONTROL_TYPE: &str = "text";

/// Control type whose rendered position must always be rewritten.
pub const RANGE_CONTROL_TYPE: &str = "range";

/// Namespace URI bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace URI of namespace declaration attributes.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Namespace URI conventionally bound to the `xlink` prefix.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
