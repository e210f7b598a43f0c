//! Naming convention utilities for generated Java code.
//!
//! Two naming worlds meet in a mapping: the wire classes produced by `protoc`, whose
//! accessor names follow protoc's camel-casing rules, and the hand-written domain
//! classes, whose fields carry the generated field name verbatim.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `word` | [`capitalize`] | `Word` |
//! | `_count` | [`strip_leading_underscore`] | `count` |
//! | `field2_name` | [`wire_accessor_suffix`] | `Field2Name` |

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use protomap_core::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize("world"), "World");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Drop a single leading underscore, as protoc does for Java identifiers.
///
/// # Examples
///
/// ```
/// use protomap_core::naming::strip_leading_underscore;
///
/// assert_eq!(strip_leading_underscore("_count"), "count");
/// assert_eq!(strip_leading_underscore("__count"), "_count");
/// assert_eq!(strip_leading_underscore("count"), "count");
/// ```
pub fn strip_leading_underscore(s: &str) -> &str {
    s.strip_prefix('_').unwrap_or(s)
}

/// Accessor suffix protoc derives from a field name (`get<Suffix>`, `has<Suffix>`).
///
/// Underscores are dropped and the following letter capitalized; a letter that follows
/// a digit is capitalized as well.
///
/// # Examples
///
/// ```
/// use protomap_core::naming::wire_accessor_suffix;
///
/// assert_eq!(wire_accessor_suffix("display_name"), "DisplayName");
/// assert_eq!(wire_accessor_suffix("_count"), "Count");
/// assert_eq!(wire_accessor_suffix("field2name"), "Field2Name");
/// ```
pub fn wire_accessor_suffix(field_name: &str) -> String {
    let mut result = String::with_capacity(field_name.len());
    let mut capitalize_next = true;

    for c in field_name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if c.is_ascii_digit() {
            result.push(c);
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Getter name for a domain-side field (`count` -> `getCount`).
pub fn getter_name(field_name: &str) -> String {
    format!("get{}", capitalize(field_name))
}

/// Setter name for a domain-side field (`count` -> `setCount`).
pub fn setter_name(field_name: &str) -> String {
    format!("set{}", capitalize(field_name))
}

/// Last segment of a dotted Java name (`com.example.Order` -> `Order`).
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
