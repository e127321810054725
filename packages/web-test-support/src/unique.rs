use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`
///
/// ```
/// use web_test_support::unique_str;
///
/// let a = unique_str("example");
/// let b = unique_str("example");
/// assert_ne!(a, b);
/// assert!(a.starts_with("example-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}
