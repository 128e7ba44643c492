/// Text compiled from a rule for an external tool (git arguments, a SQL
/// `WHERE` clause).
///
/// Values are only escaped as far as the target's pattern syntax requires;
/// they are not sanitized against the surrounding shell or SQL statement.
/// The query input is expected to come from an authenticated administrator.
/// There is no `Display` or `Deref`; getting at the text goes through a
/// method whose name says what the caller is vouching for.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnsanitizedFragment(String);

impl UnsanitizedFragment {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    /// Borrow the fragment, e.g. for logging or comparisons.
    pub fn as_unsanitized_str(&self) -> &str {
        &self.0
    }

    /// Take the text, asserting the rule set it came from is trusted.
    pub fn into_trusted_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
