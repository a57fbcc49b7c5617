use std::fmt;

/// Debug stand-in for user values: prints the length only.
pub struct RedactedValue<'a>(pub &'a str);

impl fmt::Debug for RedactedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} chars>", self.0.chars().count())
    }
}
