use std::fmt::{self, Debug, Display, Write};

use crate::sets::concurrent::ConcurrentSet;

impl<T, S> ConcurrentSet<T, S>
where
    T: Display,
{
    /// Renders the members as `{a, b, c}` for diagnostics. Member order is
    /// whatever iteration yields and may differ between calls.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<T: Display, S> Display for ConcurrentSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.read();
        f.write_char('{')?;
        for (i, element) in table.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_char('}')
    }
}

impl<T: Debug, S> Debug for ConcurrentSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.read().iter()).finish()
    }
}
