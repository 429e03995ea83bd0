/// The complete text of a Python source, ready to be lexed.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Text(String);

impl Text {
    pub fn new(text: &str) -> Self {
        Self(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(Text::new("\u{feff}x = 1").as_str(), "x = 1");
    }
}
