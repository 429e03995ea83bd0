pub fn format_comma_separated<I>(iter: I) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    format_comma_separated_with(iter, |i| i.to_string())
}

pub fn format_comma_separated_with<I, F>(iter: I, format_fn: F) -> String
where
    I: IntoIterator,
    F: FnMut(I::Item) -> String,
{
    iter.into_iter()
        .map(format_fn)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a string the way Python's `repr()` does: single quotes unless the text contains a
/// single quote and no double quote.
pub fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render a float the way Python's `repr()` does.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        // Rust gives `1e16` and `1.5e-5`, Python wants `1e+16` and `1.5e-05`.
        let formatted = format!("{f:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    if f == f.trunc() {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_like_python() {
        assert_eq!(quote_str("hi"), "'hi'");
        assert_eq!(quote_str("it's"), "\"it's\"");
        assert_eq!(quote_str("a\"b'c"), "'a\"b\\'c'");
        assert_eq!(quote_str("line\n"), "'line\\n'");
    }

    #[test]
    fn floats_like_python() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(3.25), "3.25");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn comma_separated() {
        assert_eq!(format_comma_separated([1, 2, 3]), "1, 2, 3");
        assert_eq!(format_comma_separated(Vec::<i64>::new()), "");
    }
}
