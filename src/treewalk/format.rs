//! The format-spec mini-language used by f-strings, `format()` and `str.format`.

use crate::{
    domain::utils::format_float,
    treewalk::{
        result::Raise, types::Exception, DomainResult, TreewalkInterpreter, TreewalkResult,
        TreewalkValue,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

#[derive(Debug, PartialEq)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    sign: Sign,
    alternate: bool,
    /// A leading `0` on the width: zero padding after the sign unless an alignment is given.
    zero: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> DomainResult<Self> {
        let invalid = || Exception::value_error("Invalid format specifier");
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        };

        let mut fill = ' ';
        let mut align = None;
        if let Some(a) = chars.get(1).and_then(|c| align_of(*c)) {
            fill = chars[0];
            align = Some(a);
            i = 2;
        } else if let Some(a) = chars.first().and_then(|c| align_of(*c)) {
            align = Some(a);
            i = 1;
        }

        let sign = match chars.get(i) {
            Some('+') => Sign::Plus,
            Some(' ') => Sign::Space,
            _ => Sign::Minus,
        };
        if matches!(chars.get(i), Some('+' | ' ' | '-')) {
            i += 1;
        }

        let alternate = chars.get(i) == Some(&'#');
        if alternate {
            i += 1;
        }

        let zero = chars.get(i) == Some(&'0');
        if zero {
            if align.is_none() {
                fill = '0';
            }
            i += 1;
        }

        let digits = |i: &mut usize| {
            let start = *i;
            while chars.get(*i).is_some_and(char::is_ascii_digit) {
                *i += 1;
            }
            let text: String = chars[start..*i].iter().collect();
            (!text.is_empty()).then(|| text.parse::<usize>())
        };

        let width = match digits(&mut i) {
            Some(width) => width.map_err(|_| invalid())?,
            None => 0,
        };

        let grouping = match chars.get(i) {
            Some(c @ (',' | '_')) => {
                i += 1;
                Some(*c)
            }
            _ => None,
        };

        let precision = if chars.get(i) == Some(&'.') {
            i += 1;
            match digits(&mut i) {
                Some(precision) => Some(precision.map_err(|_| invalid())?),
                None => return Err(Exception::value_error("Format specifier missing precision")),
            }
        } else {
            None
        };

        let kind = chars.get(i).copied();
        if kind.is_some() {
            i += 1;
        }
        if i != chars.len() {
            return Err(invalid());
        }

        Ok(Self {
            fill,
            align,
            sign,
            alternate,
            zero,
            width,
            grouping,
            precision,
            kind,
        })
    }

    fn unknown_code(&self, type_name: &str) -> Exception {
        Exception::value_error(format!(
            "Unknown format code '{}' for object of type '{type_name}'",
            self.kind.unwrap_or(' ')
        ))
    }

    /// Where numbers go when no alignment was given.
    fn numeric_align(&self) -> Align {
        if self.zero {
            Align::AfterSign
        } else {
            Align::Right
        }
    }

    fn sign_prefix(&self, negative: bool) -> &'static str {
        match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Plus) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Minus) => "",
        }
    }

    /// Pad `body`, keeping `prefix` (sign and radix marker) in front of any `=` padding.
    fn pad(&self, prefix: &str, body: &str, default_align: Align) -> String {
        let len = prefix.chars().count() + body.chars().count();
        let padding = self.width.saturating_sub(len);
        let fill = |n: usize| self.fill.to_string().repeat(n);
        match self.align.unwrap_or(default_align) {
            Align::Left => format!("{prefix}{body}{}", fill(padding)),
            Align::Right => format!("{}{prefix}{body}", fill(padding)),
            Align::Center => {
                let left = padding / 2;
                format!("{}{prefix}{body}{}", fill(left), fill(padding - left))
            }
            Align::AfterSign => format!("{prefix}{}{body}", fill(padding)),
        }
    }
}

/// Insert a thousands separator into a run of digits.
fn group_digits(digits: &str, separator: char, every: usize) -> String {
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % every == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

fn format_int(spec: &FormatSpec, value: i64) -> DomainResult<String> {
    let magnitude = value.unsigned_abs();
    let (digits, radix_prefix, every) = match spec.kind {
        None | Some('d') | Some('n') => (magnitude.to_string(), "", 3),
        Some('x') => (format!("{magnitude:x}"), "0x", 4),
        Some('X') => (format!("{magnitude:X}"), "0X", 4),
        Some('o') => (format!("{magnitude:o}"), "0o", 4),
        Some('b') => (format!("{magnitude:b}"), "0b", 4),
        Some('c') => {
            let c = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Exception::overflow_error("%c arg not in range(0x110000)"))?;
            return Ok(spec.pad("", &c.to_string(), Align::Left));
        }
        Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') => {
            return format_float_spec(spec, value as f64)
        }
        Some(_) => return Err(spec.unknown_code("int")),
    };

    let digits = match spec.grouping {
        Some(separator) => group_digits(&digits, separator, every),
        None => digits,
    };
    let mut prefix = spec.sign_prefix(value < 0).to_string();
    if spec.alternate {
        prefix.push_str(radix_prefix);
    }
    Ok(spec.pad(&prefix, &digits, spec.numeric_align()))
}

/// Render an exponent the way Python does, with a sign and at least two digits.
fn python_exponent(rendered: String, upper: bool) -> String {
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let e = if upper { 'E' } else { 'e' };
    format!("{mantissa}{e}{sign}{digits:0>2}")
}

/// `g` formatting: scientific when the exponent is out of range, trailing zeros dropped.
fn general(value: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return if alternate {
            format!("{:.*}", precision - 1, 0.0)
        } else {
            "0".into()
        };
    }
    let exponent = format!("{:.*e}", precision - 1, value)
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);

    let trim = |s: String| {
        if alternate || !s.contains('.') {
            s
        } else {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    };

    if exponent < -4 || exponent >= precision as i32 {
        let rendered = format!("{:.*e}", precision - 1, value);
        let (mantissa, exp) = rendered.split_once('e').unwrap_or((&rendered, "0"));
        let mantissa = trim(mantissa.to_string());
        python_exponent(format!("{mantissa}e{exp}"), upper)
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim(format!("{value:.decimals$}"))
    }
}

fn format_float_spec(spec: &FormatSpec, value: f64) -> DomainResult<String> {
    let upper = matches!(spec.kind, Some('E' | 'F' | 'G'));
    let negative = value.is_sign_negative() && !value.is_nan();
    let magnitude = value.abs();

    let body = if !magnitude.is_finite() {
        let text = if magnitude.is_nan() { "nan" } else { "inf" };
        if upper {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    } else {
        match spec.kind {
            Some('f' | 'F') => format!("{magnitude:.*}", spec.precision.unwrap_or(6)),
            Some('e' | 'E') => python_exponent(
                format!("{magnitude:.*e}", spec.precision.unwrap_or(6)),
                upper,
            ),
            Some('g' | 'G') => general(magnitude, spec.precision.unwrap_or(6), spec.alternate, upper),
            Some('%') => format!("{:.*}%", spec.precision.unwrap_or(6), magnitude * 100.0),
            None => match spec.precision {
                Some(precision) => general(magnitude, precision, spec.alternate, false),
                None => format_float(magnitude),
            },
            Some(_) => return Err(spec.unknown_code("float")),
        }
    };

    let body = match spec.grouping {
        Some(separator) if magnitude.is_finite() => {
            let split = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
            let (int_part, rest) = body.split_at(split);
            format!("{}{rest}", group_digits(int_part, separator, 3))
        }
        _ => body,
    };
    Ok(spec.pad(spec.sign_prefix(negative), &body, spec.numeric_align()))
}

fn format_str(spec: &FormatSpec, value: &str) -> DomainResult<String> {
    match spec.kind {
        None | Some('s') => {}
        Some(_) => return Err(spec.unknown_code("str")),
    }
    if spec.sign != Sign::Minus {
        return Err(Exception::value_error(
            "Sign not allowed in string format specifier",
        ));
    }
    if spec.align == Some(Align::AfterSign) {
        return Err(Exception::value_error(
            "'=' alignment not allowed in string format specifier",
        ));
    }
    let truncated: String = match spec.precision {
        Some(precision) => value.chars().take(precision).collect(),
        None => value.to_string(),
    };
    Ok(spec.pad("", &truncated, Align::Left))
}

/// Render `value` according to `spec`, as `format(value, spec)` does.
pub fn format_value(
    interpreter: &TreewalkInterpreter,
    value: &TreewalkValue,
    spec: &str,
) -> TreewalkResult<String> {
    if spec.is_empty() {
        return interpreter.str_of(value);
    }
    let parsed = FormatSpec::parse(spec).raise(interpreter)?;
    let rendered = match value {
        TreewalkValue::Int(i) => format_int(&parsed, *i),
        TreewalkValue::Bool(b) => format_int(&parsed, *b as i64),
        TreewalkValue::Float(f) => format_float_spec(&parsed, *f),
        TreewalkValue::Str(s) => format_str(&parsed, s),
        other => {
            return Exception::type_error(format!(
                "unsupported format string passed to {}.__format__",
                other.type_name()
            ))
            .raise(interpreter)
        }
    };
    rendered.raise(interpreter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treewalk::test_utils::*;

    fn fmt(value: TreewalkValue, spec: &str) -> String {
        let value = match value {
            TreewalkValue::Int(i) => format_int(&FormatSpec::parse(spec).unwrap(), i),
            TreewalkValue::Float(f) => format_float_spec(&FormatSpec::parse(spec).unwrap(), f),
            TreewalkValue::Str(s) => format_str(&FormatSpec::parse(spec).unwrap(), &s),
            _ => unreachable!(),
        };
        value.unwrap()
    }

    #[test]
    fn parses_specs() {
        let spec = FormatSpec::parse("*^+#012,.3f").unwrap();
        assert_eq!(spec.fill, '*');
        assert_eq!(spec.align, Some(Align::Center));
        assert_eq!(spec.sign, Sign::Plus);
        assert!(spec.alternate);
        assert_eq!(spec.width, 12);
        assert_eq!(spec.grouping, Some(','));
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.kind, Some('f'));

        assert!(FormatSpec::parse("10.").is_err());
        assert!(FormatSpec::parse("dd").is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(fmt(TreewalkValue::Int(42), "5"), "   42");
        assert_eq!(fmt(TreewalkValue::Int(42), "<5"), "42   ");
        assert_eq!(fmt(TreewalkValue::Int(-42), "05"), "-0042");
        assert_eq!(fmt(TreewalkValue::Int(255), "#x"), "0xff");
        assert_eq!(fmt(TreewalkValue::Int(5), "08b"), "00000101");
        assert_eq!(fmt(TreewalkValue::Int(1234567), ","), "1,234,567");
        assert_eq!(fmt(TreewalkValue::Int(7), "+"), "+7");
        assert_eq!(fmt(TreewalkValue::Int(3), ".2f"), "3.00");
    }

    #[test]
    fn floats() {
        assert_eq!(fmt(TreewalkValue::Float(3.14159), ".2f"), "3.14");
        assert_eq!(fmt(TreewalkValue::Float(-1.5), "8.3f"), "  -1.500");
        assert_eq!(fmt(TreewalkValue::Float(1234.5), "e"), "1.234500e+03");
        assert_eq!(fmt(TreewalkValue::Float(0.25), ".1%"), "25.0%");
        assert_eq!(fmt(TreewalkValue::Float(1234567.891), ",.2f"), "1,234,567.89");
        assert_eq!(fmt(TreewalkValue::Float(0.0001), "g"), "0.0001");
        assert_eq!(fmt(TreewalkValue::Float(1e-5), "g"), "1e-05");
        assert_eq!(fmt(TreewalkValue::Float(123456789.0), "g"), "1.23457e+08");
        assert_eq!(fmt(TreewalkValue::Float(f64::INFINITY), "f"), "inf");
    }

    #[test]
    fn strings() {
        assert_eq!(fmt(TreewalkValue::Str("ab".into()), "*^6"), "**ab**");
        assert_eq!(fmt(TreewalkValue::Str("abcdef".into()), ".3"), "abc");
        assert_eq!(fmt(TreewalkValue::Str("ab".into()), "4"), "ab  ");
        assert_eq!(fmt(TreewalkValue::Str("ab".into()), "05"), "ab000");
    }

    #[test]
    fn through_scripts() {
        assert_eval_eq!("f'{3.5:>6.1f}|{\"x\":3}|'", TreewalkValue::Str("   3.5|x  |".into()));
        assert_eval_eq!("format(10, 'x')", TreewalkValue::Str("a".into()));
        assert_eval_eq!("f'{True}|{True:>3}'", TreewalkValue::Str("True|  1".into()));

        let e = run_expect_error("f'{1:q}'");
        assert_value_error!(e, "Unknown format code 'q' for object of type 'int'");
        let e = run_expect_error("format('s', '+')");
        assert_value_error!(e, "Sign not allowed in string format specifier");
    }
}
