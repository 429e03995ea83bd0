use crate::{
    domain::Text,
    lexer::Lexer,
    parser::{
        types::{Conversion, Expr, ExprFormat, FStringPart},
        Parser, ParserError,
    },
};

/// Split the body of an f-string into literal text and replacement fields.
pub(super) fn parse_fstring(content: &str) -> Result<Vec<FStringPart>, ParserError> {
    let chars: Vec<char> = content.chars().collect();
    let mut parts = vec![];
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        match (chars[i], chars.get(i + 1)) {
            ('{', Some('{')) => {
                literal.push('{');
                i += 2;
            }
            ('}', Some('}')) => {
                literal.push('}');
                i += 2;
            }
            ('}', _) => {
                return Err(ParserError::syntax_error(
                    "f-string: single '}' is not allowed",
                ))
            }
            ('{', _) => {
                if !literal.is_empty() {
                    parts.push(FStringPart::String(std::mem::take(&mut literal)));
                }
                let (field, end) = parse_field(&chars, i + 1)?;
                parts.push(FStringPart::Expr(field));
                i = end + 1;
            }
            (c, _) => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        parts.push(FStringPart::String(literal));
    }
    Ok(parts)
}

/// Parse one replacement field starting just after its `{`. Returns the field and the index of
/// its closing `}`.
fn parse_field(chars: &[char], start: usize) -> Result<(ExprFormat, usize), ParserError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = start;

    let expr_end = loop {
        let Some(&c) = chars.get(i) else {
            return Err(ParserError::syntax_error("f-string: expecting '}'"));
        };

        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '}' if depth > 0 => depth -= 1,
            '}' => break i,
            '!' if depth == 0 && chars.get(i + 1) != Some(&'=') => break i,
            ':' if depth == 0 => break i,
            _ => {}
        }
        i += 1;
    };

    let source: String = chars[start..expr_end].iter().collect();
    if source.trim().is_empty() {
        return Err(ParserError::syntax_error(
            "f-string: empty expression not allowed",
        ));
    }
    let expr = parse_embedded_expr(source.trim())?;

    let mut i = expr_end;
    let mut conversion = None;
    if chars.get(i) == Some(&'!') {
        conversion = match chars.get(i + 1) {
            Some('r') | Some('a') => Some(Conversion::Repr),
            Some('s') => Some(Conversion::Str),
            _ => {
                return Err(ParserError::syntax_error(
                    "f-string: invalid conversion character",
                ))
            }
        };
        i += 2;
    }

    let mut spec = None;
    if chars.get(i) == Some(&':') {
        let spec_start = i + 1;
        while chars.get(i).is_some_and(|c| *c != '}') {
            i += 1;
        }
        spec = Some(chars[spec_start..i.min(chars.len())].iter().collect());
    }

    if chars.get(i) != Some(&'}') {
        return Err(ParserError::syntax_error("f-string: expecting '}'"));
    }

    Ok((
        ExprFormat {
            expr: Box::new(expr),
            conversion,
            spec,
        },
        i,
    ))
}

fn parse_embedded_expr(source: &str) -> Result<Expr, ParserError> {
    let tokens = Lexer::new(&Text::new(source))
        .tokenize()
        .map_err(|e| ParserError::syntax_error(format!("f-string: {e}")))?;

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    parser.consume_newlines();
    if !parser.is_finished() {
        return Err(ParserError::syntax_error("f-string: invalid syntax"));
    }
    Ok(expr)
}
