use std::cmp::Ordering;

use crate::{
    core::Container,
    parser::types::{BinOp, CompareOp, UnaryOp},
    treewalk::{
        result::Raise,
        types::Exception,
        value::Number,
        DomainResult, TreewalkInterpreter, TreewalkResult, TreewalkValue,
    },
};

fn unsupported(op: impl std::fmt::Display, a: &TreewalkValue, b: &TreewalkValue) -> Exception {
    Exception::type_error(format!(
        "unsupported operand type(s) for {op}: '{}' and '{}'",
        a.type_name(),
        b.type_name()
    ))
}

fn overflow() -> Exception {
    Exception::overflow_error("integer overflow")
}

/// Floor division with Python's rounding toward negative infinity.
fn int_floor_div(a: i64, b: i64) -> DomainResult<i64> {
    if b == 0 {
        return Err(Exception::div_by_zero_error(
            "integer division or modulo by zero",
        ));
    }
    let q = a.checked_div(b).ok_or_else(overflow)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Modulo whose result takes the sign of the divisor.
fn int_mod(a: i64, b: i64) -> DomainResult<i64> {
    if b == 0 {
        return Err(Exception::div_by_zero_error(
            "integer division or modulo by zero",
        ));
    }
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn float_mod(a: f64, b: f64) -> DomainResult<f64> {
    if b == 0.0 {
        return Err(Exception::div_by_zero_error("float modulo by zero"));
    }
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn int_pow(base: i64, exp: i64) -> DomainResult<TreewalkValue> {
    if exp < 0 {
        if base == 0 {
            return Err(Exception::div_by_zero_error(
                "0.0 cannot be raised to a negative power",
            ));
        }
        return Ok(TreewalkValue::Float((base as f64).powf(exp as f64)));
    }
    let exp = u32::try_from(exp).map_err(|_| overflow())?;
    base.checked_pow(exp)
        .map(TreewalkValue::Int)
        .ok_or_else(overflow)
}

fn shift(a: i64, b: i64, left: bool) -> DomainResult<i64> {
    if b < 0 {
        return Err(Exception::value_error("negative shift count"));
    }
    if left {
        if a == 0 {
            return Ok(0);
        }
        if b >= 64 {
            return Err(overflow());
        }
        let shifted = (a as i128) << b;
        i64::try_from(shifted).map_err(|_| overflow())
    } else if b >= 64 {
        Ok(if a < 0 { -1 } else { 0 })
    } else {
        Ok(a >> b)
    }
}

fn arithmetic(op: BinOp, a: Number, b: Number) -> DomainResult<TreewalkValue> {
    use Number::{Float, Int};

    if let (Int(x), Int(y)) = (a, b) {
        return Ok(match op {
            BinOp::Add => TreewalkValue::Int(x.checked_add(y).ok_or_else(overflow)?),
            BinOp::Sub => TreewalkValue::Int(x.checked_sub(y).ok_or_else(overflow)?),
            BinOp::Mul => TreewalkValue::Int(x.checked_mul(y).ok_or_else(overflow)?),
            BinOp::Div => {
                if y == 0 {
                    return Err(Exception::div_by_zero_error("division by zero"));
                }
                TreewalkValue::Float(x as f64 / y as f64)
            }
            BinOp::IntegerDiv => TreewalkValue::Int(int_floor_div(x, y)?),
            BinOp::Mod => TreewalkValue::Int(int_mod(x, y)?),
            BinOp::Expo => int_pow(x, y)?,
            BinOp::BitwiseAnd => TreewalkValue::Int(x & y),
            BinOp::BitwiseOr => TreewalkValue::Int(x | y),
            BinOp::BitwiseXor => TreewalkValue::Int(x ^ y),
            BinOp::LeftShift => TreewalkValue::Int(shift(x, y, true)?),
            BinOp::RightShift => TreewalkValue::Int(shift(x, y, false)?),
        });
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    Ok(TreewalkValue::Float(match op {
        BinOp::Add => x + y,
        BinOp::Sub => x - y,
        BinOp::Mul => x * y,
        BinOp::Div => {
            if y == 0.0 {
                return Err(Exception::div_by_zero_error("float division by zero"));
            }
            x / y
        }
        BinOp::IntegerDiv => {
            if y == 0.0 {
                return Err(Exception::div_by_zero_error(
                    "float floor division by zero",
                ));
            }
            (x / y).floor()
        }
        BinOp::Mod => float_mod(x, y)?,
        BinOp::Expo => {
            if x == 0.0 && y < 0.0 {
                return Err(Exception::div_by_zero_error(
                    "0.0 cannot be raised to a negative power",
                ));
            }
            x.powf(y)
        }
        _ => {
            let (a, b) = match (a, b) {
                (Float(_), _) => (TreewalkValue::Float(x), number_value(b)),
                _ => (number_value(a), TreewalkValue::Float(y)),
            };
            return Err(unsupported(op, &a, &b));
        }
    }))
}

fn number_value(n: Number) -> TreewalkValue {
    match n {
        Number::Int(i) => TreewalkValue::Int(i),
        Number::Float(f) => TreewalkValue::Float(f),
    }
}

/// Longest list, tuple or string (in bytes) that `*` will build.
const MAX_REPEAT_LEN: usize = 1 << 26;

/// Length of `len` repeated `times` times, refusing results longer than [`MAX_REPEAT_LEN`].
fn repeated_len(len: usize, times: i64, what: &str) -> DomainResult<usize> {
    let times = usize::try_from(times.max(0)).unwrap_or(usize::MAX);
    match len.checked_mul(times) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(total),
        _ => Err(Exception::overflow_error(format!("repeated {what} is too long"))),
    }
}

fn repeat(items: &[TreewalkValue], times: i64) -> DomainResult<Vec<TreewalkValue>> {
    let total = repeated_len(items.len(), times, "sequence")?;
    Ok(items.iter().cloned().cycle().take(total).collect())
}

/// Order two values the way `<` does, for builtin types only.
pub fn order(a: &TreewalkValue, b: &TreewalkValue) -> DomainResult<Ordering> {
    let incomparable = || {
        Exception::type_error(format!(
            "'<' not supported between instances of '{}' and '{}'",
            a.type_name(),
            b.type_name()
        ))
    };

    match (a, b) {
        (TreewalkValue::Str(x), TreewalkValue::Str(y)) => Ok(x.cmp(y)),
        (TreewalkValue::List(x), TreewalkValue::List(y)) => {
            let x = x.borrow().items().to_vec();
            let y = y.borrow().items().to_vec();
            order_sequences(&x, &y)
        }
        (TreewalkValue::Tuple(x), TreewalkValue::Tuple(y)) => {
            order_sequences(x.items(), y.items())
        }
        _ => match (a.as_number(), b.as_number()) {
            (Some(Number::Int(x)), Some(Number::Int(y))) => Ok(x.cmp(&y)),
            (Some(x), Some(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .ok_or_else(incomparable),
            _ => Err(incomparable()),
        },
    }
}

fn order_sequences(x: &[TreewalkValue], y: &[TreewalkValue]) -> DomainResult<Ordering> {
    for (a, b) in x.iter().zip(y) {
        if a == b {
            continue;
        }
        return order(a, b);
    }
    Ok(x.len().cmp(&y.len()))
}

impl TreewalkInterpreter<'_> {
    pub fn binary_op(
        &self,
        op: BinOp,
        left: &TreewalkValue,
        right: &TreewalkValue,
    ) -> TreewalkResult<TreewalkValue> {
        use TreewalkValue as V;

        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            // Bitwise operators on two bools stay bools.
            if let (V::Bool(x), V::Bool(y)) = (left, right) {
                match op {
                    BinOp::BitwiseAnd => return Ok(V::Bool(x & y)),
                    BinOp::BitwiseOr => return Ok(V::Bool(x | y)),
                    BinOp::BitwiseXor => return Ok(V::Bool(x ^ y)),
                    _ => {}
                }
            }
            return arithmetic(op, a, b).raise(self);
        }

        let result = match (op, left, right) {
            (BinOp::Add, V::Str(a), V::Str(b)) => V::Str(format!("{a}{b}")),
            (BinOp::Mul, V::Str(s), n @ (V::Int(_) | V::Bool(_)))
            | (BinOp::Mul, n @ (V::Int(_) | V::Bool(_)), V::Str(s)) => {
                let times = n.as_int().raise(self)?;
                repeated_len(s.len(), times, "string").raise(self)?;
                V::Str(s.repeat(times.max(0) as usize))
            }
            (BinOp::Add, V::List(a), V::List(b)) => {
                let mut items = a.borrow().items().to_vec();
                items.extend(b.borrow().items().iter().cloned());
                V::new_list(items)
            }
            (BinOp::Mul, V::List(l), n @ (V::Int(_) | V::Bool(_)))
            | (BinOp::Mul, n @ (V::Int(_) | V::Bool(_)), V::List(l)) => {
                let items = l.borrow().items().to_vec();
                V::new_list(repeat(&items, n.as_int().raise(self)?).raise(self)?)
            }
            (BinOp::Add, V::Tuple(a), V::Tuple(b)) => {
                let mut items = a.items().to_vec();
                items.extend(b.items().iter().cloned());
                V::new_tuple(items)
            }
            (BinOp::Mul, V::Tuple(t), n @ (V::Int(_) | V::Bool(_)))
            | (BinOp::Mul, n @ (V::Int(_) | V::Bool(_)), V::Tuple(t)) => {
                V::new_tuple(repeat(t.items(), n.as_int().raise(self)?).raise(self)?)
            }
            (BinOp::BitwiseOr, V::Dict(a), V::Dict(b)) => {
                let mut merged = a.borrow().clone();
                for (k, v) in b.borrow().entries() {
                    merged.insert(k.clone(), v.clone()).raise(self)?;
                }
                V::Dict(Container::new(merged))
            }
            _ => return unsupported(op, left, right).raise(self),
        };
        Ok(result)
    }

    /// `+=` and friends. Lists are extended in place, everything else rebinds.
    pub fn inplace_op(
        &self,
        op: BinOp,
        left: &TreewalkValue,
        right: &TreewalkValue,
    ) -> TreewalkResult<TreewalkValue> {
        if let (BinOp::Add, TreewalkValue::List(list)) = (op, left) {
            let items = self.collect_items(right)?;
            list.borrow_mut().extend(items);
            return Ok(left.clone());
        }
        self.binary_op(op, left, right)
    }

    pub fn unary_op(&self, op: UnaryOp, value: &TreewalkValue) -> TreewalkResult<TreewalkValue> {
        if op == UnaryOp::Not {
            return Ok(TreewalkValue::Bool(!self.is_truthy(value)?));
        }

        let result = match (op, value.as_number()) {
            (UnaryOp::Minus, Some(Number::Int(i))) => i
                .checked_neg()
                .map(TreewalkValue::Int)
                .ok_or_else(overflow),
            (UnaryOp::Minus, Some(Number::Float(f))) => Ok(TreewalkValue::Float(-f)),
            (UnaryOp::Plus, Some(Number::Int(i))) => Ok(TreewalkValue::Int(i)),
            (UnaryOp::Plus, Some(Number::Float(f))) => Ok(TreewalkValue::Float(f)),
            (UnaryOp::BitwiseNot, Some(Number::Int(i))) => Ok(TreewalkValue::Int(!i)),
            _ => Err(Exception::type_error(format!(
                "bad operand type for unary {op}: '{}'",
                value.type_name()
            ))),
        };
        result.raise(self)
    }

    pub fn compare(
        &self,
        op: CompareOp,
        left: &TreewalkValue,
        right: &TreewalkValue,
    ) -> TreewalkResult<bool> {
        let ordering = |expected: &[Ordering]| -> TreewalkResult<bool> {
            let ordering = order(left, right).map_err(|_| {
                Exception::type_error(format!(
                    "'{op}' not supported between instances of '{}' and '{}'",
                    left.type_name(),
                    right.type_name()
                ))
            });
            Ok(expected.contains(&ordering.raise(self)?))
        };

        match op {
            CompareOp::Equals => self.values_equal(left, right),
            CompareOp::NotEquals => Ok(!self.values_equal(left, right)?),
            CompareOp::LessThan => ordering(&[Ordering::Less]),
            CompareOp::LessThanOrEqual => ordering(&[Ordering::Less, Ordering::Equal]),
            CompareOp::GreaterThan => ordering(&[Ordering::Greater]),
            CompareOp::GreaterThanOrEqual => ordering(&[Ordering::Greater, Ordering::Equal]),
            CompareOp::In => self.contains(right, left),
            CompareOp::NotIn => Ok(!self.contains(right, left)?),
            CompareOp::Is => Ok(left.is(right)),
            CompareOp::IsNot => Ok(!left.is(right)),
        }
    }

    /// Sort `items` in place, ordering by `key(item)` when a key function is given.
    pub fn sort_values(
        &self,
        items: Vec<TreewalkValue>,
        key: Option<&TreewalkValue>,
        reverse: bool,
    ) -> TreewalkResult<Vec<TreewalkValue>> {
        let mut keyed = items
            .into_iter()
            .map(|item| {
                let sort_key = match key {
                    Some(key) if *key != TreewalkValue::None => {
                        self.call_value(key, crate::treewalk::utils::Args::new(vec![item.clone()]))?
                    }
                    _ => item.clone(),
                };
                Ok((sort_key, item))
            })
            .collect::<TreewalkResult<Vec<_>>>()?;

        let mut error = None;
        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = match order(a, b) {
                Ok(ordering) => ordering,
                Err(e) => {
                    error.get_or_insert(e);
                    Ordering::Equal
                }
            };
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        });
        if let Some(e) = error {
            return e.raise(self);
        }

        Ok(keyed.into_iter().map(|(_, item)| item).collect())
    }
}
