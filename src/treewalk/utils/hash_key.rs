/// The hashable identity of a value used as a dict key.
///
/// Values which compare equal in Python hash to the same key: `True`, `1` and `1.0` all become
/// `HashKey::Int(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    None,
    Int(i64),
    Float(u64),
    Str(String),
    Range(i64, i64, i64),
    Tuple(Vec<HashKey>),
    Identity(usize),
}

impl HashKey {
    pub fn from_float(f: f64) -> Self {
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            HashKey::Int(f as i64)
        } else {
            HashKey::Float(f.to_bits())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_match_ints() {
        assert_eq!(HashKey::from_float(3.0), HashKey::Int(3));
        assert_eq!(HashKey::from_float(-0.0), HashKey::Int(0));
        assert_eq!(HashKey::from_float(0.5), HashKey::Float(0.5f64.to_bits()));
    }
}
