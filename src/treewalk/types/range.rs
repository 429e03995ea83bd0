use std::fmt::{Display, Error, Formatter};

use crate::{
    domain::utils::normalize_index,
    treewalk::{types::Exception, DomainResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    pub fn new(start: i64, stop: i64, step: i64) -> DomainResult<Self> {
        if step == 0 {
            return Err(Exception::value_error("range() arg 3 must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    pub fn len(&self) -> usize {
        let (span, step) = if self.step > 0 {
            (self.stop as i128 - self.start as i128, self.step as i128)
        } else {
            (self.start as i128 - self.stop as i128, -(self.step as i128))
        };
        if span <= 0 {
            0
        } else {
            ((span + step - 1) / step) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: i64) -> DomainResult<i64> {
        normalize_index(index, self.len())
            .map(|i| self.start + i as i64 * self.step)
            .ok_or_else(|| Exception::index_error("range object index out of range"))
    }

    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = if self.step > 0 {
            value >= self.start && value < self.stop
        } else {
            value <= self.start && value > self.stop
        };
        in_bounds && (value as i128 - self.start as i128) % self.step as i128 == 0
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.step == 1 {
            write!(f, "range({}, {})", self.start, self.stop)
        } else {
            write!(f, "range({}, {}, {})", self.start, self.stop, self.step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(Range::new(0, 5, 1).unwrap().len(), 5);
        assert_eq!(Range::new(0, 5, 2).unwrap().len(), 3);
        assert_eq!(Range::new(5, 0, -2).unwrap().len(), 3);
        assert_eq!(Range::new(5, 0, 1).unwrap().len(), 0);
        assert!(Range::new(0, 1, 0).is_err());
    }

    #[test]
    fn membership_and_indexing() {
        let r = Range::new(1, 10, 3).unwrap();
        assert!(r.contains(7));
        assert!(!r.contains(8));
        assert!(!r.contains(10));
        assert_eq!(r.get(-1).unwrap(), 7);
        assert_eq!(r.to_string(), "range(1, 10, 3)");
        assert_eq!(Range::new(0, 3, 1).unwrap().to_string(), "range(0, 3)");
    }
}
