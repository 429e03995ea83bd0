macro_rules! assert_eval_eq {
    ($expr:expr, $expected:expr) => {
        pretty_assertions::assert_eq!($crate::treewalk::test_utils::eval($expr), $expected)
    };
}

/// Compare the interpreter's own `repr` of an expression, for values which are awkward to build
/// by hand.
macro_rules! assert_eval_repr {
    ($expr:expr, $expected:expr) => {
        pretty_assertions::assert_eq!(
            $crate::treewalk::test_utils::eval($expr).default_repr(),
            $expected
        )
    };
}

macro_rules! assert_read_eq {
    ($run:expr, $name:expr, $expected:expr) => {
        pretty_assertions::assert_eq!($crate::treewalk::test_utils::read(&$run, $name), $expected)
    };
}

macro_rules! assert_read_repr {
    ($run:expr, $name:expr, $expected:expr) => {
        pretty_assertions::assert_eq!(
            $crate::treewalk::test_utils::read(&$run, $name).default_repr(),
            $expected
        )
    };
}

pub(crate) use assert_eval_eq;
pub(crate) use assert_eval_repr;
pub(crate) use assert_read_eq;
pub(crate) use assert_read_repr;
