macro_rules! assert_error {
    ($exc:expr, $kind:expr, $expected_message:expr) => {{
        let exc: &$crate::treewalk::types::Exception = &$exc;
        assert_eq!(exc.kind, $kind, "Unexpected exception: {:?}", exc);
        assert_eq!(
            exc.message(),
            $expected_message,
            "Unexpected {} message",
            exc.kind
        );
    }};
}

macro_rules! assert_type_error {
    ($exc:expr, $expected_message:expr) => {
        assert_error!(
            $exc,
            $crate::domain::ExceptionKind::TypeError,
            $expected_message
        )
    };
}

macro_rules! assert_value_error {
    ($exc:expr, $expected_message:expr) => {
        assert_error!(
            $exc,
            $crate::domain::ExceptionKind::ValueError,
            $expected_message
        )
    };
}

macro_rules! assert_name_error {
    ($exc:expr, $name:expr) => {
        assert_error!(
            $exc,
            $crate::domain::ExceptionKind::NameError,
            format!("name '{}' is not defined", $name)
        )
    };
}

macro_rules! assert_attribute_error {
    ($exc:expr, $expected_message:expr) => {
        assert_error!(
            $exc,
            $crate::domain::ExceptionKind::AttributeError,
            $expected_message
        )
    };
}

pub(crate) use assert_attribute_error;
pub(crate) use assert_error;
pub(crate) use assert_name_error;
pub(crate) use assert_type_error;
pub(crate) use assert_value_error;
