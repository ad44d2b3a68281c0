/// Build a [`FnHandler`](crate::FnHandler) from a test and a transform.
///
/// ```
/// use json_replacer::{Value, handler};
///
/// let plus_hundred = handler! {
///     name: "plus_hundred",
///     test: |_key, value| matches!(value, Value::Number(_)),
///     transform: |_key, value| Ok(Value::Number(value.as_f64().unwrap_or_default() + 100.0)),
/// };
/// # let _ = plus_hundred;
/// ```
#[macro_export]
macro_rules! handler {
    (
        name: $name:expr,
        test: |$tk:pat_param, $tv:pat_param| $test:expr,
        transform: |$xk:pat_param, $xv:pat_param| $body:expr
        $(,)?
    ) => {{
        $crate::FnHandler::new(
            $name,
            move |$tk: &str, $tv: &$crate::Value| -> bool { $test },
            move |$xk: &str, $xv: $crate::Value| -> ::std::result::Result<$crate::Value, $crate::HandlerError> {
                $body
            },
        )
    }};
}

/// Box an error message as a [`HandlerError`](crate::HandlerError).
#[macro_export]
macro_rules! handler_err {
    ($($arg:tt)*) => {
        ::std::result::Result::Err($crate::HandlerError::from(format!($($arg)*)))
    };
}
