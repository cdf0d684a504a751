//! Canonical logging macros
//!
//! Every gate operation logs a start/end pair (or start/end_error) with the
//! component, op and event fields from `featuregates_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use featuregates_core::log_op_start;
/// log_op_start!("gates.load");
/// log_op_start!("gates.load", raw_len = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use featuregates_core::log_op_end;
/// log_op_end!("gates.load", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` is a `GateError` or `&GateError`; it is borrowed, not moved.
/// The rendered `error` field carries the op plus any gate key or source path.
///
/// # Example
///
/// ```
/// # use featuregates_core::{log_op_error, errors::GateError};
/// let err = GateError::MissingLogger;
/// log_op_error!("gates.initialize", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err = $crate::errors::ExError::from(
            ::std::borrow::Borrow::<$crate::errors::GateError>::borrow(&$err),
        )
        .with_op($op);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            message = ex_err.message(),
            gate_key = ex_err.gate_key(),
            source_path = ex_err.source_path(),
            error = %ex_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err = $crate::errors::ExError::from(
            ::std::borrow::Borrow::<$crate::errors::GateError>::borrow(&$err),
        )
        .with_op($op);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = featuregates_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            message = ex_err.message(),
            gate_key = ex_err.gate_key(),
            source_path = ex_err.source_path(),
            error = %ex_err,
            $($field)*
        );
    }};
}
