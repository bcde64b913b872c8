//! Arrow utility functions for value extraction
//!
//! Loaded tables come from CSV schema inference, so one logical column can
//! arrive as several physical types (a counter as `Int64` or `Float64`, a
//! flag as `Boolean`, `Int64` or `Utf8`). These helpers read a single value
//! from any of the accepted representations and return `None` for nulls and
//! unreadable values. [`is_blank`] tells the two apart.

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Date64Array, Float32Array, Float64Array,
    Int32Array, Int64Array, LargeStringArray, StringArray, StringViewArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use crate::error::{Result, TrialError};

/// Date formats accepted in text columns
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Parse a textual boolean flag
///
/// Accepts `true`/`false` in any case, `1`/`0` and `yes`/`no`.
#[must_use]
pub fn parse_bool_label(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a textual date in one of [`DATE_FORMATS`]
#[must_use]
pub fn parse_date_label(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // Timestamps such as "2024-01-15 08:00:00" keep only the date part
    let value = value.split([' ', 'T']).next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn str_value(array: &ArrayRef, index: usize) -> Option<&str> {
    match array.data_type() {
        DataType::Utf8 => Some(array.as_any().downcast_ref::<StringArray>()?.value(index)),
        DataType::LargeUtf8 => Some(
            array
                .as_any()
                .downcast_ref::<LargeStringArray>()?
                .value(index),
        ),
        DataType::Utf8View => Some(
            array
                .as_any()
                .downcast_ref::<StringViewArray>()?
                .value(index),
        ),
        _ => None,
    }
}

/// Whether a cell is null or holds only whitespace
#[must_use]
pub fn is_blank(array: &ArrayRef, index: usize) -> bool {
    array.is_null(index) || str_value(array, index).is_some_and(|s| s.trim().is_empty())
}

/// Extract a string value, rendering integer ids as text
#[must_use]
pub fn arrow_array_to_string(array: &ArrayRef, index: usize) -> Option<String> {
    if array.is_null(index) {
        return None;
    }

    match array.data_type() {
        DataType::Int32 => {
            let int_array = array.as_any().downcast_ref::<Int32Array>()?;
            Some(int_array.value(index).to_string())
        }
        DataType::Int64 => {
            let int_array = array.as_any().downcast_ref::<Int64Array>()?;
            Some(int_array.value(index).to_string())
        }
        _ => str_value(array, index).map(str::to_string),
    }
}

/// Extract a date value from a date or text column
#[must_use]
pub fn arrow_array_to_date(array: &ArrayRef, index: usize) -> Option<NaiveDate> {
    if array.is_null(index) {
        return None;
    }

    match array.data_type() {
        DataType::Date32 => {
            let date_array = array.as_any().downcast_ref::<Date32Array>()?;
            date_array.value_as_date(index)
        }
        DataType::Date64 => {
            let date_array = array.as_any().downcast_ref::<Date64Array>()?;
            date_array.value_as_date(index)
        }
        _ => str_value(array, index).and_then(parse_date_label),
    }
}

/// Extract an integer counter
///
/// Whole floats are accepted; fractional or non-finite floats are not.
#[must_use]
pub fn arrow_array_to_i64(array: &ArrayRef, index: usize) -> Option<i64> {
    if array.is_null(index) {
        return None;
    }

    let whole = |value: f64| (value.is_finite() && value.fract() == 0.0).then_some(value as i64);

    match array.data_type() {
        DataType::Int32 => {
            let int_array = array.as_any().downcast_ref::<Int32Array>()?;
            Some(i64::from(int_array.value(index)))
        }
        DataType::Int64 => {
            let int_array = array.as_any().downcast_ref::<Int64Array>()?;
            Some(int_array.value(index))
        }
        DataType::Float32 => {
            let float_array = array.as_any().downcast_ref::<Float32Array>()?;
            whole(f64::from(float_array.value(index)))
        }
        DataType::Float64 => {
            let float_array = array.as_any().downcast_ref::<Float64Array>()?;
            whole(float_array.value(index))
        }
        _ => str_value(array, index).and_then(|s| s.trim().parse().ok()),
    }
}

/// Extract a float value
#[must_use]
pub fn arrow_array_to_f64(array: &ArrayRef, index: usize) -> Option<f64> {
    if array.is_null(index) {
        return None;
    }

    match array.data_type() {
        DataType::Int32 => {
            let int_array = array.as_any().downcast_ref::<Int32Array>()?;
            Some(f64::from(int_array.value(index)))
        }
        DataType::Int64 => {
            let int_array = array.as_any().downcast_ref::<Int64Array>()?;
            Some(int_array.value(index) as f64)
        }
        DataType::Float32 => {
            let float_array = array.as_any().downcast_ref::<Float32Array>()?;
            Some(f64::from(float_array.value(index)))
        }
        DataType::Float64 => {
            let float_array = array.as_any().downcast_ref::<Float64Array>()?;
            Some(float_array.value(index))
        }
        _ => str_value(array, index).and_then(|s| s.trim().parse().ok()),
    }
}

/// Extract a boolean flag from a boolean, integer or text column
#[must_use]
pub fn arrow_array_to_bool(array: &ArrayRef, index: usize) -> Option<bool> {
    if array.is_null(index) {
        return None;
    }

    match array.data_type() {
        DataType::Boolean => {
            let bool_array = array.as_any().downcast_ref::<BooleanArray>()?;
            Some(bool_array.value(index))
        }
        DataType::Int32 | DataType::Int64 => match arrow_array_to_i64(array, index)? {
            1 => Some(true),
            0 => Some(false),
            _ => None,
        },
        _ => str_value(array, index).and_then(parse_bool_label),
    }
}

/// Get a column by name, or `None` when the table does not carry it
#[must_use]
pub fn get_optional_column(batch: &RecordBatch, column_name: &str) -> Option<ArrayRef> {
    batch
        .schema()
        .index_of(column_name)
        .ok()
        .map(|idx| batch.column(idx).clone())
}

/// Get a required column by name
pub fn get_column(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    get_optional_column(batch, column_name)
        .ok_or_else(|| TrialError::MissingColumn(column_name.to_string()))
}
