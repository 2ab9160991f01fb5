//
// src/validate.rs: syntactic validation of ADIF field values
//
// The rules here follow the data types of ADIF 3.0.4.  Validation is purely
// syntactic: a Date must be a real calendar date, but nothing here checks
// that, say, a QSO_DATE isn't in the future.  An empty value is always valid
// because it means no data was supplied for the field.
//
// Validation never fails.  It returns a verdict and leaves it to the caller to
// decide whether an invalid value should be rejected, flagged, or kept.
//

use crate::adif::AdifRecord;
use crate::adifutil::fixed_digits;
use crate::enums;
use crate::fields::{self, DataType, EnumKind};
use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

//
// Optional sign, then digits with at most one decimal point, which may lead
// or trail the digits but may not stand alone.
//
static NUMBER_RE : LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(([0-9]+\.?[0-9]*)|([0-9]*\.?[0-9]+))$")
        .expect("number pattern is valid")
});

// Earliest year accepted in an ADIF Date.
const ADIF_DATE_MIN_YEAR : u32 = 1930;

//
// Returns true if "value" is valid for the given data type.  "field_name" is
// only consulted for enumerations, where the set of valid values depends on
// the field.
//
pub fn adif_is_valid(field_name: &str, value: &str, data_type: &DataType) ->
    bool
{
    debug!("validating field \"{}\" ({}): \"{}\"", field_name, data_type,
        value);

    if value.is_empty() {
        return true;
    }

    match data_type {
        DataType::Number => NUMBER_RE.is_match(value),
        DataType::Boolean => value == "Y" || value == "N",
        DataType::Date => valid_date(value),
        DataType::Time => valid_time(value),
        DataType::String | DataType::IntlString => !value.contains('\n'),
        DataType::IntlMultilineString | DataType::MultilineString => true,
        DataType::Location => valid_location(value),
        DataType::Enumeration | DataType::AwardList => {
            let canon = field_name.to_ascii_uppercase();
            valid_enumeration(fields::enum_kind_of(&canon), value)
        }
        DataType::Other(_) => true,
    }
}

//
// Returns the names of the fields of "record" whose values are not valid for
// the data type the field table assigns them.
//
pub fn adif_validate_record(record: &AdifRecord) -> Vec<String>
{
    record.iter()
        .filter(|(name, value)| {
            !adif_is_valid(name, value, &fields::data_type_of(name))
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

// YYYYMMDD
fn valid_date(value: &str) -> bool
{
    if value.len() != 8 || !value.is_ascii() {
        return false;
    }

    let year = match fixed_digits(&value[0..4], 4) {
        Some(y) if y >= ADIF_DATE_MIN_YEAR => y,
        _ => return false,
    };

    let (month, day) = match (fixed_digits(&value[4..6], 2),
        fixed_digits(&value[6..8], 2)) {
        (Some(m), Some(d)) => (m, d),
        _ => return false,
    };

    NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
}

// HHMM or HHMMSS
fn valid_time(value: &str) -> bool
{
    if (value.len() != 4 && value.len() != 6) || !value.is_ascii() {
        return false;
    }

    let in_range = |text: &str, max: u32| {
        fixed_digits(text, 2).is_some_and(|n| n <= max)
    };

    in_range(&value[0..2], 23) &&
        in_range(&value[2..4], 59) &&
        (value.len() == 4 || in_range(&value[4..6], 59))
}

//
// XDDD MM.MMM, where X is a direction (E, W, N, or S), DDD is degrees (up to
// 180), and MM.MMM is minutes (less than 60).
//
fn valid_location(value: &str) -> bool
{
    if value.len() != 10 || !value.is_ascii() {
        return false;
    }

    let direction = value.as_bytes()[0].to_ascii_uppercase();
    if !matches!(direction, b'E' | b'W' | b'N' | b'S') {
        return false;
    }

    let degrees_ok = fixed_digits(&value[1..4], 3).is_some_and(|d| d <= 180);
    let minutes_ok = fixed_digits(&value[4..6], 2).is_some_and(|m| m <= 59) &&
        &value[6..7] == "." &&
        fixed_digits(&value[7..10], 3).is_some();

    degrees_ok && minutes_ok
}

fn valid_enumeration(kind: EnumKind, value: &str) -> bool
{
    match kind {
        EnumKind::Mode => enums::is_member_of_mode(value),
        EnumKind::Submode => enums::is_member_of_any_submode(value),
        EnumKind::Band => enums::is_member_of_band(value),
        EnumKind::Open => true,
    }
}
