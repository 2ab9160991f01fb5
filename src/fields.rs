//
// src/fields.rs: ADIF field names and their data types
//
// ADIF associates each field with a data type, identified in the standard by
// a single-letter indicator (e.g., "D" for Date).  A data specifier in an ADI
// file may carry its own indicator ("<qso_date:8:d>"), but most files leave it
// out and rely on the type the standard assigns to the field.  The table below
// is the set of fields this crate knows about.  Anything else is treated as a
// String for validation purposes.
//

use std::fmt;

//
// DataType: one of the ADIF data types.  "Other" preserves an indicator that
// isn't one we know about so that newer files still round-trip; values of such
// types are never rejected.
//
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Number,
    Boolean,
    Date,
    Time,
    String,
    IntlString,
    IntlMultilineString,
    MultilineString,
    Location,
    Enumeration,
    AwardList,
    Other(String),
}

impl DataType {
    //
    // Interpret a data type indicator, as found in a field table or after the
    // second colon of a data specifier.  Indicators are case-insensitive.
    //
    pub fn from_indicator(indicator: &str) -> DataType
    {
        match indicator.to_ascii_uppercase().as_str() {
            "N" => DataType::Number,
            "B" => DataType::Boolean,
            "D" => DataType::Date,
            "T" => DataType::Time,
            "S" => DataType::String,
            "I" => DataType::IntlString,
            "G" => DataType::IntlMultilineString,
            "M" => DataType::MultilineString,
            "L" => DataType::Location,
            "E" => DataType::Enumeration,
            "A" => DataType::AwardList,
            _ => DataType::Other(indicator.to_string()),
        }
    }

    pub fn indicator(&self) -> &str
    {
        match self {
            DataType::Number => "N",
            DataType::Boolean => "B",
            DataType::Date => "D",
            DataType::Time => "T",
            DataType::String => "S",
            DataType::IntlString => "I",
            DataType::IntlMultilineString => "G",
            DataType::MultilineString => "M",
            DataType::Location => "L",
            DataType::Enumeration => "E",
            DataType::AwardList => "A",
            DataType::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.indicator())
    }
}

//
// EnumKind: which enumeration a field's value is checked against.  Only a few
// enumerations are closed as far as validation is concerned.  The rest
// ("Open") accept anything.
//
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumKind {
    Mode,
    Submode,
    Band,
    Open,
}

//
// AdifFieldSpec: one entry in the table of known fields.
//
#[derive(Debug)]
pub struct AdifFieldSpec {
    pub adfs_name : &'static str,       // canonical (upper-case) field name
    pub adfs_type : &'static str,       // data type indicator
    pub adfs_label : &'static str,      // user-friendly name
}

//
// Known fields, in the order an application would usually display them.
// Note that IOTA carries the indicator "C", which isn't one of the standard
// data types, so it's never rejected.
//
const ADIF_FIELDS : &[AdifFieldSpec] = &[
    field("CALL", "S", "Callsign"),
    field("QSO_DATE", "D", "Date"),
    field("TIME_ON", "T", "Time"),
    field("FREQ", "N", "Frequency (MHz)"),
    field("BAND", "E", "Band"),
    field("MODE", "E", "Mode"),
    field("SUBMODE", "E", "Submode"),
    field("PROP_MODE", "E", "Propagation Mode"),
    field("TX_PWR", "N", "TX Power (W)"),
    field("RST_SENT", "S", "RST Sent"),
    field("RST_RCVD", "S", "RST Received"),
    field("QSL_SENT", "S", "QSL Sent"),
    field("QSL_RCVD", "S", "QSL Received"),
    field("NOTES", "M", "Notes"),
    field("NAME", "S", "Name"),
    field("ADDRESS", "S", "Address"),
    field("STATE", "S", "State"),
    field("COUNTRY", "S", "Country"),
    field("DXCC", "N", "DXCC"),
    field("CQZ", "N", "CQ Zone"),
    field("ITUZ", "N", "ITU Zone"),
    field("IOTA", "C", "IOTA Designator"),
    field("GRIDSQUARE", "S", "Grid Square"),
    field("SAT_NAME", "S", "Satellite Name"),
    field("SAT_MODE", "S", "Satellite Mode"),
];

const fn field(name: &'static str, dtype: &'static str, label: &'static str) ->
    AdifFieldSpec
{
    AdifFieldSpec {
        adfs_name: name,
        adfs_type: dtype,
        adfs_label: label,
    }
}

fn field_spec(field_name: &str) -> Option<&'static AdifFieldSpec>
{
    ADIF_FIELDS.iter().find(|f| f.adfs_name.eq_ignore_ascii_case(field_name))
}

//
// Returns the data type of the named field (case-insensitive), or String if
// the field is unknown.
//
pub fn data_type_of(field_name: &str) -> DataType
{
    match field_spec(field_name) {
        Some(spec) => DataType::from_indicator(spec.adfs_type),
        None => DataType::String,
    }
}

//
// Returns which enumeration governs the named field.  Field names are expected
// in canonical upper case here, as the validator receives them.
//
pub fn enum_kind_of(field_name: &str) -> EnumKind
{
    match field_name {
        "MODE" => EnumKind::Mode,
        "SUBMODE" => EnumKind::Submode,
        "BAND" => EnumKind::Band,
        _ => EnumKind::Open,
    }
}

pub fn field_friendly_name(field_name: &str) -> Option<&'static str>
{
    field_spec(field_name).map(|f| f.adfs_label)
}

//
// Returns the known field names in display order.
//
pub fn adif_field_names() -> impl Iterator<Item = &'static str>
{
    ADIF_FIELDS.iter().map(|f| f.adfs_name)
}
