//
// Amateur Data Interchange Format (ADIF) is a standardized file format used for
// exchanging data about amateur radio contacts ("QSOs").  This crate reads,
// validates, and writes ADIF logs so that they can be exchanged between
// logging programs.
//
// The data types and enumerations implemented here are those of ADIF 3.0.4:
//
//   http://www.adif.org/304/ADIF_304.htm
//
// Note that much of ADIF describes a logical form for the data.  There are
// currently two physical file formats: ADI (a somewhat baroque format described
// originally in version 1, which dates back to 1996) and ADX (a more modern
// XML-based format).  ADI appears to be more widely used, while ADX is marked
// optional in the standard.  For that reason, this crate only implements ADI.
//
// The interface consists of three operations:
//
//   adif_read()        parse an ADI stream into a list of records
//   adif_write()       write a list of records as an ADI stream
//   adif_is_valid()    check a single field value against its data type
//
// The lower-level pieces (the tag stream, the field table, and the
// enumerations) are exported too, for consumers that need them.
//

use std::io;
use thiserror::Error;

pub mod adi;
pub mod adif;
pub mod adifutil;
pub mod enums;
pub mod fields;
pub mod validate;

pub use adi::AdiParseError;
pub use adif::{AdifFile, AdifHeaderInfo, AdifRecord, AdifRecordSource};
pub use adif::{adif_parse, adif_parse_str, adif_write_file, ADIF_VERSION};
pub use fields::{data_type_of, DataType};
pub use validate::{adif_is_valid, adif_validate_record};

//
// AdifError is used to represent any failure reading or writing ADIF.  Note
// that an invalid field value is not an error.  See adif_is_valid().
//
#[derive(Debug, Error)]
pub enum AdifError {
    #[error("parse error: {0}")]
    Parse(#[from] AdiParseError),

    #[error("record {record}: duplicate value for field \"{field}\"")]
    DuplicateField { record: usize, field: String },

    #[error("record {record}: field name \"{field}\" cannot be written")]
    BadFieldName { record: usize, field: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

//
// Read all records from an ADI stream.  Header fields are discarded.  Use
// adif_parse() to get at them.
//
pub fn adif_read(source: &mut dyn io::Read) -> Result<Vec<AdifRecord>, AdifError>
{
    Ok(adif::adif_parse("input", source)?.adif_records)
}

//
// Write records as an ADI stream, identifying this program in the header.
//
pub fn adif_write<R: AdifRecordSource>(records: &[R], dest: &mut dyn io::Write,
    program_id: &str, program_version: &str) -> Result<(), AdifError>
{
    let header = AdifHeaderInfo::new(program_id, program_version);
    adif::adif_write_records(records, &header, dest)
}
