//
// src/adif.rs: logical ADIF reader and writer
//
// The facilities in this file convert between the physical tag stream of an
// ADI file (see adi.rs) and the records consumers actually want: ordered sets
// of field names and values, one per QSO.
//

use crate::adi::{self, AdiDataSpecifier, AdiTag};
use crate::AdifError;
use chrono::{NaiveDateTime, Utc};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;

// Well-known header fields
const ADIF_HEADER_ADIF_VER : &str = "ADIF_VER";
const ADIF_HEADER_CREATED_TIMESTAMP : &str = "CREATED_TIMESTAMP";
const ADIF_HEADER_PROGRAMID : &str = "PROGRAMID";
const ADIF_HEADER_PROGRAMVERSION : &str = "PROGRAMVERSION";

// Version of the standard whose data types and enumerations we implement.
pub const ADIF_VERSION : &str = "3.0.4";

// Callsigns are always stored upper-case, whatever the file says.
const ADIF_FIELD_CALL : &str = "CALL";

//
// AdifRecord: one QSO.  Fields keep the order in which they were inserted,
// which is the order they're written out in.  Names are canonicalized to upper
// case on insertion, so each name appears at most once.  Two records are equal
// if they have the same fields with the same values, in any order.
//
#[derive(Clone, Debug, Default)]
pub struct AdifRecord {
    adir_fields : Vec<(String, String)>
}

impl AdifRecord {
    pub fn new() -> AdifRecord
    {
        AdifRecord::default()
    }

    //
    // Set the value of a field.  If the field was already present, its value
    // is replaced in place and the old value returned.
    //
    pub fn insert(&mut self, name: &str, value: &str) -> Option<String>
    {
        let canon = name.to_ascii_uppercase();
        match self.adir_fields.iter_mut().find(|(n, _)| *n == canon) {
            Some((_, v)) => Some(std::mem::replace(v, value.to_string())),
            None => {
                self.adir_fields.push((canon, value.to_string()));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str>
    {
        self.adir_fields.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool
    {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize
    {
        self.adir_fields.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.adir_fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)>
    {
        self.adir_fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl PartialEq for AdifRecord {
    fn eq(&self, other: &AdifRecord) -> bool
    {
        self.len() == other.len() &&
            self.iter().all(|(n, v)| other.get(n) == Some(v))
    }
}

impl Eq for AdifRecord {}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AdifRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> AdifRecord
    {
        let mut record = AdifRecord::new();
        for (name, value) in iter {
            record.insert(name.as_ref(), value.as_ref());
        }
        record
    }
}

impl fmt::Display for AdifRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "RECORD:")?;

        for (key, value) in self.iter() {
            writeln!(f, "    {:20}: {}", key, value)?;
        }

        Ok(())
    }
}

//
// AdifFile: the result of parsing a complete ADI input.
//
pub struct AdifFile {
    // Well-known header fields
    pub adif_adif_version : Option<String>,
    pub adif_program_id : Option<String>,
    pub adif_program_version : Option<String>,
    pub adif_created_timestamp : Option<String>,

    // Metadata
    pub adif_label : String,    // label for this file (e.g., filename)

    // File contents
    pub adif_records : Vec<AdifRecord>,     // list of records in the file
}

impl fmt::Display for AdifFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "ADIF file:  {}", self.adif_label)?;
        writeln!(f, "ADIF version: {}",
            self.adif_adif_version.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "Created at: {}",
            self.adif_created_timestamp.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "Created by: {} {}",
            match &self.adif_program_id {
                Some(p) => format!("program \"{}\"", p),
                None => String::from("unknown program")
            },
            match &self.adif_program_version {
                Some(v) => format!("version \"{}\"", v),
                None => String::from("unknown version")
            })?;
        writeln!(f, "Total records: {}", self.adif_records.len())
    }
}

//
// AdifRecordSource: anything that can enumerate (field name, value) pairs in a
// stable order can be written as a record.  Records come from different places
// (records we parsed, maps a caller built by hand, rows pulled out of a
// database), and the writer doesn't care which.
//
pub trait AdifRecordSource {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;
}

impl AdifRecordSource for AdifRecord {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>
    {
        Box::new(self.iter())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> AdifRecordSource for BTreeMap<K, V> {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>
    {
        Box::new(self.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> AdifRecordSource for [(K, V)] {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>
    {
        Box::new(self.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> AdifRecordSource for Vec<(K, V)> {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>
    {
        self.as_slice().adif_fields()
    }
}

impl<T: AdifRecordSource + ?Sized> AdifRecordSource for &T {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>
    {
        (**self).adif_fields()
    }
}

//
// AdifHeaderInfo: what the writer puts in the header.  If "adhi_created" is
// not set, the current time is used.
//
#[derive(Clone, Debug)]
pub struct AdifHeaderInfo {
    pub adhi_adif_version : String,
    pub adhi_program_id : String,
    pub adhi_program_version : String,
    pub adhi_created : Option<NaiveDateTime>,
}

impl AdifHeaderInfo {
    pub fn new(program_id: &str, program_version: &str) -> AdifHeaderInfo
    {
        AdifHeaderInfo {
            adhi_adif_version: String::from(ADIF_VERSION),
            adhi_program_id: program_id.to_string(),
            adhi_program_version: program_version.to_string(),
            adhi_created: None,
        }
    }
}

//
// ADIF import
//

//
// Parse an ADI input into records.  Tags up to the first "<eoh>" are the
// header.  If there's no "<eoh>" at all, there's no header, and every tag
// belongs to the body.  Since we can't know that until we reach the end of the
// input, tags are held aside until either "<eoh>" shows up or the input ends.
//
pub fn adif_parse_str(label: &str, source: &str) ->
    Result<AdifFile, AdifError>
{
    let mut adif = AdifFile {
        adif_adif_version: None,
        adif_program_id: None,
        adif_program_version: None,
        adif_created_timestamp: None,
        adif_label: String::from(label),
        adif_records: Vec::new(),
    };

    let mut builder = AdifRecordBuilder::new();
    let mut pending : Option<Vec<AdiTag>> = Some(Vec::new());

    for tag in adi::adi_tags(source) {
        let tag = tag?;
        if tag == AdiTag::Eoh {
            if let Some(held) = pending.take() {
                adif_header_fields(&mut adif, &held);
                continue;
            }
        }

        match &mut pending {
            Some(held) => held.push(tag),
            None => builder.add(tag, &mut adif.adif_records)?,
        }
    }

    if let Some(held) = pending {
        for tag in held {
            builder.add(tag, &mut adif.adif_records)?;
        }
    }

    if !builder.adrb_record.is_empty() {
        warn!("{}: dropping incomplete record at end of input ({} fields)",
            label, builder.adrb_record.len());
    }

    debug!("{}: read {} records", label, adif.adif_records.len());
    Ok(adif)
}

pub fn adif_parse(label: &str, source: &mut dyn io::Read) ->
    Result<AdifFile, AdifError>
{
    let text = adi::adi_read_source(source)?;
    adif_parse_str(label, &text)
}

fn adif_header_fields(adif: &mut AdifFile, tags: &[AdiTag])
{
    for tag in tags {
        let adf = match tag {
            AdiTag::Field(adf) => adf,
            _ => continue,
        };

        let slot = match adf.adif_name_canon.as_str() {
            ADIF_HEADER_ADIF_VER => &mut adif.adif_adif_version,
            ADIF_HEADER_PROGRAMID => &mut adif.adif_program_id,
            ADIF_HEADER_PROGRAMVERSION => &mut adif.adif_program_version,
            ADIF_HEADER_CREATED_TIMESTAMP => &mut adif.adif_created_timestamp,
            _ => continue,
        };
        *slot = Some(adf.adif_value.clone());
    }
}

//
// AdifRecordBuilder accumulates body tags into records.
//
struct AdifRecordBuilder {
    adrb_record : AdifRecord,       // record being assembled
    adrb_which : usize,             // number of the record being assembled
}

impl AdifRecordBuilder {
    fn new() -> AdifRecordBuilder
    {
        AdifRecordBuilder {
            adrb_record: AdifRecord::new(),
            adrb_which: 1,
        }
    }

    fn add(&mut self, tag: AdiTag, records: &mut Vec<AdifRecord>) ->
        Result<(), AdifError>
    {
        match tag {
            AdiTag::Field(adf) => self.add_field(adf),
            AdiTag::Eor => {
                let record = std::mem::take(&mut self.adrb_record);
                if record.is_empty() {
                    warn!("skipping record with no fields");
                } else {
                    records.push(record);
                    self.adrb_which += 1;
                }
                Ok(())
            }
            AdiTag::Eoh => {
                warn!("ignoring end-of-header marker in record {}",
                    self.adrb_which);
                Ok(())
            }
        }
    }

    fn add_field(&mut self, adf: AdiDataSpecifier) -> Result<(), AdifError>
    {
        if self.adrb_record.contains(&adf.adif_name_canon) {
            return Err(AdifError::DuplicateField {
                record: self.adrb_which,
                field: adf.adif_name_canon,
            });
        }

        let value = if adf.adif_name_canon == ADIF_FIELD_CALL {
            adf.adif_value.to_uppercase()
        } else {
            adf.adif_value
        };

        self.adrb_record.insert(&adf.adif_name_canon, &value);
        Ok(())
    }
}

//
// ADIF export
//

//
// Write records as an ADI file: a header, then every field of every record,
// each tag on its own line.  Field names are written upper-case.  Lengths
// count characters, matching what the reader expects.  Every field present is
// written, including empty ones.
//
// If writing fails partway through, whatever was already written stays
// written.
//
pub fn adif_write_records<R: AdifRecordSource>(records: &[R],
    header: &AdifHeaderInfo, dest: &mut dyn io::Write) ->
    Result<(), AdifError>
{
    let created = header.adhi_created
        .unwrap_or_else(|| Utc::now().naive_utc());

    writeln!(dest, "Amateur radio log file. Generated on {}. Contains {} \
        QSO(s).", created.format("%Y-%m-%d %H:%M:%S"), records.len())?;

    let header_fields = [
        ("adif_ver", header.adhi_adif_version.clone()),
        ("programid", header.adhi_program_id.clone()),
        ("programversion", header.adhi_program_version.clone()),
        ("created_timestamp", created.format("%Y%m%d %H%M%S").to_string()),
    ];
    for (name, value) in &header_fields {
        let tag = AdiTag::Field(AdiDataSpecifier::new(name, value));
        writeln!(dest, "{}", tag)?;
    }
    writeln!(dest, "{}", AdiTag::Eoh)?;

    for (i, record) in records.iter().enumerate() {
        let mut seen = BTreeSet::new();
        for (name, value) in record.adif_fields() {
            let canon = name.to_ascii_uppercase();
            if !adif_writable_name(&canon) || !seen.insert(canon.clone()) {
                return Err(AdifError::BadFieldName {
                    record: i + 1,
                    field: name.to_string(),
                });
            }
            let tag = AdiTag::Field(AdiDataSpecifier::new(&canon, value));
            writeln!(dest, "{}", tag)?;
        }
        writeln!(dest, "{}", AdiTag::Eor)?;
    }

    debug!("wrote {} records", records.len());
    Ok(())
}

//
// A field name can be written only if the reader would get the same name back.
//
fn adif_writable_name(name: &str) -> bool
{
    !name.is_empty() && !name.chars().any(|c| {
        c == ':' || c == '<' || c == '>' || c.is_whitespace()
    })
}

//
// Write records to the named file, replacing it if it exists.  The file is
// flushed before returning so that a failed write is reported rather than
// lost when the file is closed.
//
pub fn adif_write_file<R: AdifRecordSource, P: AsRef<Path>>(path: P,
    records: &[R], header: &AdifHeaderInfo) ->
    Result<(), AdifError>
{
    let file = fs::File::create(path.as_ref())?;
    let mut out = io::BufWriter::new(file);
    adif_write_records(records, header, &mut out)?;
    out.flush()?;
    Ok(())
}
