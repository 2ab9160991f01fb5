//
// tests/read_write.rs: end-to-end reading and writing through the public
// interface.
//

use adif::{adif_read, adif_write, AdifError, AdifHeaderInfo, AdifRecord,
    AdifRecordSource};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn record(fields: &[(&str, &str)]) -> AdifRecord {
    fields.iter().copied().collect()
}

fn read_str(input: &str) -> Result<Vec<AdifRecord>, AdifError> {
    adif_read(&mut input.as_bytes())
}

fn write_vec<R: AdifRecordSource>(records: &[R]) -> Vec<u8> {
    let mut out = Vec::new();
    adif_write(records, &mut out, "adif-tests", "0.0.1")
        .expect("write to memory should succeed");
    out
}

#[test]
fn read_single_record() {
    let input = "Exported by a test.\n<adif_ver:5>3.0.4<eoh>\n\
        <call:4>TEST<qso_date:8>20130322<time_on:4>1955<band:3>40m\
        <mode:2>CW<eor>\n";
    let records = read_str(input).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].len(), 5);
    assert_eq!(records, vec![record(&[
        ("CALL", "TEST"),
        ("QSO_DATE", "20130322"),
        ("TIME_ON", "1955"),
        ("BAND", "40m"),
        ("MODE", "CW"),
    ])]);
}

#[test]
fn read_multiple_records() {
    let input = "<adif_ver:5>3.0.4\n<eoh>\n\
        <call:4>TEST<qso_date:8>20130322<time_on:4>1955<band:3>40m<mode:2>CW\
        <eor>\n\
        <call:8>TEST2ABC<qso_date:8>20150227<time_on:4>0820<band:3>20m\
        <mode:3>SSB<eor>\n\
        <call:5>HELLO<qso_date:8>20150227<time_on:4>0832<band:2>2m<mode:2>FM\
        <eor>\n";
    let records = read_str(input).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].get("CALL"), Some("TEST2ABC"));
    assert_eq!(records[2].get("BAND"), Some("2m"));
}

#[test]
fn read_whole_alphabet() {
    let call = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let input = format!("<eoh><call:{}>{}<eor>", call.len(),
        call.to_lowercase());
    let records = read_str(&input).unwrap();
    assert_eq!(records, vec![record(&[("CALL", call)])]);
}

#[test]
fn read_without_header() {
    let input = "<call:4>TEST<qso_date:8>20130322<time_on:4>1955\
        <band:3>40m<mode:2>CW<eor>\n<call:5>OTHER<eor>";
    let records = read_str(input).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("MODE"), Some("CW"));
    assert_eq!(records[1].get("CALL"), Some("OTHER"));
}

#[test]
fn read_header_only() {
    let records = read_str("<adif_ver:5>3.0.4\n<programid:4>TEST\n<eoh>\n")
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn read_failures() {
    assert!(matches!(read_str("<eoh><call:10>TEST<eor>"),
        Err(AdifError::Parse(_))));
    assert!(matches!(read_str("<eoh><call:4>TEST<eor"),
        Err(AdifError::Parse(_))));
    assert!(matches!(read_str("<eoh><call>TEST<eor>"),
        Err(AdifError::Parse(_))));
    assert!(matches!(adif_read(&mut &b"<call:2>\xc3\x28<eor>"[..]),
        Err(AdifError::Parse(_))));
}

#[test]
fn write_then_read_ignores_caller_casing() {
    let records = vec![
        vec![("call", "TEST123"), ("Qso_Date", "20120402"),
            ("time_on", "1234"), ("FREQ", "145.500"), ("band", "2m"),
            ("mode", "FM")],
        vec![("CALL", "TEST456"), ("qso_date", "20130312"),
            ("TIME_ON", "0101"), ("Notes", "worked <again> on 2m")],
    ];
    let out = write_vec(&records);
    let text = String::from_utf8(out.clone()).unwrap();
    assert!(text.contains("<QSO_DATE:8>20120402\n"));
    assert!(text.contains("<programid:10>adif-tests\n"));
    assert!(text.contains("<programversion:5>0.0.1\n"));
    assert!(text.contains("<adif_ver:5>3.0.4\n"));

    let read = adif_read(&mut out.as_slice()).unwrap();
    assert_eq!(read, vec![
        record(&records[0]),
        record(&records[1]),
    ]);
    assert_eq!(read[1].get("NOTES"), Some("worked <again> on 2m"));
}

//
// A record source shaped like a database row: column names come from the
// table, values are positional, and NULL columns are left out.
//
struct LogRow {
    columns: &'static [&'static str],
    values: Vec<Option<String>>,
}

impl AdifRecordSource for LogRow {
    fn adif_fields(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.columns.iter().zip(self.values.iter())
            .filter_map(|(c, v)| v.as_deref().map(|v| (*c, v))))
    }
}

#[test]
fn write_from_rows() {
    const COLUMNS : &[&str] = &["call", "qso_date", "time_on", "freq"];
    let rows = vec![
        LogRow {
            columns: COLUMNS,
            values: vec![Some("TEST123".into()), Some("20120402".into()),
                Some("1234".into()), None],
        },
        LogRow {
            columns: COLUMNS,
            values: vec![Some("TEST456".into()), Some("20130312".into()),
                Some("0101".into()), Some("145.750".into())],
        },
    ];
    let text = String::from_utf8(write_vec(&rows)).unwrap();
    assert!(text.contains("<eoh>\n<CALL:7>TEST123\n<QSO_DATE:8>20120402\n\
        <TIME_ON:4>1234\n<eor>\n<CALL:7>TEST456\n<QSO_DATE:8>20130312\n\
        <TIME_ON:4>0101\n<FREQ:7>145.750\n<eor>\n"));
}

#[test]
fn write_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.adi");
    let mut map = BTreeMap::new();
    map.insert("CALL", "K1ABC");
    map.insert("BAND", "20m");

    let header = AdifHeaderInfo::new("adif-tests", "0.0.1");
    adif::adif_write_file(&path, &[map], &header).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let read = adif_read(&mut file).unwrap();
    assert_eq!(read, vec![record(&[("BAND", "20m"), ("CALL", "K1ABC")])]);
}

#[test]
fn write_file_bad_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("log.adi");
    let header = AdifHeaderInfo::new("adif-tests", "0.0.1");
    let records : Vec<AdifRecord> = vec![];
    assert!(matches!(adif::adif_write_file(&path, &records, &header),
        Err(AdifError::Io(_))));
}

fn field_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,11}".prop_filter("CALL values are upper-cased on read",
        |n| n != "CALL")
}

fn records() -> impl Strategy<Value = Vec<BTreeMap<String, String>>> {
    prop::collection::vec(
        prop::collection::btree_map(field_name(), any::<String>(), 1..8),
        0..6)
}

proptest! {
    #[test]
    fn read_inverts_write(maps in records()) {
        let out = write_vec(&maps);
        let read = adif_read(&mut out.as_slice()).unwrap();
        let expected : Vec<AdifRecord> = maps.iter()
            .map(|m| m.iter().collect())
            .collect();
        prop_assert_eq!(read, expected);
    }
}
