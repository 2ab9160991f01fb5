//
// src/enums.rs: ADIF enumerations (modes, submodes, bands, propagation modes)
//
// These tables follow the enumerations of ADIF 3.0.4.  Each mode lists the
// submodes that are valid with it.  The empty string is a member of every
// mode's submode list ("no submode"), and the empty mode is itself listed so
// that a record that doesn't specify a mode still validates.
//
// Older versions of the standard listed several of today's submodes (e.g.,
// "PSK31") as modes in their own right.  Those are kept in a separate table of
// deprecated modes.  Lookups see the union of both tables so that older files
// still validate, but adif_modes() only offers current modes, since nothing we
// write should use a deprecated value.
//

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const MODES : &[(&str, &[&str])] = &[
    ("", &[""]),
    ("AM", &[""]),
    ("ATV", &[""]),
    ("CHIP", &["", "CHIP64", "CHIP128"]),
    ("CLO", &[""]),
    ("CONTESTI", &[""]),
    ("CW", &["", "PCW"]),
    ("DIGITALVOICE", &[""]),
    ("DOMINO", &["", "DOMINOEX", "DOMINOF"]),
    ("DSTAR", &[""]),
    ("FAX", &[""]),
    ("FM", &[""]),
    ("FSK441", &[""]),
    ("FT8", &[""]),
    ("HELL", &["", "FMHELL", "FSKHELL", "HELL80", "HFSK", "PSKHELL"]),
    ("ISCAT", &["", "ISCAT-A", "ISCAT-B"]),
    ("JT4", &["", "JT4A", "JT4B", "JT4C", "JT4D", "JT4E", "JT4F", "JT4G"]),
    ("JT6M", &[""]),
    ("JT9", &[""]),
    ("JT44", &[""]),
    ("JT65", &["", "JT65A", "JT65B", "JT65B2", "JT65C", "JT65C2"]),
    ("MFSK", &["", "MFSK4", "MFSK8", "MFSK11", "MFSK16", "MFSK22", "MFSK31",
        "MFSK32", "MFSK64", "MFSK128"]),
    ("MT63", &[""]),
    ("OLIVIA", &["", "OLIVIA 4/125", "OLIVIA 4/250", "OLIVIA 8/250",
        "OLIVIA 8/500", "OLIVIA 16/500", "OLIVIA 16/1000", "OLIVIA 32/1000"]),
    ("OPERA", &["", "OPERA-BEACON", "OPERA-QSO"]),
    ("PAC", &["", "PAC2", "PAC3", "PAC4"]),
    ("PAX", &["", "PAX2"]),
    ("PKT", &[""]),
    ("PSK", &["", "FSK31", "PSK10", "PSK31", "PSK63", "PSK63F", "PSK125",
        "PSK250", "PSK500", "PSK1000", "PSKAM10", "PSKAM31", "PSKAM50",
        "PSKFEC31", "QPSK31", "QPSK63", "QPSK125", "QPSK250", "QPSK500"]),
    ("PSK2K", &[""]),
    ("Q15", &[""]),
    ("ROS", &["", "ROS-EME", "ROS-HF", "ROS-MF"]),
    ("RTTY", &["", "ASCI"]),
    ("RTTYM", &[""]),
    ("SSB", &["", "LSB", "USB"]),
    ("SSTV", &[""]),
    ("THOR", &[""]),
    ("THRB", &["", "THRBX"]),
    ("TOR", &["", "AMTORFEC", "GTOR"]),
    ("V4", &[""]),
    ("VOI", &[""]),
    ("WINMOR", &[""]),
    ("WSPR", &[""]),
];

// Modes from earlier versions of ADIF, accepted on import only.
const MODES_DEPRECATED : &[&str] = &[
    "AMTORFEC", "ASCI", "CHIP64", "CHIP128", "DOMINOF", "FMHELL", "FSK31",
    "GTOR", "HELL80", "HFSK", "JT4A", "JT4B", "JT4C", "JT4D", "JT4E", "JT4F",
    "JT4G", "JT65A", "JT65B", "JT65C", "MFSK8", "MFSK16", "PAC2", "PAC3",
    "PAX2", "PCW", "PSK10", "PSK31", "PSK63", "PSK63F", "PSK125", "PSKAM10",
    "PSKAM31", "PSKAM50", "PSKFEC31", "PSKHELL", "QPSK31", "QPSK63", "QPSK125",
    "THRBX",
];

//
// Band labels and their lower and upper frequency bounds in MHz.  The first
// entry is the empty ("unknown") band, which has no bounds.
//
const BANDS : &[(&str, Option<(f64, f64)>)] = &[
    ("", None),
    ("2190m", Some((0.136, 0.137))),
    ("630m", Some((0.472, 0.479))),
    ("560m", Some((0.501, 0.504))),
    ("160m", Some((1.8, 2.0))),
    ("80m", Some((3.5, 4.0))),
    ("60m", Some((5.102, 5.4065))),
    ("40m", Some((7.0, 7.3))),
    ("30m", Some((10.0, 10.15))),
    ("20m", Some((14.0, 14.35))),
    ("17m", Some((18.068, 18.168))),
    ("15m", Some((21.0, 21.45))),
    ("12m", Some((24.890, 24.99))),
    ("10m", Some((28.0, 29.7))),
    ("6m", Some((50.0, 54.0))),
    ("4m", Some((70.0, 71.0))),
    ("2m", Some((144.0, 148.0))),
    ("1.25m", Some((222.0, 225.0))),
    ("70cm", Some((420.0, 450.0))),
    ("33cm", Some((902.0, 928.0))),
    ("23cm", Some((1240.0, 1300.0))),
    ("13cm", Some((2300.0, 2450.0))),
    ("9cm", Some((3300.0, 3500.0))),
    ("6cm", Some((5650.0, 5925.0))),
    ("3cm", Some((10000.0, 10500.0))),
    ("1.25cm", Some((24000.0, 24250.0))),
    ("6mm", Some((47000.0, 47200.0))),
    ("4mm", Some((75500.0, 81000.0))),
    ("2.5mm", Some((119980.0, 120020.0))),
    ("2mm", Some((142000.0, 149000.0))),
    ("1mm", Some((241000.0, 250000.0))),
];

const PROPAGATION_MODES : &[&str] = &[
    "", "AS", "AUE", "AUR", "BS", "ECH", "EME", "ES", "F2", "FAI", "INTERNET",
    "ION", "IRL", "MS", "RPT", "RS", "SAT", "TEP", "TR",
];

//
// Merged view of current and deprecated modes, built on first use and never
// modified afterwards.
//
static MODE_TABLE : LazyLock<BTreeMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        let mut table : BTreeMap<&'static str, &'static [&'static str]> =
            MODES.iter().copied().collect();
        for mode in MODES_DEPRECATED {
            table.entry(*mode).or_insert(&[""]);
        }
        table
    });

// Every submode of every mode in MODE_TABLE.
static ALL_SUBMODES : LazyLock<BTreeSet<&'static str>> =
    LazyLock::new(|| {
        MODE_TABLE.values().flat_map(|s| s.iter().copied()).collect()
    });

pub fn is_member_of_mode(mode: &str) -> bool
{
    MODE_TABLE.contains_key(mode)
}

//
// Returns true if "submode" is valid for the given "mode".  An unknown mode
// has no valid submodes.
//
pub fn is_member_of_submode(mode: &str, submode: &str) -> bool
{
    match MODE_TABLE.get(mode) {
        Some(submodes) => submodes.contains(&submode),
        None => false,
    }
}

//
// Returns true if "submode" is a submode of any mode at all.  This is the
// check used when a SUBMODE is validated without reference to its record's
// MODE.
//
pub fn is_member_of_any_submode(submode: &str) -> bool
{
    ALL_SUBMODES.contains(submode)
}

pub fn is_deprecated_mode(mode: &str) -> bool
{
    MODES_DEPRECATED.contains(&mode)
}

//
// Returns the current (non-deprecated) modes with their submodes, in the
// order of the standard.  This is what an application should offer when
// creating new records.
//
pub fn adif_modes() -> impl Iterator<Item = (&'static str, &'static [&'static str])>
{
    MODES.iter().copied()
}

pub fn is_member_of_band(band: &str) -> bool
{
    BANDS.iter().any(|(label, _)| *label == band)
}

pub fn adif_bands() -> impl Iterator<Item = &'static str>
{
    BANDS.iter().map(|(label, _)| *label)
}

//
// Returns the (lower, upper) frequency bounds in MHz of the given band, or
// None for the empty band and for anything that isn't a band.
//
pub fn band_range(band: &str) -> Option<(f64, f64)>
{
    BANDS.iter().find(|(label, _)| *label == band).and_then(|(_, r)| *r)
}

pub fn is_member_of_propagation_mode(prop_mode: &str) -> bool
{
    PROPAGATION_MODES.contains(&prop_mode)
}
