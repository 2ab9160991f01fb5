//
// src/adi.rs: implementation of the ADI physical file format
//

//
// ADI format: physical elements
//
// An ADI file is a sequence of tags.  A data specifier looks like:
//
//     <FIELDNAME:LENGTH>VALUE
//     <FIELDNAME:LENGTH:TYPE>VALUE
//
// where LENGTH says exactly how many characters of VALUE follow the closing
// ">".  Two special tags carry no value: "<eoh>" ends the (optional) header and
// "<eor>" ends each record.  Anything between tags is ignored, which is how
// files manage to contain newlines between data specifiers and free text at
// the top of the header.
//
// The explicit length is load-bearing.  A value may contain "<" and ">" (free
// text notes often do), so the value must be consumed by counting characters,
// never by scanning ahead for the next "<".
//
// This level does not interpret anything.  It produces tags in the order they
// appear, and the higher-level reader in adif.rs decides what belongs to the
// header and which record each field belongs to.
//

use crate::adifutil::{char_len, tagname_equal_ci};
use log::trace;
use std::fmt;
use std::io;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

//
// Special strings
//
pub const ADI_STR_EOH : &str = "eoh";   // end-of-header marker
pub const ADI_STR_EOR : &str = "eor";   // end-of-record marker

//
// AdiParseError describes anything that can go wrong reading tags.  Offsets
// are character offsets into the input of the "<" that opened the tag.
//
#[derive(Debug, Error)]
pub enum AdiParseError {
    #[error("reading input: {0}")]
    Io(#[from] io::Error),

    #[error("input is not valid UTF-8 (at byte {valid_up_to})")]
    Encoding { valid_up_to: usize },

    #[error("offset {offset}: unterminated tag")]
    Unterminated { offset: usize },

    #[error("offset {offset}: tag has no name")]
    MissingName { offset: usize },

    #[error("offset {offset}: data specifier \"{name}\" has no length")]
    MissingLength { offset: usize, name: String },

    #[error("offset {offset}: data specifier \"{name}\": bad length \"{text}\"")]
    BadLength { offset: usize, name: String, text: String },

    #[error("offset {offset}: data specifier \"{name}\" declares {declared} \
        characters, but only {available} remain")]
    Truncated {
        offset: usize,
        name: String,
        declared: usize,
        available: usize,
    },
}

//
// AdiDataSpecifier: represents a data specifier in an ADI file.  These are
// sometimes called fields, and they're essentially key-value pairs.  The
// members of this structure represent exactly what appears in the file, plus
// the canonical (upper-case) name.  In particular, "adif_type" reflects only
// whether a type was given in the file.  The higher-level code can fill in a
// default type from the field table.
//
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdiDataSpecifier {
    pub adif_name : String,             // name of the field, as written
    pub adif_name_canon : String,       // canonicalized name (upper-case)
    pub adif_length : usize,            // length of the value, in characters
    pub adif_value : String,            // contents of the field's value
    pub adif_type : Option<String>,     // type specifier, if provided
}

impl AdiDataSpecifier {
    //
    // Construct a data specifier for writing.  The length is computed from the
    // value.
    //
    pub fn new(name: &str, value: &str) -> AdiDataSpecifier
    {
        AdiDataSpecifier {
            adif_name: name.to_string(),
            adif_name_canon: name.to_ascii_uppercase(),
            adif_length: char_len(value),
            adif_value: value.to_string(),
            adif_type: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdiTag {
    Field(AdiDataSpecifier),
    Eoh,
    Eor,
}

//
// Tags print in their physical form.  Field names are printed as they were
// given, so callers that want canonical names should construct the specifier
// with them.
//
impl fmt::Display for AdiTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdiTag::Eoh => write!(f, "<{}>", ADI_STR_EOH),
            AdiTag::Eor => write!(f, "<{}>", ADI_STR_EOR),
            AdiTag::Field(spec) => {
                write!(f, "<{}:{}", spec.adif_name, spec.adif_length)?;
                if let Some(t) = &spec.adif_type {
                    write!(f, ":{}", t)?;
                }
                write!(f, ">{}", spec.adif_value)
            }
        }
    }
}

//
// Read an entire input stream into memory.  ADI lengths count characters, so
// we need the input decoded before we can tokenize it.
//
pub fn adi_read_source(source: &mut dyn io::Read) ->
    Result<String, AdiParseError>
{
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| AdiParseError::Encoding {
        valid_up_to: e.utf8_error().valid_up_to()
    })
}

//
// AdiTagStream: iterates the tags in an ADI input.  The stream consumes its
// input once, front to back.  After the first error, it produces nothing
// more.
//
pub struct AdiTagStream<'a> {
    ats_source : &'a str,                       // complete input
    ats_chars : Peekable<CharIndices<'a>>,      // unconsumed input
    ats_offset : usize,                         // characters consumed so far
    ats_done : bool,                            // end of input or error
}

pub fn adi_tags(source: &str) -> AdiTagStream<'_>
{
    AdiTagStream {
        ats_source: source,
        ats_chars: source.char_indices().peekable(),
        ats_offset: 0,
        ats_done: false,
    }
}

impl<'a> AdiTagStream<'a> {
    fn next_char(&mut self) -> Option<char>
    {
        let (_, c) = self.ats_chars.next()?;
        self.ats_offset += 1;
        Some(c)
    }

    //
    // Byte position of the next unconsumed character.
    //
    fn position(&mut self) -> usize
    {
        match self.ats_chars.peek() {
            Some((i, _)) => *i,
            None => self.ats_source.len(),
        }
    }

    //
    // Consume text up to (and including) the first of the given terminators,
    // returning the text and the terminator.  Returns None on end of input.
    //
    fn read_until(&mut self, terminators: &[char]) -> Option<(&'a str, char)>
    {
        let start = self.position();
        loop {
            let end = self.position();
            let c = self.next_char()?;
            if terminators.contains(&c) {
                let source = self.ats_source;
                return Some((&source[start..end], c));
            }
        }
    }

    //
    // Consume exactly "count" characters of value.  On a short read, returns
    // the number of characters that were available.
    //
    fn read_value(&mut self, count: usize) -> Result<&'a str, usize>
    {
        let start = self.position();
        for i in 0..count {
            if self.next_char().is_none() {
                return Err(i);
            }
        }
        let end = self.position();
        let source = self.ats_source;
        Ok(&source[start..end])
    }

    fn read_tag(&mut self) -> Option<Result<AdiTag, AdiParseError>>
    {
        //
        // Skip anything between tags.
        //
        loop {
            match self.next_char() {
                None => return None,
                Some('<') => break,
                Some(_) => (),
            }
        }

        let offset = self.ats_offset - 1;
        let unterminated = AdiParseError::Unterminated { offset };

        let (name, term) = match self.read_until(&[':', '>']) {
            Some((n, t)) => (n.trim(), t),
            None => return Some(Err(unterminated)),
        };

        if name.is_empty() {
            return Some(Err(AdiParseError::MissingName { offset }));
        }

        if term == '>' {
            //
            // Only the end-of-header and end-of-record markers may appear
            // without a length.  Note that "<eoh:3>abc" is an ordinary data
            // specifier for a field called "eoh", which is dubious but
            // appears to be allowed.
            //
            if tagname_equal_ci(name, ADI_STR_EOH) {
                return Some(Ok(AdiTag::Eoh));
            }
            if tagname_equal_ci(name, ADI_STR_EOR) {
                return Some(Ok(AdiTag::Eor));
            }
            return Some(Err(AdiParseError::MissingLength {
                offset,
                name: name.to_string(),
            }));
        }

        let (length_str, term) = match self.read_until(&[':', '>']) {
            Some(r) => r,
            None => return Some(Err(unterminated)),
        };

        let datatype = if term == ':' {
            match self.read_until(&['>']) {
                Some((t, _)) => Some(t.trim().to_string()),
                None => return Some(Err(unterminated)),
            }
        } else {
            None
        };

        let length = match length_str.trim().parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                return Some(Err(AdiParseError::BadLength {
                    offset,
                    name: name.to_string(),
                    text: length_str.to_string(),
                }));
            }
        };

        let value = match self.read_value(length) {
            Ok(v) => v,
            Err(available) => {
                return Some(Err(AdiParseError::Truncated {
                    offset,
                    name: name.to_string(),
                    declared: length,
                    available,
                }));
            }
        };

        Some(Ok(AdiTag::Field(AdiDataSpecifier {
            adif_name: name.to_string(),
            adif_name_canon: name.to_ascii_uppercase(),
            adif_length: length,
            adif_value: value.to_string(),
            adif_type: datatype,
        })))
    }
}

impl<'a> Iterator for AdiTagStream<'a> {
    type Item = Result<AdiTag, AdiParseError>;

    fn next(&mut self) -> Option<Self::Item>
    {
        if self.ats_done {
            return None;
        }

        let result = self.read_tag();
        match &result {
            None | Some(Err(_)) => self.ats_done = true,
            Some(Ok(tag)) => trace!("tag: {:?}", tag),
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn field(name: &str, value: &str, dtype: Option<&str>) -> AdiTag {
        AdiTag::Field(AdiDataSpecifier {
            adif_name: name.to_string(),
            adif_name_canon: name.to_ascii_uppercase(),
            adif_length: value.chars().count(),
            adif_value: value.to_string(),
            adif_type: dtype.map(String::from),
        })
    }

    fn tags_ok(input: &str) -> Vec<AdiTag> {
        adi_tags(input).collect::<Result<Vec<_>, _>>()
            .expect("input should tokenize")
    }

    fn tags_err(input: &str) -> AdiParseError {
        let results : Vec<_> = adi_tags(input).collect();
        match results.last() {
            Some(Err(_)) => (),
            other => panic!("expected error at end, found {:?}", other),
        }
        results.into_iter().find_map(|r| r.err())
            .expect("error should be present")
    }

    #[test]
    fn basic() {
        let tags = tags_ok(r#"
            header stuff here<eoh>
            <call:6>KK6ZBI
            <bupkis:3>123
            <eor>
        "#);
        assert_eq!(tags, vec![
            AdiTag::Eoh,
            field("call", "KK6ZBI", None),
            field("bupkis", "123", None),
            AdiTag::Eor,
        ]);
    }

    #[test]
    fn canonical_names() {
        let tags = tags_ok("<QsO_dAtE:8>20130322<EoR>");
        match &tags[0] {
            AdiTag::Field(spec) => {
                assert_eq!(spec.adif_name, "QsO_dAtE");
                assert_eq!(spec.adif_name_canon, "QSO_DATE");
            }
            t => panic!("unexpected tag {:?}", t),
        }
        assert_eq!(tags[1], AdiTag::Eor);
    }

    #[test]
    fn explicit_type() {
        let tags = tags_ok("<qso_date:8:d>20130322<freq:5:N>7.025<eor>");
        assert_eq!(tags, vec![
            field("qso_date", "20130322", Some("d")),
            field("freq", "7.025", Some("N")),
            AdiTag::Eor,
        ]);
    }

    #[test]
    fn value_is_length_delimited() {
        //
        // The value contains what look like tags.  Only the declared length
        // counts, and anything after the value up to the next tag is junk.
        //
        let tags = tags_ok("<notes:11>x<eor>y<z:1><eor><call:4>TEST<eor>");
        assert_eq!(tags, vec![
            field("notes", "x<eor>y<z:1", None),
            AdiTag::Eor,
            field("call", "TEST", None),
            AdiTag::Eor,
        ]);

        let tags = tags_ok("<junk:3>123456<eor>");
        assert_eq!(tags, vec![field("junk", "123", None), AdiTag::Eor]);
    }

    #[test]
    fn length_counts_characters() {
        let tags = tags_ok("<name:6>Jürgen<qth:4>Köln<eor>");
        assert_eq!(tags, vec![
            field("name", "Jürgen", None),
            field("qth", "Köln", None),
            AdiTag::Eor,
        ]);
    }

    #[test]
    fn zero_length() {
        let tags = tags_ok("<notes:0><call:4>TEST<eor>");
        assert_eq!(tags, vec![
            field("notes", "", None),
            field("call", "TEST", None),
            AdiTag::Eor,
        ]);
    }

    #[test]
    fn eoh_with_length_is_a_field() {
        let tags = tags_ok("<eoh:3>789<eoh>");
        assert_eq!(tags, vec![field("eoh", "789", None), AdiTag::Eoh]);
    }

    #[test]
    fn empty_input() {
        assert!(tags_ok("").is_empty());
        assert!(tags_ok("just some text, no tags").is_empty());
    }

    #[test]
    fn truncated() {
        match tags_err("<call:4>TEST<notes:10>short") {
            AdiParseError::Truncated { offset, name, declared, available } => {
                assert_eq!(offset, 12);
                assert_eq!(name, "notes");
                assert_eq!(declared, 10);
                assert_eq!(available, 5);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn unterminated() {
        assert!(matches!(tags_err("<call:4>TEST<eo"),
            AdiParseError::Unterminated { offset: 12 }));
        assert!(matches!(tags_err("<call:4"),
            AdiParseError::Unterminated { offset: 0 }));
        assert!(matches!(tags_err("<call:4:S"),
            AdiParseError::Unterminated { offset: 0 }));
    }

    #[test]
    fn missing_or_bad_length() {
        assert!(matches!(tags_err("<foobar>"),
            AdiParseError::MissingLength { .. }));
        match tags_err("<call:four>TEST") {
            AdiParseError::BadLength { name, text, .. } => {
                assert_eq!(name, "call");
                assert_eq!(text, "four");
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(matches!(tags_err("<call:-1>TEST"),
            AdiParseError::BadLength { .. }));
    }

    #[test]
    fn names_are_trimmed() {
        let tags = tags_ok("< call :4>test< eor >");
        assert_eq!(tags, vec![field("call", "test", None), AdiTag::Eor]);
        match &tags[0] {
            AdiTag::Field(spec) => assert_eq!(spec.adif_name_canon, "CALL"),
            t => panic!("unexpected tag {:?}", t),
        }

        assert!(matches!(tags_err("<call:4>TEST< :4>junk"),
            AdiParseError::MissingName { offset: 12 }));
        assert!(matches!(tags_err("<>"),
            AdiParseError::MissingName { offset: 0 }));
    }

    #[test]
    fn stops_after_error() {
        let mut tags = adi_tags("<foobar><call:4>TEST<eor>");
        assert!(matches!(tags.next(), Some(Err(_))));
        assert!(tags.next().is_none());
    }

    #[test]
    fn display() {
        assert_eq!(AdiTag::Eoh.to_string(), "<eoh>");
        assert_eq!(AdiTag::Eor.to_string(), "<eor>");
        assert_eq!(field("CALL", "TEST123", None).to_string(),
            "<CALL:7>TEST123");
        assert_eq!(field("QSO_DATE", "20130322", Some("D")).to_string(),
            "<QSO_DATE:8:D>20130322");
        let spec = AdiDataSpecifier::new("name", "Jürgen");
        assert_eq!(spec.adif_length, 6);
        assert_eq!(spec.adif_name_canon, "NAME");
    }

    #[test]
    fn read_source() {
        let mut good : &[u8] = "<call:4>TEST<eor>".as_bytes();
        assert_eq!(adi_read_source(&mut good).unwrap(), "<call:4>TEST<eor>");

        let mut bad : &[u8] = b"<call:4>TE\xffT<eor>";
        assert!(matches!(adi_read_source(&mut bad),
            Err(AdiParseError::Encoding { valid_up_to: 10 })));
    }
}
