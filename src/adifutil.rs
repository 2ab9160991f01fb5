//
// src/adifutil.rs: utility functions for processing ADIF files
//

//
// Given a tag name read from the file and a well-known name "s", returns true
// if the two represent the same ASCII string when compared case-insensitively.
// ADI tag names are case-insensitive ("<EOR>", "<eor>", and "<Eor>" are all
// the same marker), but values are not, so this is only used on names.
//
pub fn tagname_equal_ci(name: &str, s: &str) -> bool
{
    name.len() == s.len() && name.eq_ignore_ascii_case(s)
}

//
// Interprets "text" as a fixed-width unsigned decimal number of exactly
// "width" ASCII digits.  Returns None if the text is the wrong length or
// contains anything other than digits (including signs and whitespace, which
// str::parse() would otherwise tolerate or reject inconsistently).
//
pub fn fixed_digits(text: &str, width: usize) -> Option<u32>
{
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    text.parse::<u32>().ok()
}

//
// Returns the length of "s" in characters.  ADI lengths written by this crate
// count characters rather than bytes so that a value containing multi-byte
// UTF-8 sequences reads back as exactly the value that was written.
//
pub fn char_len(s: &str) -> usize
{
    s.chars().count()
}
