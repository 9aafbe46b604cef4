use std::collections::HashMap;

use once_cell::sync::Lazy;

/// substitution table the aggregator uses to hide provider locators, every character of the
/// plaintext is swapped for a two digit hex code. It doesn't follow any real encoding so it's just
/// copied as is, don't try to be clever with it
#[rustfmt::skip]
pub const LOCATOR_TABLE: [(&str, char); 84] = [
    ("79", 'A'), ("7a", 'B'), ("7b", 'C'), ("7c", 'D'), ("7d", 'E'), ("7e", 'F'), ("7f", 'G'),
    ("70", 'H'), ("71", 'I'), ("72", 'J'), ("73", 'K'), ("74", 'L'), ("75", 'M'), ("76", 'N'),
    ("77", 'O'), ("68", 'P'), ("69", 'Q'), ("6a", 'R'), ("6b", 'S'), ("6c", 'T'), ("6d", 'U'),
    ("6e", 'V'), ("6f", 'W'), ("60", 'X'), ("61", 'Y'), ("62", 'Z'),
    ("59", 'a'), ("5a", 'b'), ("5b", 'c'), ("5c", 'd'), ("5d", 'e'), ("5e", 'f'), ("5f", 'g'),
    ("50", 'h'), ("51", 'i'), ("52", 'j'), ("53", 'k'), ("54", 'l'), ("55", 'm'), ("56", 'n'),
    ("57", 'o'), ("48", 'p'), ("49", 'q'), ("4a", 'r'), ("4b", 's'), ("4c", 't'), ("4d", 'u'),
    ("4e", 'v'), ("4f", 'w'), ("40", 'x'), ("41", 'y'), ("42", 'z'),
    ("08", '0'), ("09", '1'), ("0a", '2'), ("0b", '3'), ("0c", '4'), ("0d", '5'), ("0e", '6'),
    ("0f", '7'), ("00", '8'), ("01", '9'),
    ("15", '-'), ("16", '.'), ("67", '_'), ("46", '~'), ("02", ':'), ("17", '/'), ("07", '?'),
    ("1b", '#'), ("63", '['), ("65", ']'), ("78", '@'), ("19", '!'), ("1c", '$'), ("1e", '&'),
    ("10", '('), ("11", ')'), ("12", '*'), ("13", '+'), ("14", ','), ("03", ';'), ("05", '='),
    ("1d", '%'),
];

static LOCATOR_LOOKUP: Lazy<HashMap<&'static str, char>> =
    Lazy::new(|| LOCATOR_TABLE.iter().copied().collect());

/// metadata locators point at `/clock` but the json lives at `/clock.json`
const CLOCK_SUFFIX: &str = "/clock";

pub struct LocatorDecoder;

impl LocatorDecoder {
    /// decode an obfuscated locator, never fails
    ///
    /// chunks that aren't in the table (uppercase hex, stray characters, a dangling odd char) are
    /// copied through untouched, the live service relies on this so it has to stay permissive
    pub fn decode(raw: &str) -> String {
        let chars: Vec<char> = raw.chars().collect();
        let mut decoded = String::with_capacity(chars.len() / 2);

        for chunk in chars.chunks(2) {
            let code: String = chunk.iter().collect();
            match LOCATOR_LOOKUP.get(code.as_str()) {
                Some(c) => decoded.push(*c),
                None => decoded.push_str(&code),
            }
        }

        Self::rewrite_clock(decoded)
    }

    /// `/apivtwo/clock?id=..` -> `/apivtwo/clock.json?id=..`, only when the path itself ends in
    /// /clock, the query is left alone
    fn rewrite_clock(locator: String) -> String {
        let path_end = locator.find(['?', '#']).unwrap_or(locator.len());
        let (path, rest) = locator.split_at(path_end);

        if path.ends_with(CLOCK_SUFFIX) {
            format!("{}.json{}", path, rest)
        } else {
            locator
        }
    }

    /// absolute locators are used directly, anything else hangs off the aggregator host
    pub fn to_url(decoded: &str, base_host: &str) -> String {
        if decoded.starts_with("http") {
            decoded.to_string()
        } else {
            format!("https://{}{}", base_host, decoded)
        }
    }
}
