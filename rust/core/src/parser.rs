// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT Parser using nom
//!
//! Zero-copy tokenization of Well-Known Text into a section tree. Every
//! section and parameter keeps the slice of input it was parsed from, so a
//! nested definition can be handed on verbatim.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{consumed, map},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::keyword::WktKeyword;

/// Value held by a WKT section parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue<'a> {
    /// Nested section: UNIT["meter", 1]
    Section(Box<WktSection<'a>>),
    /// Quoted string, quotes stripped: "meter"
    Quoted(&'a str),
    /// Bare token: 1.5, OTHER
    Bare(&'a str),
}

/// One comma-separated parameter of a section
#[derive(Debug, Clone, PartialEq)]
pub struct WktParameter<'a> {
    raw: &'a str,
    value: ParameterValue<'a>,
}

impl<'a> WktParameter<'a> {
    /// Parameter value
    #[inline]
    pub fn value(&self) -> &ParameterValue<'a> {
        &self.value
    }

    #[inline]
    pub fn is_section(&self) -> bool {
        matches!(self.value, ParameterValue::Section(_))
    }

    /// Get as nested section
    #[inline]
    pub fn as_section(&self) -> Option<&WktSection<'a>> {
        match &self.value {
            ParameterValue::Section(section) => Some(section),
            _ => None,
        }
    }

    #[inline]
    pub fn is_quoted(&self) -> bool {
        matches!(self.value, ParameterValue::Quoted(_))
    }

    /// Get the text between the quotes
    #[inline]
    pub fn as_quoted(&self) -> Option<&'a str> {
        match self.value {
            ParameterValue::Quoted(text) => Some(text),
            _ => None,
        }
    }

    /// Get as bare token
    #[inline]
    pub fn as_bare(&self) -> Option<&'a str> {
        match self.value {
            ParameterValue::Bare(text) => Some(text),
            _ => None,
        }
    }

    /// Source text of the parameter, whitespace-trimmed, quotes included
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Source text with surrounding quotes removed
    #[inline]
    pub fn unquoted(&self) -> &'a str {
        match self.value {
            ParameterValue::Quoted(text) | ParameterValue::Bare(text) => text,
            ParameterValue::Section(_) => self.raw,
        }
    }

    /// Length of the raw source text in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Keyword followed by a bracketed parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct WktSection<'a> {
    name: &'a str,
    keyword: WktKeyword,
    parameters: SmallVec<[WktParameter<'a>; 4]>,
    raw: &'a str,
}

impl<'a> WktSection<'a> {
    /// Keyword text as written in the source
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub fn keyword(&self) -> WktKeyword {
        self.keyword
    }

    #[inline]
    pub fn parameters(&self) -> &[WktParameter<'a>] {
        &self.parameters
    }

    /// Number of parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&WktParameter<'a>> {
        self.parameters.get(index)
    }

    #[inline]
    pub fn last(&self) -> Option<&WktParameter<'a>> {
        self.parameters.last()
    }

    /// Source text of the whole section
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Nested sections with the given keyword, in order
    pub fn children(&self, keyword: WktKeyword) -> impl Iterator<Item = &WktSection<'a>> + '_ {
        self.parameters
            .iter()
            .filter_map(|p| p.as_section())
            .filter(move |s| s.keyword == keyword)
    }

    /// First nested section with the given keyword
    pub fn child(&self, keyword: WktKeyword) -> Option<&WktSection<'a>> {
        self.children(keyword).next()
    }
}

impl fmt::Display for WktParameter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ParameterValue::Section(section) => section.fmt(f),
            ParameterValue::Quoted(text) => write!(f, "\"{}\"", text),
            ParameterValue::Bare(text) => f.write_str(text),
        }
    }
}

/// Compact canonical form: whitespace removed, square brackets
impl fmt::Display for WktSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            parameter.fmt(f)?;
        }
        f.write_str("]")
    }
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

/// Keyword: LOCAL_CS, PARAM_MT
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Parse quoted string: "text"
/// WKT uses "" to escape a double quote within a string
fn quoted(input: &str) -> IResult<&str, &str> {
    fn quoted_content(input: &str) -> IResult<&str, &str> {
        let bytes = input.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'"' {
                if i + 1 < bytes.len() && bytes[i + 1] == b'"' {
                    i += 2;
                    continue;
                }
                return Ok((&input[i..], &input[..i]));
            }
            i += 1;
        }

        // No closing quote found
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    delimited(char('"'), quoted_content, char('"'))(input)
}

/// Bare token: numbers, enumerants such as OTHER or UP
fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '(' | ')' | '"')
    })(input)
}

/// Parse a parameter with optional surrounding whitespace
fn parameter(input: &str) -> IResult<&str, WktParameter> {
    map(
        delimited(
            ws,
            consumed(alt((
                map(section, |s| ParameterValue::Section(Box::new(s))),
                map(quoted, ParameterValue::Quoted),
                map(bare, ParameterValue::Bare),
            ))),
            ws,
        ),
        |(raw, value)| WktParameter { raw, value },
    )(input)
}

fn parameter_list(input: &str) -> IResult<&str, Vec<WktParameter>> {
    separated_list0(char(','), parameter)(input)
}

/// Parse section: KEYWORD[param, ...] or KEYWORD(param, ...)
fn section(input: &str) -> IResult<&str, WktSection> {
    map(
        consumed(pair(
            terminated(identifier, ws),
            alt((
                delimited(char('['), parameter_list, preceded(ws, char(']'))),
                delimited(char('('), parameter_list, preceded(ws, char(')'))),
            )),
        )),
        |(raw, (name, parameters))| WktSection {
            name,
            keyword: WktKeyword::from_name(name),
            parameters: parameters.into_iter().collect(),
            raw,
        },
    )(input)
}

/// Deepest bracket nesting accepted before parsing
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum bracket nesting outside quoted strings
fn nesting_depth(input: &str) -> (usize, usize) {
    let mut depth = 0usize;
    let mut deepest = (0, 0);
    let mut in_quotes = false;

    for (offset, b) in input.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'[' | b'(' if !in_quotes => {
                depth += 1;
                if depth > deepest.0 {
                    deepest = (depth, offset);
                }
            }
            b']' | b')' if !in_quotes => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Parse a complete WKT definition
/// Example: UNIT["meter", 1]
pub fn parse_wkt(input: &str) -> Result<WktSection<'_>> {
    let (depth, offset) = nesting_depth(input);
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::parse(
            offset,
            format!("Nesting deeper than {} sections", MAX_NESTING_DEPTH),
        ));
    }

    match preceded(ws, section)(input) {
        Ok((rest, section)) => {
            let trailing = rest.trim_start();
            if trailing.is_empty() {
                Ok(section)
            } else {
                Err(Error::TrailingInput(input.len() - trailing.len()))
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::parse(
            input.len() - e.input.len(),
            format!("Failed to parse section: {:?}", e.code),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(Error::parse(input.len(), "Unexpected end of input"))
        }
    }
}

/// Parsed WKT text; blank text yields an empty root
#[derive(Debug, Clone, PartialEq)]
pub struct WktRoot<'a> {
    text: &'a str,
    section: Option<WktSection<'a>>,
}

impl<'a> WktRoot<'a> {
    /// Parse text into a section tree
    pub fn parse(text: &'a str) -> Result<Self> {
        let section = if text.trim().is_empty() {
            None
        } else {
            Some(parse_wkt(text)?)
        };
        Ok(Self { text, section })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.section.is_none()
    }

    #[inline]
    pub fn section(&self) -> Option<&WktSection<'a>> {
        self.section.as_ref()
    }

    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }
}

/// Locate the first keyword token of a WKT text
/// Returns (byte offset, keyword text); `None` when the text is blank or
/// does not start with an identifier
pub fn find_section_keyword(text: &str) -> Option<(usize, &str)> {
    let start = text.find(|c: char| !c.is_whitespace())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());

    if end == 0 {
        None
    } else {
        Some((start, &rest[..end]))
    }
}

/// Classify the first keyword token of a WKT text
#[inline]
pub fn wkt_keyword(text: &str) -> WktKeyword {
    find_section_keyword(text)
        .map(|(_, name)| WktKeyword::from_name(name))
        .unwrap_or(WktKeyword::Unknown)
}
