//! Start/end marker scanning
//!
//! Many markups delimit a block with an opening marker and a closing marker. Parsers
//! for them can hand both patterns to [`Document::find_region_sources`] and get back
//! every `(start, end)` pair, leaving them to decide what the block means.
//!
//! Pairs never overlap: once a pair is found, scanning for the next start resumes after
//! its end. A start with no end after it ends the scan quietly; it is not a block and
//! not an error.
//!
//! [`Document::find_region_sources`]: crate::Document::find_region_sources

use regex::{Captures, Match, Regex};
use std::ops::Range;

/// Lazy iterator over the marker pairs of a text
#[derive(Debug)]
pub struct RegionSources<'a> {
    text: &'a str,
    start: &'a Regex,
    end: &'a Regex,
    position: Option<usize>,
}

impl<'a> RegionSources<'a> {
    pub fn new(text: &'a str, start: &'a Regex, end: &'a Regex) -> Self {
        Self {
            text,
            start,
            end,
            position: Some(0),
        }
    }
}

impl<'a> Iterator for RegionSources<'a> {
    type Item = RegionSource<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position.filter(|position| *position <= self.text.len())?;
        let Some(captures) = self.start.captures_at(self.text, position) else {
            self.position = None;
            return None;
        };
        let opening = captures.get(0)?;
        let Some(end) = self.end.find_at(self.text, opening.end()) else {
            self.position = None;
            return None;
        };

        self.position = Some(self.resume_after(opening.start(), end.end().max(opening.end())));

        Some(RegionSource {
            text: self.text,
            opening,
            captures,
            end,
        })
    }
}

impl RegionSources<'_> {
    /// Where to look for the next start, always making progress past `previous`
    fn resume_after(&self, previous: usize, next: usize) -> usize {
        if next > previous {
            return next;
        }
        let step = self.text[previous..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        previous + step
    }
}

/// One opening marker and the closing marker that ends it
#[derive(Debug)]
pub struct RegionSource<'a> {
    text: &'a str,
    opening: Match<'a>,
    captures: Captures<'a>,
    end: Match<'a>,
}

impl<'a> RegionSource<'a> {
    /// The whole opening match
    pub fn start(&self) -> Match<'a> {
        self.opening
    }

    /// Named and numbered groups of the opening match
    pub fn captures(&self) -> &Captures<'a> {
        &self.captures
    }

    /// The closing match
    pub fn end(&self) -> Match<'a> {
        self.end
    }

    /// From the start of the opening marker to the end of the closing one
    pub fn span(&self) -> Range<usize> {
        self.opening.start()..self.end.end()
    }

    /// Between the markers
    pub fn body_span(&self) -> Range<usize> {
        self.opening.end()..self.end.start()
    }

    pub fn body(&self) -> &'a str {
        &self.text[self.body_span()]
    }
}
