//! Documents: one source file and the regions found in it
//!
//! A [`Document`] owns the full text of a file and the regions parsers found in it.
//! Regions may be added in any order and by any number of parsers; the document keeps
//! them sorted by start offset and refuses anything that would break its invariants:
//!
//! - every region lies within the text, starts before it ends, and both offsets fall
//!   on character boundaries ([`PositionError`]);
//! - no two regions share a byte of text ([`OverlapError`]). Touching regions
//!   (`a.end == b.start`) are fine.
//!
//! Iterating a document yields one [`Example`] per region, in document order. The
//! iteration borrows the document and can be repeated as often as needed.

use crate::error::{DocumentError, LoaderError, OverlapError, PositionError, RegionSpan};
use crate::example::Example;
use crate::location::{Position, SourceLocation};
use crate::region::Region;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::slice;
use tracing::trace;

pub mod sources;

pub use sources::{RegionSource, RegionSources};

pub struct Document {
    path: PathBuf,
    text: String,
    location: SourceLocation,
    regions: Vec<Region>,
}

impl Document {
    pub fn new(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let text = text.into();
        let location = SourceLocation::new(&text);
        Self {
            path: path.into(),
            text,
            location,
            regions: Vec::new(),
        }
    }

    /// Read a UTF-8 file into a document with no regions
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoaderError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text, path))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Regions in document order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Insert a region, keeping regions sorted and non-overlapping.
    ///
    /// The region is checked against every region whose span could intersect it, not
    /// just its neighbours, so a rejected insert leaves the document untouched. Non-empty
    /// regions are disjoint and sorted, so their ends rise with their starts and the
    /// backwards scan stops at the first one ending at or before the new start.
    pub fn add(&mut self, region: Region) -> Result<(), DocumentError> {
        self.check_position(&region)?;

        let candidates = self
            .regions
            .partition_point(|existing| existing.start() < region.end());
        if let Some(existing) = self.regions[..candidates]
            .iter()
            .rev()
            .take_while(|existing| {
                existing.start() == existing.end() || existing.end() > region.start()
            })
            .find(|existing| existing.overlaps(&region))
        {
            let (first, second) = if existing.start() <= region.start() {
                (existing, &region)
            } else {
                (&region, existing)
            };
            return Err(OverlapError {
                first: first.into(),
                second: second.into(),
            }
            .into());
        }

        let index = self.regions.partition_point(|existing| {
            (existing.start(), existing.end()) <= (region.start(), region.end())
        });
        trace!(
            path = %self.path.display(),
            start = region.start(),
            end = region.end(),
            evaluator = region.evaluator().name(),
            "added region"
        );
        self.regions.insert(index, region);
        Ok(())
    }

    fn check_position(&self, region: &Region) -> Result<(), PositionError> {
        if region.end() < region.start() {
            return Err(PositionError::Inverted {
                region: region.into(),
            });
        }
        if region.end() > self.text.len() {
            return Err(PositionError::BeyondEnd {
                region: region.into(),
                len: self.text.len(),
            });
        }
        for offset in [region.start(), region.end()] {
            if !self.text.is_char_boundary(offset) {
                return Err(PositionError::NotCharBoundary {
                    region: RegionSpan::from(region),
                    offset,
                });
            }
        }
        Ok(())
    }

    /// One example per region, in document order
    pub fn examples(&self) -> Examples<'_> {
        Examples {
            document: self,
            regions: self.regions.iter(),
        }
    }

    /// 1-based line and column of a byte offset
    pub fn line_column(&self, offset: usize) -> Position {
        self.location.position(offset)
    }

    /// Pair every match of `start` with the nearest following match of `end`.
    ///
    /// See [`sources`] for the pairing rules.
    pub fn find_region_sources<'a>(&'a self, start: &'a Regex, end: &'a Regex) -> RegionSources<'a> {
        RegionSources::new(&self.text, start, end)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("len", &self.text.len())
            .field("regions", &self.regions)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = Example<'a>;
    type IntoIter = Examples<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples()
    }
}

/// Iterator over the examples of a document
#[derive(Debug, Clone)]
pub struct Examples<'a> {
    document: &'a Document,
    regions: slice::Iter<'a, Region>,
}

impl<'a> Iterator for Examples<'a> {
    type Item = Example<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.regions
            .next()
            .map(|region| Example::new(self.document, region))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.regions.size_hint()
    }
}

impl ExactSizeIterator for Examples<'_> {}
