//! Regions: the unit of extraction
//!
//! A region is a half-open byte span `[start, end)` of a document's text, together with
//! the payload a parser extracted from it and the evaluator that will check that
//! payload. Regions are immutable once built and are cheap to clone: payload and
//! evaluator are reference counted.

use crate::evaluator::Evaluator;
use std::any::Any;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

#[derive(Clone)]
pub struct Region {
    start: usize,
    end: usize,
    parsed: Rc<dyn Any>,
    evaluator: Rc<dyn Evaluator>,
}

impl Region {
    pub fn new<P: Any>(start: usize, end: usize, parsed: P, evaluator: Rc<dyn Evaluator>) -> Self {
        Self {
            start,
            end,
            parsed: Rc::new(parsed),
            evaluator,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The payload, as handed to the evaluator
    pub fn parsed(&self) -> &dyn Any {
        self.parsed.as_ref()
    }

    /// The payload, if it is a `P`
    pub fn parsed_as<P: Any>(&self) -> Option<&P> {
        self.parsed.downcast_ref()
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Whether the two spans share at least one byte. Touching spans do not overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("evaluator", &self.evaluator.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluator_fn, Outcome};

    fn region(start: usize, end: usize) -> Region {
        let evaluator = evaluator_fn("noop", |_: &(), _| Ok(Outcome::Pass));
        Region::new(start, end, (), evaluator)
    }

    #[test]
    fn test_debug_names_the_evaluator() {
        assert_eq!(
            format!("{:?}", region(0, 1)),
            r#"Region { start: 0, end: 1, evaluator: "noop" }"#
        );
    }

    #[test]
    fn test_parsed_as() {
        let evaluator = evaluator_fn("noop", |_: &String, _| Ok(Outcome::Pass));
        let region = Region::new(0, 4, "data".to_string(), evaluator);

        assert_eq!(region.parsed_as::<String>().map(String::as_str), Some("data"));
        assert!(region.parsed_as::<i32>().is_none());
        assert_eq!(region.span(), 0..4);
    }

    #[test]
    fn test_overlaps() {
        assert!(region(0, 2).overlaps(&region(1, 3)));
        assert!(region(1, 3).overlaps(&region(0, 2)));
        assert!(region(0, 4).overlaps(&region(1, 2)));
        assert!(!region(0, 1).overlaps(&region(1, 2)));
    }

    #[test]
    fn test_empty_region_overlaps_only_inside() {
        assert!(region(2, 2).overlaps(&region(0, 4)));
        assert!(!region(2, 2).overlaps(&region(0, 2)));
        assert!(!region(2, 2).overlaps(&region(2, 4)));
    }
}
