//! Common utilities
//!
//! A standard vocabulary used throughout the code.

use std::{self, cmp, fmt, hash, marker, num};

use crate::basic::sea::TableIndex;

/// The core implementation of a u32-based ID.
///
/// The ID can be any number in the `[0, u32::MAX - 2]` range:
/// -   `u32::MAX` is reserved to enable size optimizations (Option).
/// -   `u32::MAX - 1` is reserved to denote Default constructed IDs.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct CoreId(num::NonZeroU32);

impl CoreId {
    /// Creates a new instance.
    ///
    /// # Panics
    ///
    /// Panics if the integer provided is `u32::MAX`.
    pub fn new(id: u32) -> CoreId {
        match id.checked_add(1).and_then(num::NonZeroU32::new) {
            Some(raw) => CoreId(raw),
            None => panic!("Unsuitable ID: {}", id),
        }
    }

    /// Get the raw ID.
    pub fn raw(&self) -> u32 { self.0.get() - 1 }
}

impl fmt::Debug for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.raw())
    }
}

impl Default for CoreId {
    fn default() -> CoreId { CoreId::new(std::u32::MAX - 1) }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.raw())
    }
}

/// An Id implementation based on CoreId.
//  #[manual(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Id<T: ?Sized>(CoreId, marker::PhantomData<*const T>);

impl<T: ?Sized> Id<T> {
    /// Creates a new instance.
    pub fn new(id: u32) -> Self { Id(CoreId::new(id), marker::PhantomData) }
}

impl<T: ?Sized> Clone for Id<T> {
    fn clone(&self) -> Self { *self }
}

impl<T: ?Sized> Copy for Id<T> {}

impl<T: ?Sized> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if *self == Default::default() {
            write!(f, "Id(default)")
        } else {
            write!(f, "Id({})", self.index())
        }
    }
}

impl<T: ?Sized> Default for Id<T> {
    fn default() -> Self { Id(Default::default(), marker::PhantomData) }
}

impl<T: ?Sized> cmp::Eq for Id<T> {}

impl<T: ?Sized> hash::Hash for Id<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: ?Sized> cmp::Ord for Id<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering { self.0.cmp(&other.0) }
}

impl<T: ?Sized> cmp::PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool { self.0.eq(&other.0) }
}

impl<T: ?Sized> cmp::PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T: ?Sized> TableIndex for Id<T> {
    fn from_index(index: usize) -> Self { Id::new(index as u32) }

    fn index(&self) -> usize { self.0.raw() as usize }
}

/// A Range represents a start and end position in a buffer.
///
/// Note:   the `Range` does not know which buffer it indexes in, see
///         `Position`.
///
/// Note:   a `Range` cannot index past 4GB.
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Range {
    offset: u32,
    length: u32,
}

impl Range {
    /// Creates a new `Range` from a start position and length.
    ///
    /// In Debug, it is checked that the end position will not exceed 4GB.
    pub fn new(offset: usize, length: usize) -> Range {
        debug_assert!(offset <= std::u32::MAX as usize);
        debug_assert!(length <= std::u32::MAX as usize);
        debug_assert!(offset <= (std::u32::MAX as usize - length));
        Range { offset: offset as u32, length: length as u32 }
    }

    /// Returns the start position of the range.
    pub fn offset(self) -> usize { self.offset as usize }

    /// Returns the end position of the range (excluded).
    pub fn end_offset(self) -> usize { self.offset() + self.length() }

    /// Returns the length of the range.
    pub fn length(self) -> usize { self.length as usize }

    /// Extend one range with another, the resulting range spans both ranges,
    /// and in the case they were discontiguous also spans the interval.
    pub fn extend(self, other: Range) -> Range {
        if self.offset > other.offset {
            other.extend(self)
        } else if self.end_offset() >= other.end_offset() {
            self
        } else {
            Range {
                offset: self.offset,
                length: (other.end_offset() - self.offset()) as u32
            }
        }
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}@{}", self.length, self.offset)
    }
}

impl Default for Range {
    fn default() -> Range { Range::new(0, 0) }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}@{}", self.length, self.offset)
    }
}

/// A source file, only ever referred to by its ID.
#[derive(Clone, Copy, Debug)]
pub enum SourceFile {}

/// The ID of a source file.
pub type FileId = Id<SourceFile>;

/// A Position locates a fragment of source code: a file and a range within.
///
/// Positions are only ever used to report diagnostics.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Position {
    /// The file.
    pub file: FileId,
    /// The range within the file.
    pub range: Range,
}

impl Position {
    /// Creates a new `Position`.
    pub fn new(file: FileId, range: Range) -> Position {
        Position { file, range }
    }

    /// Extends one position with another, see `Range::extend`.
    ///
    /// Positions in different files are not merged, `self` is returned.
    pub fn extend(self, other: Position) -> Position {
        if self.file != other.file {
            return self;
        }

        Position { file: self.file, range: self.range.extend(other.range) }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "#{}:{}", self.file.index(), self.range)
    }
}

/// Span
pub trait Span {
    /// Returns the Position spanned by the element.
    fn span(&self) -> Position;
}
