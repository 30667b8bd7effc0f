//! Lossless whitespace/word segmentation
//!
//! Text is split into maximal runs of whitespace and maximal runs of
//! everything else. Nothing is trimmed, collapsed or normalized, so
//! concatenating the segments always yields the input.

/// Kind of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Maximal run of whitespace characters
    Whitespace,
    /// Maximal run of non-whitespace characters
    Word,
}

/// A borrowed span of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Whitespace or word
    pub kind: SegmentKind,
    /// The exact source text
    pub text: &'a str,
    /// Byte offset of `text` within the input
    pub offset: usize,
}

impl Segment<'_> {
    /// Whether this is a whitespace run
    pub fn is_whitespace(&self) -> bool {
        self.kind == SegmentKind::Whitespace
    }
}

/// Iterator over the segments of a string
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Segmenter<'a> {
    /// Segment `text`
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;
        let whitespace = first.is_whitespace();

        let len = rest
            .char_indices()
            .find(|&(_, ch)| ch.is_whitespace() != whitespace)
            .map_or(rest.len(), |(idx, _)| idx);

        let segment = Segment {
            kind: if whitespace {
                SegmentKind::Whitespace
            } else {
                SegmentKind::Word
            },
            text: &rest[..len],
            offset: self.pos,
        };
        self.pos += len;
        Some(segment)
    }
}

impl std::iter::FusedIterator for Segmenter<'_> {}

/// Collect all segments of `text`
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    Segmenter::new(text).collect()
}
