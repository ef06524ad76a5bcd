//! Extended-track geometry.
//!
//! The carousel never shows the real slide sequence directly. It slides a
//! *tape* that carries one extra slide at each end:
//!
//! ```text
//! position:  0        1        2     ...   N        N+1
//! slide:     clone(N-1) slide0 slide1 ... slide(N-1) clone(0)
//! ```
//!
//! Moving past the last real slide lands on the appended clone of the first
//! one, which looks identical. Once the animation finishes the controller
//! teleports (without animation) to position 1 and the loop is seamless.
//!
//! [`Track`] holds only the length and answers every index question; the
//! slides themselves live wherever the host keeps them. [`extend`] builds the
//! extended sequence for callers that do own the slide values.

/// Index arithmetic over an extended track of `len + 2` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    len: usize,
}

impl Track {
    /// A track over `len` real slides. Returns `None` for an empty sequence.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len })
    }

    /// Number of real slides (N).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a track cannot be built empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of positions on the extended track (N + 2).
    pub fn extended_len(&self) -> usize {
        self.len + 2
    }

    /// Resting position of the first real slide.
    pub fn first(&self) -> usize {
        1
    }

    /// Resting position of the last real slide.
    pub fn last(&self) -> usize {
        self.len
    }

    /// True for the two synthetic boundary positions.
    pub fn is_clone(&self, position: usize) -> bool {
        position == 0 || position == self.len + 1
    }

    /// Map a track position to the index of the slide it shows.
    ///
    /// - `0` → `N - 1` (clone of the last slide)
    /// - `N + 1` → `0` (clone of the first slide)
    /// - otherwise `position - 1`
    pub fn real_index(&self, position: usize) -> usize {
        if position == 0 {
            self.len - 1
        } else if position >= self.len + 1 {
            0
        } else {
            position - 1
        }
    }

    /// Track position of a real slide index (skips the prepended clone).
    pub fn position_of(&self, real_index: usize) -> Option<usize> {
        (real_index < self.len).then_some(real_index + 1)
    }

    /// Where a clone position teleports to once its animation has finished.
    ///
    /// Returns `None` for real positions, which need no correction.
    pub fn settle_target(&self, position: usize) -> Option<usize> {
        if position == 0 {
            Some(self.last())
        } else if position == self.len + 1 {
            Some(self.first())
        } else {
            None
        }
    }
}

/// Build the extended sequence `[last, slides.., first]`.
///
/// Returns an empty vector for an empty input.
pub fn extend<T: Clone>(slides: &[T]) -> Vec<T> {
    let (Some(first), Some(last)) = (slides.first(), slides.last()) else {
        return Vec::new();
    };
    let mut extended = Vec::with_capacity(slides.len() + 2);
    extended.push(last.clone());
    extended.extend_from_slice(slides);
    extended.push(first.clone());
    extended
}
