use core::fmt;

use crate::fixed::{DefaultPrecision, Precision};

use super::Vertex;

/// Reference per-frame vertex ceiling.
pub const MAX_VERTICES: usize = 4096;

/// Fixed-capacity vertex buffer with a cursor.
///
/// Capacity is the const parameter `N`. Storage is allocated once by
/// [`BatchBuffer::new`] and reused for every frame.
///
/// Overflow policy is fail-open: an append that does not fit is dropped and
/// reported through the `bool` return value only. A dropped frame of geometry
/// shows up as missing sprites, never as a stall or a write past the end.
///
/// Invariants:
/// - `count() <= N`
/// - only `as_slice()` (the first `count()` entries) is ever read; older
///   entries past the cursor are stale and unreachable
pub struct BatchBuffer<P: Precision = DefaultPrecision, const N: usize = MAX_VERTICES> {
    storage: Box<[Vertex<P>]>,
    len: usize,
    dropped: usize,
}

impl<P: Precision, const N: usize> BatchBuffer<P, N> {
    pub fn new() -> Self {
        Self {
            storage: vec![Vertex::ZERO; N].into_boxed_slice(),
            len: 0,
            dropped: 0,
        }
    }

    /// Moves the cursor back to zero. Storage is not cleared.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
        self.dropped = 0;
    }

    /// Appends one vertex. Returns `false` (and writes nothing) when full.
    #[inline]
    pub fn append(&mut self, vertex: Vertex<P>) -> bool {
        if self.len == N {
            self.dropped += 1;
            return false;
        }
        self.storage[self.len] = vertex;
        self.len += 1;
        true
    }

    /// Appends all of `vertices` or none of them.
    ///
    /// Used for primitives (quads, triangles) where a partial write would leave
    /// degenerate geometry in the stream.
    #[inline]
    pub fn append_all(&mut self, vertices: &[Vertex<P>]) -> bool {
        let n = vertices.len();
        if n > self.remaining() {
            self.dropped += n;
            return false;
        }
        self.storage[self.len..self.len + n].copy_from_slice(vertices);
        self.len += n;
        true
    }

    /// Number of valid vertices.
    #[inline]
    pub fn count(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        N - self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Vertices dropped by the overflow policy since the last reset.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The valid prefix of the buffer, in append order.
    #[inline]
    pub fn as_slice(&self) -> &[Vertex<P>] {
        &self.storage[..self.len]
    }
}

impl<P: Precision, const N: usize> Default for BatchBuffer<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Precision, const N: usize> fmt::Debug for BatchBuffer<P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchBuffer")
            .field("profile", &P::NAME)
            .field("count", &self.len)
            .field("capacity", &N)
            .field("dropped", &self.dropped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Vec2, Vec3};
    use crate::fixed::Q12_4;
    use crate::paint::Color;

    fn v(i: usize) -> Vertex<Q12_4> {
        Vertex::from_f32(Vec3::new(i as f32, 0.0, 0.0), Vec2::zero(), Color::WHITE)
    }

    #[test]
    fn starts_empty_with_full_capacity() {
        let b = BatchBuffer::<Q12_4, 16>::new();
        assert_eq!(b.count(), 0);
        assert_eq!(b.capacity(), 16);
        assert_eq!(b.remaining(), 16);
        assert!(b.is_empty());
    }

    #[test]
    fn default_capacity_is_reference_value() {
        let b = BatchBuffer::<Q12_4>::new();
        assert_eq!(b.capacity(), MAX_VERTICES);
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn count_tracks_appends_up_to_capacity() {
        for n in 0..=8 {
            let mut b = BatchBuffer::<Q12_4, 8>::new();
            for i in 0..n {
                assert!(b.append(v(i)));
            }
            assert_eq!(b.count(), n);
        }
    }

    #[test]
    fn append_past_capacity_is_a_counted_no_op() {
        let mut b = BatchBuffer::<Q12_4, 8>::new();
        for i in 0..8 {
            b.append(v(i));
        }
        assert!(b.is_full());
        for i in 8..20 {
            assert!(!b.append(v(i)));
        }
        assert_eq!(b.count(), 8);
        assert_eq!(b.dropped(), 12);
        // The last accepted vertex is untouched by the dropped ones.
        assert_eq!(b.as_slice()[7], v(7));
    }

    #[test]
    fn append_preserves_order() {
        let mut b = BatchBuffer::<Q12_4, 4>::new();
        b.append(v(3));
        b.append(v(1));
        assert_eq!(b.as_slice(), &[v(3), v(1)]);
    }

    // ── append_all ────────────────────────────────────────────────────────

    #[test]
    fn append_all_rejects_when_three_slots_remain() {
        let mut b = BatchBuffer::<Q12_4, 7>::new();
        assert!(b.append_all(&[v(0), v(1), v(2), v(3)]));
        assert_eq!(b.remaining(), 3);

        assert!(!b.append_all(&[v(4), v(5), v(6), v(7)]));
        assert_eq!(b.count(), 4);
        assert_eq!(b.dropped(), 4);
    }

    #[test]
    fn append_all_fills_exactly() {
        let mut b = BatchBuffer::<Q12_4, 8>::new();
        assert!(b.append_all(&[v(0); 4]));
        assert!(b.append_all(&[v(1); 4]));
        assert!(b.is_full());
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_hides_previous_vertices() {
        let mut b = BatchBuffer::<Q12_4, 8>::new();
        b.append(v(1));
        b.append(v(2));
        b.reset();
        assert_eq!(b.count(), 0);
        assert!(b.as_slice().is_empty());
        assert_eq!(b.dropped(), 0);

        b.append(v(9));
        assert_eq!(b.as_slice(), &[v(9)]);
    }

    #[test]
    fn reset_twice_stays_empty() {
        let mut b = BatchBuffer::<Q12_4, 8>::new();
        b.reset();
        assert_eq!(b.count(), 0);
        b.reset();
        assert_eq!(b.count(), 0);
    }
}
