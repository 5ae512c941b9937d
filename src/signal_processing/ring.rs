/// Fixed-capacity ring of the most recent raw samples
///
/// Slot `head` is the next write position and therefore also holds the
/// oldest sample. Samples are overwritten in place; the buffer never
/// reallocates after construction.
#[derive(Debug, Clone)]
pub struct CircularBuffer {
    samples: Vec<f32>,
    head: usize,
}

impl CircularBuffer {
    /// Create a buffer from seed samples in chronological order
    pub fn from_seed(samples: Vec<f32>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { samples, head: 0 }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Next write slot; since the last realignment, also the number of new
    /// samples written until the ring wraps
    pub fn head(&self) -> usize {
        self.head
    }

    /// Physical storage order
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Overwrite the oldest sample with `x`
    ///
    /// Returns the number of leading slots holding the newest data: slots
    /// `0..written` are newest (chronological), slots `written..` are older.
    pub fn push(&mut self, x: f32) -> usize {
        self.samples[self.head] = x;
        let written = self.head + 1;
        self.head = written % self.samples.len();
        written
    }

    /// Replace the contents with `samples` in chronological order
    pub fn reseed(&mut self, samples: &[f32]) {
        self.samples.copy_from_slice(samples);
        self.head = 0;
    }

    /// Contents in chronological order, leaving the ring untouched
    pub fn chronological(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.samples.len());
        out.extend_from_slice(&self.samples[self.head..]);
        out.extend_from_slice(&self.samples[..self.head]);
        out
    }

    /// Realign the ring in place into chronological order and return it
    pub fn rectify(&mut self) -> &[f32] {
        if self.head > 0 {
            rectify(&mut self.samples, 1, self.head, self.head);
            self.head = 0;
        }
        &self.samples
    }
}

/// Realign a column-major ring buffer of `rows`-tall columns in place so that
/// column `tail` becomes column 0
///
/// The live region is `[tail, head)` when `head > tail`, otherwise
/// `[tail, L) ++ [0, head)`; `head == tail` therefore means a full ring and
/// results in a full rotation. Afterwards the live columns are at the front in
/// order. Columns past the live region are unspecified. With `tail == 0` the
/// buffer is left unchanged.
pub fn rectify<T: Copy>(circ: &mut [T], rows: usize, head: usize, tail: usize) {
    debug_assert!(rows > 0 && circ.len().is_multiple_of(rows));
    let cols = circ.len() / rows;
    if cols == 0 {
        return;
    }
    debug_assert!(head <= cols, "head {} beyond {} columns", head, cols);
    debug_assert!(tail < cols, "tail {} beyond {} columns", tail, cols);

    if head > tail {
        // Unwrapped: a single forward move of the live span
        circ.copy_within(tail * rows..head * rows, 0);
    } else if 2 * tail >= cols + head {
        // The head segment fits in the gap left behind the old segment
        circ.copy_within(0..head * rows, (cols - tail) * rows);
        circ.copy_within(tail * rows.., 0);
    } else {
        let staged = circ[..head * rows].to_vec();
        circ.copy_within(tail * rows.., 0);
        let back = (cols - tail) * rows;
        circ[back..back + staged.len()].copy_from_slice(&staged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(cols: usize, rows: usize) -> Vec<u32> {
        (0..cols)
            .flat_map(|c| (0..rows).map(move |r| (c * 100 + r) as u32))
            .collect()
    }

    fn live_columns(cols: usize, head: usize, tail: usize) -> Vec<usize> {
        if head > tail {
            (tail..head).collect()
        } else {
            (tail..cols).chain(0..head).collect()
        }
    }

    #[test]
    fn test_rectify_all_head_tail_pairs() {
        for rows in 1..=3 {
            for cols in 1..=9 {
                for tail in 0..cols {
                    for head in 0..=cols {
                        let original = columns(cols, rows);
                        let mut circ = original.clone();
                        rectify(&mut circ, rows, head, tail);

                        let live = live_columns(cols, head, tail);
                        for (dst, &src) in live.iter().enumerate() {
                            assert_eq!(
                                &circ[dst * rows..(dst + 1) * rows],
                                &original[src * rows..(src + 1) * rows],
                                "rows={} cols={} head={} tail={} column {}",
                                rows,
                                cols,
                                head,
                                tail,
                                dst
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rectify_full_ring_is_rotation() {
        for cols in 1..=9 {
            for split in 0..cols {
                let original = columns(cols, 2);
                let mut circ = original.clone();
                rectify(&mut circ, 2, split, split);

                let mut expected = original.clone();
                expected.rotate_left(split * 2);
                assert_eq!(circ, expected, "cols={} split={}", cols, split);
            }
        }
    }

    #[test]
    fn test_rectify_zero_tail_is_noop() {
        for cols in 1..=9 {
            for head in 0..=cols {
                let original = columns(cols, 1);
                let mut circ = original.clone();
                rectify(&mut circ, 1, head, 0);
                assert_eq!(circ, original);
            }
        }
    }

    #[test]
    fn test_push_wraps_head() {
        let mut ring = CircularBuffer::from_seed(vec![1.0, 2.0, 3.0]);
        assert_eq!(ring.push(4.0), 1);
        assert_eq!(ring.push(5.0), 2);
        assert_eq!(ring.head(), 2);
        assert_eq!(ring.push(6.0), 3);
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.as_slice(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_chronological_and_rectify_agree() {
        let mut ring = CircularBuffer::from_seed((0..7).map(|i| i as f32).collect());
        for x in 7..11 {
            ring.push(x as f32);
        }
        let expected: Vec<f32> = (4..11).map(|i| i as f32).collect();
        assert_eq!(ring.chronological(), expected);
        assert_eq!(ring.rectify(), expected.as_slice());
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.chronological(), expected);
    }

    #[test]
    fn test_reseed_resets_head() {
        let mut ring = CircularBuffer::from_seed(vec![0.0; 4]);
        ring.push(1.0);
        ring.reseed(&[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(ring.head(), 0);
        assert_eq!(ring.chronological(), vec![5.0, 6.0, 7.0, 8.0]);
    }
}
