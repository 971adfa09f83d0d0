//! Bit-packed augmented matrices over GF(2)
//!
//! Each row stores its coefficient bits in `⌈cols/64⌉` words, bit `j % 64` of
//! word `j / 64` holding column `j`, followed by one trailing word whose bit 0
//! is the right-hand side.

use rayon::prelude::*;

pub const WORD_BITS: usize = u64::BITS as usize;

/// Row count above which row updates are spread across the rayon pool
pub const PARALLEL_ROW_THRESHOLD: usize = 256;

/// Word index and mask addressing column `col`
#[inline]
pub fn bit_position(col: usize) -> (usize, u64) {
    (col / WORD_BITS, 1u64 << (col % WORD_BITS))
}

#[inline]
pub fn set_bit(row: &mut [u64], col: usize) {
    let (word, mask) = bit_position(col);
    row[word] |= mask;
}

#[inline]
pub fn test_bit(row: &[u64], col: usize) -> bool {
    let (word, mask) = bit_position(col);
    row[word] & mask != 0
}

/// Set the right-hand-side bit of a packed row
#[inline]
pub fn set_rhs_bit(row: &mut [u64]) {
    if let Some(last) = row.last_mut() {
        *last |= 1;
    }
}

#[inline]
pub fn rhs_bit(row: &[u64]) -> bool {
    row.last().is_some_and(|last| last & 1 != 0)
}

/// Pack a boolean vector into `⌈len/64⌉` words
pub fn pack_bits(bits: &[bool]) -> Vec<u64> {
    let mut words = vec![0u64; bits.len().div_ceil(WORD_BITS)];
    for (idx, _) in bits.iter().enumerate().filter(|(_, &bit)| bit) {
        set_bit(&mut words, idx);
    }
    words
}

/// Augmented GF(2) matrix `[M | b]` in a single row-major word buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedMatrix {
    rows: usize,
    cols: usize,
    coef_words: usize,
    stride: usize,
    words: Vec<u64>,
}

impl PackedMatrix {
    /// All-zero matrix with `rows` equations over `cols` unknowns
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let coef_words = cols.div_ceil(WORD_BITS);
        let stride = coef_words + 1;
        Self {
            rows,
            cols,
            coef_words,
            stride,
            words: vec![0; rows * stride],
        }
    }

    /// Build every row in parallel; `fill` receives the row index and its zeroed words
    pub fn from_fn<F>(rows: usize, cols: usize, fill: F) -> Self
    where
        F: Fn(usize, &mut [u64]) + Sync + Send,
    {
        let mut matrix = Self::zeros(rows, cols);
        let stride = matrix.stride;
        matrix
            .words
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(idx, row)| fill(idx, row));
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Words per row, including the right-hand-side word
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn coefficient_words(&self) -> usize {
        self.coef_words
    }

    pub fn row(&self, row: usize) -> &[u64] {
        &self.words[row * self.stride..(row + 1) * self.stride]
    }

    /// Coefficient words of a row, without the right-hand side
    pub fn coefficients(&self, row: usize) -> &[u64] {
        &self.row(row)[..self.coef_words]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u64] {
        &mut self.words[row * self.stride..(row + 1) * self.stride]
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        test_bit(self.row(row), col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let (word, mask) = bit_position(col);
        let words = self.row_mut(row);
        if value {
            words[word] |= mask;
        } else {
            words[word] &= !mask;
        }
    }

    pub fn rhs(&self, row: usize) -> bool {
        rhs_bit(self.row(row))
    }

    pub fn set_rhs(&mut self, row: usize, value: bool) {
        let last = self.stride - 1;
        let words = self.row_mut(row);
        if value {
            words[last] |= 1;
        } else {
            words[last] &= !1;
        }
    }

    /// True when the row has no coefficient bits set
    pub fn is_zero_row(&self, row: usize) -> bool {
        self.coefficients(row).iter().all(|&word| word == 0)
    }

    /// `dst ^= src`, over coefficients and right-hand side
    pub fn xor_row_into(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        let stride = self.stride;
        let (source, target): (&[u64], &mut [u64]) = if src < dst {
            let (head, tail) = self.words.split_at_mut(dst * stride);
            (&head[src * stride..(src + 1) * stride], &mut tail[..stride])
        } else {
            let (head, tail) = self.words.split_at_mut(src * stride);
            (&tail[..stride], &mut head[dst * stride..(dst + 1) * stride])
        };
        for (t, s) in target.iter_mut().zip(source) {
            *t ^= *s;
        }
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let stride = self.stride;
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.words.split_at_mut(high * stride);
        head[low * stride..(low + 1) * stride].swap_with_slice(&mut tail[..stride]);
    }

    /// XOR `pivot_row` into every other row that has `col` set
    pub fn eliminate_column(&mut self, pivot_row: usize, col: usize) {
        let pivot = self.row(pivot_row).to_vec();
        let (word, mask) = bit_position(col);
        let apply = |(k, row): (usize, &mut [u64])| {
            if k != pivot_row && row[word] & mask != 0 {
                for (dst, src) in row.iter_mut().zip(&pivot) {
                    *dst ^= *src;
                }
            }
        };

        let stride = self.stride;
        if self.rows >= PARALLEL_ROW_THRESHOLD {
            self.words.par_chunks_mut(stride).enumerate().for_each(apply);
        } else {
            self.words.chunks_mut(stride).enumerate().for_each(apply);
        }
    }

    /// First row in `from..` with `col` set
    pub fn find_row_with(&self, col: usize, from: usize) -> Option<usize> {
        (from..self.rows).find(|&row| self.get(row, col))
    }

    /// Parity of `row · x` over the coefficient part, `x` packed with [`pack_bits`]
    pub fn row_dot(&self, row: usize, x: &[u64]) -> bool {
        self.coefficients(row)
            .iter()
            .zip(x)
            .map(|(a, b)| (a & b).count_ones())
            .sum::<u32>()
            % 2
            == 1
    }

    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|i| (i + 1..self.cols).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let matrix = PackedMatrix::zeros(3, 64);
        assert_eq!(matrix.coefficient_words(), 1);
        assert_eq!(matrix.stride(), 2);

        let matrix = PackedMatrix::zeros(3, 65);
        assert_eq!(matrix.coefficient_words(), 2);
        assert_eq!(matrix.stride(), 3);
    }

    #[test]
    fn test_get_set_across_words() {
        let mut matrix = PackedMatrix::zeros(2, 130);
        matrix.set(1, 0, true);
        matrix.set(1, 64, true);
        matrix.set(1, 129, true);
        matrix.set_rhs(1, true);

        assert!(matrix.get(1, 0) && matrix.get(1, 64) && matrix.get(1, 129));
        assert!(!matrix.get(1, 63));
        assert!(matrix.rhs(1));
        assert!(!matrix.rhs(0));
        assert!(matrix.is_zero_row(0));
        // rhs lives in bit 0 of the trailing word
        assert_eq!(matrix.row(1)[3], 1);

        matrix.set(1, 64, false);
        assert!(!matrix.get(1, 64));
    }

    #[test]
    fn test_xor_and_swap() {
        let mut matrix = PackedMatrix::zeros(3, 4);
        matrix.set(0, 0, true);
        matrix.set(0, 1, true);
        matrix.set_rhs(0, true);
        matrix.set(2, 1, true);

        matrix.xor_row_into(0, 2);
        assert!(matrix.get(2, 0));
        assert!(!matrix.get(2, 1));
        assert!(matrix.rhs(2));

        matrix.xor_row_into(2, 0);
        assert!(matrix.get(0, 1));
        assert!(!matrix.get(0, 0));
        assert!(!matrix.rhs(0));

        matrix.swap_rows(0, 1);
        assert!(matrix.is_zero_row(0));
        assert!(matrix.get(1, 1));
    }

    #[test]
    fn test_eliminate_column() {
        let mut matrix = PackedMatrix::zeros(3, 3);
        for row in 0..3 {
            matrix.set(row, 0, true);
        }
        matrix.set(0, 2, true);
        matrix.eliminate_column(0, 0);

        assert!(matrix.get(0, 0));
        assert!(!matrix.get(1, 0) && !matrix.get(2, 0));
        assert!(matrix.get(1, 2) && matrix.get(2, 2));
    }

    #[test]
    fn test_row_dot() {
        let mut matrix = PackedMatrix::zeros(1, 70);
        matrix.set(0, 3, true);
        matrix.set(0, 68, true);
        let x = pack_bits(&(0..70).map(|i| i == 3 || i == 68).collect::<Vec<_>>());
        assert!(!matrix.row_dot(0, &x));
        let x = pack_bits(&(0..70).map(|i| i == 68).collect::<Vec<_>>());
        assert!(matrix.row_dot(0, &x));
    }
}
