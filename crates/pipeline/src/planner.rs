//! Chunk planning for large files.

use std::ops::Range;

use filedrop_protocol::CHUNK_SIZE;

/// Computes the ordered byte ranges a file of `file_size` bytes is split
/// into.
///
/// Produces `ceil(file_size / chunk_size)` ranges; range *i* (1-based) is
/// `[(i-1)*chunk_size, min(i*chunk_size, file_size))`. A zero `file_size`
/// yields no ranges. If `chunk_size` is 0, [`CHUNK_SIZE`] is used.
pub fn plan(file_size: u64, chunk_size: u64) -> Vec<Range<u64>> {
    let chunk_size = if chunk_size == 0 {
        CHUNK_SIZE as u64
    } else {
        chunk_size
    };

    let mut ranges = Vec::with_capacity(file_size.div_ceil(chunk_size) as usize);
    let mut start = 0;
    while start < file_size {
        let end = (start + chunk_size).min(file_size);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_no_ranges() {
        assert!(plan(0, 4).is_empty());
    }

    #[test]
    fn exact_multiple_yields_equal_chunks() {
        let ranges = plan(12, 4);
        assert_eq!(ranges, vec![0..4, 4..8, 8..12]);
        assert!(ranges.iter().all(|r| r.end - r.start == 4));
    }

    #[test]
    fn remainder_goes_to_last_chunk() {
        let ranges = plan(10, 4);
        assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
        assert_eq!(ranges.last().unwrap().end - ranges.last().unwrap().start, 2);
    }

    #[test]
    fn single_chunk_when_smaller_than_chunk_size() {
        assert_eq!(plan(3, 4), vec![0..3]);
    }

    #[test]
    fn zero_chunk_size_falls_back_to_default() {
        let ranges = plan(5 * 1024 * 1024, 0);
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].end, CHUNK_SIZE as u64);
    }

    #[test]
    fn ranges_cover_file_without_gaps_or_overlap() {
        for file_size in [0u64, 1, 4, 5, 7, 8, 9, 100, 1023] {
            for chunk_size in [1u64, 2, 3, 7, 8, 1024] {
                let ranges = plan(file_size, chunk_size);
                assert_eq!(
                    ranges.len() as u64,
                    file_size.div_ceil(chunk_size),
                    "count for size {file_size} chunk {chunk_size}"
                );
                let mut expected_start = 0;
                for range in &ranges {
                    assert_eq!(range.start, expected_start);
                    assert!(range.end > range.start);
                    expected_start = range.end;
                }
                assert_eq!(expected_start, file_size);
            }
        }
    }
}
