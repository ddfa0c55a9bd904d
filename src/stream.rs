use std::io::{self, Read};

/// Bounded read-once view over an owned byte buffer.
///
/// Yields `buf[pos..end]` and reports end-of-input after; used when
/// detection ran over a plain buffer and there is no tail stream to merge.
#[derive(Debug)]
pub struct BufferedBytes {
    buf: Vec<u8>,
    pos: usize,
    end: usize,
}

impl BufferedBytes {
    /// Create a view over `buf[start..end]`.
    ///
    /// Bounds must already have been validated by the caller (the match
    /// constructor rejects illegal start/length combinations).
    pub(crate) fn new(buf: Vec<u8>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= buf.len());
        Self { buf, pos: start, end }
    }

    /// Bytes remaining in the window
    pub fn available(&self) -> usize {
        self.end - self.pos
    }
}

impl Read for BufferedBytes {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.end - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Read-once composite source: a buffered prefix followed transparently by
/// the remainder of the original stream.
///
/// The prefix holds bytes already consumed from the original source during
/// probing; the tail is the same source, still open. Reads drain the prefix
/// first, never re-reading or skipping a byte, then continue from the tail.
/// End-of-input is reported exactly when both are exhausted. The tail is
/// never copied eagerly.
#[derive(Debug)]
pub struct MergedStream<R> {
    prefix: Vec<u8>,
    pos: usize,
    end: usize,
    tail: R,
}

impl<R: Read> MergedStream<R> {
    pub(crate) fn new(prefix: Vec<u8>, start: usize, end: usize, tail: R) -> Self {
        debug_assert!(start <= end && end <= prefix.len());
        Self { prefix, pos: start, end, tail }
    }

    /// Bytes still buffered in the prefix; tail content is not counted
    /// because sizing it would require reading it.
    pub fn available(&self) -> usize {
        self.end - self.pos
    }
}

impl<R: Read> Read for MergedStream<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pos < self.end {
            let n = out.len().min(self.end - self.pos);
            out[..n].copy_from_slice(&self.prefix[self.pos..self.pos + n]);
            self.pos += n;
            return Ok(n);
        }
        self.tail.read(out)
    }
}

/// Reconstructed input source handed back after detection.
///
/// The two variants are distinct on purpose: `Buffered` is the degenerate
/// no-stream case, `Merged` carries the still-open original stream. Both
/// read as exactly the original input, bit-identical, with nothing lost to
/// probing.
#[derive(Debug)]
pub enum DataStream<R = io::Empty> {
    Buffered(BufferedBytes),
    Merged(MergedStream<R>),
}

impl<R: Read> DataStream<R> {
    /// Bytes remaining in the buffered portion
    pub fn available(&self) -> usize {
        match self {
            DataStream::Buffered(b) => b.available(),
            DataStream::Merged(m) => m.available(),
        }
    }
}

impl<R: Read> Read for DataStream<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        match self {
            DataStream::Buffered(b) => b.read(out),
            DataStream::Merged(m) => m.read(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_bytes_drain() {
        let mut view = BufferedBytes::new(b"0123456789".to_vec(), 2, 7);
        assert_eq!(view.available(), 5);
        let mut out = Vec::new();
        view.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"23456");
        assert_eq!(view.available(), 0);
        // drained view stays at end-of-input
        let mut byte = [0u8; 1];
        assert_eq!(view.read(&mut byte).unwrap(), 0);
    }

    #[test]
    fn test_buffered_bytes_empty_window() {
        let mut view = BufferedBytes::new(vec![0u8; 4], 4, 4);
        assert_eq!(view.available(), 0);
        let mut out = Vec::new();
        view.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_merged_stream_prefix_then_tail() {
        let tail: &[u8] = b" world";
        let mut merged = MergedStream::new(b"hello".to_vec(), 0, 5, tail);
        assert_eq!(merged.available(), 5);
        let mut out = Vec::new();
        merged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
        assert_eq!(merged.available(), 0);
    }

    #[test]
    fn test_merged_stream_small_chunks_no_loss_no_duplication() {
        let tail: &[u8] = b"defgh";
        let mut merged = MergedStream::new(b"abc".to_vec(), 0, 3, tail);
        let mut out = Vec::new();
        let mut chunk = [0u8; 2];
        loop {
            let n = merged.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(out, b"abcdefgh");
    }

    #[test]
    fn test_merged_stream_empty_prefix() {
        let tail: &[u8] = b"tail only";
        let mut merged = MergedStream::new(Vec::new(), 0, 0, tail);
        assert_eq!(merged.available(), 0);
        let mut out = Vec::new();
        merged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"tail only");
    }

    #[test]
    fn test_merged_stream_empty_tail() {
        let tail: &[u8] = b"";
        let mut merged = MergedStream::new(b"just prefix".to_vec(), 0, 11, tail);
        let mut out = Vec::new();
        merged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"just prefix");
    }

    #[test]
    fn test_merged_stream_respects_prefix_window() {
        // bytes outside [start, end) must never be served
        let tail: &[u8] = b"!";
        let mut merged = MergedStream::new(b"xxcorexx".to_vec(), 2, 6, tail);
        let mut out = Vec::new();
        merged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"core!");
    }

    #[test]
    fn test_data_stream_variants_delegate() {
        let mut buffered: DataStream = DataStream::Buffered(BufferedBytes::new(b"ab".to_vec(), 0, 2));
        assert_eq!(buffered.available(), 2);
        let mut out = Vec::new();
        buffered.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");

        let tail: &[u8] = b"cd";
        let mut merged = DataStream::Merged(MergedStream::new(b"ab".to_vec(), 0, 2, tail));
        let mut out = Vec::new();
        merged.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abcd");
    }
}
