//! Emulation prevention byte handling for NAL unit RBSPs.

use std::io;

/// Transparently strips or inserts emulation prevention bytes from a NAL unit RBSP.
///
/// Whenever two `0x00` bytes are immediately followed by a byte with value `0x00`,
/// `0x01`, `0x02`, or `0x03`, the bitstream carries an extra `0x03` byte inserted
/// after the second `0x00` so that the byte sequence never emulates a start code.
/// This wrapper removes that extra byte on read, and inserts it on write, so that
/// callers only ever see the actual RBSP content.
#[derive(Debug)]
#[must_use]
pub struct EmulationPreventionIo<I> {
    inner: I,
    zero_count: u8,
}

impl<I> EmulationPreventionIo<I> {
    /// Creates a new [`EmulationPreventionIo`] wrapping the given reader or writer.
    pub const fn new(inner: I) -> Self {
        Self {
            inner,
            zero_count: 0,
        }
    }

    /// Returns the wrapped reader or writer.
    pub fn into_inner(self) -> I {
        self.inner
    }

    /// Returns a reference to the wrapped reader or writer.
    pub const fn get_ref(&self) -> &I {
        &self.inner
    }
}

/// Strips emulation prevention bytes from a complete RBSP buffer, returning an
/// owned copy of the raw payload.
///
/// Callers that need to track exact bit positions in the result (entry point
/// offsets, header lengths) should parse the returned buffer with a plain
/// [`BitReader`](crate::BitReader) over an [`io::Cursor`] rather than streaming
/// through [`EmulationPreventionIo`] directly, since a `Cursor` supports
/// [`io::Seek`].
pub fn remove_emulation_prevention(data: &[u8]) -> io::Result<Vec<u8>> {
    use io::Read;

    let mut reader = EmulationPreventionIo::new(data);
    let mut out = Vec::with_capacity(data.len());
    reader.read_to_end(&mut out)?;
    Ok(out)
}

/// Inserts emulation prevention bytes into a complete RBSP buffer, returning an
/// owned copy ready to be emitted as a NAL unit payload.
pub fn add_emulation_prevention(data: &[u8]) -> Vec<u8> {
    use io::Write;

    let mut out = Vec::with_capacity(data.len());
    // Writing to a Vec<u8> never fails.
    EmulationPreventionIo::new(&mut out).write_all(data).unwrap();
    out
}

impl<I: io::Read> io::Read for EmulationPreventionIo<I> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;

        for slot in buf.iter_mut() {
            let mut byte = [0u8; 1];

            loop {
                if self.inner.read(&mut byte)? == 0 {
                    return Ok(written);
                }

                // Drop the emulation prevention byte and keep scanning for real data.
                if self.zero_count >= 2 && byte[0] == 0x03 {
                    self.zero_count = 0;
                    continue;
                }

                self.zero_count = if byte[0] == 0 { self.zero_count + 1 } else { 0 };

                *slot = byte[0];
                written += 1;
                break;
            }
        }

        Ok(written)
    }
}

impl<I: io::Write> io::Write for EmulationPreventionIo<I> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if self.zero_count >= 2 && byte <= 0x03 {
                self.inner.write_all(&[0x03])?;
                self.zero_count = 0;
            }

            self.inner.write_all(&[byte])?;
            self.zero_count = if byte == 0 { self.zero_count + 1 } else { 0 };
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn test_write_emulation_prevention_single() {
        let mut out = Vec::new();
        {
            let mut writer = EmulationPreventionIo::new(&mut out);
            writer.write_all(&[0x00, 0x00, 0x01]).unwrap();
        }
        assert_eq!(out, vec![0x00, 0x00, 0x03, 0x01]);
    }

    #[test]
    fn test_write_emulation_prevention_multiple() {
        let mut out = Vec::new();
        {
            let mut writer = EmulationPreventionIo::new(&mut out);
            writer
                .write_all(&[0x00, 0x00, 0x00, 0x00, 0x03, 0xff])
                .unwrap();
        }
        assert_eq!(out, vec![0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x03, 0xff]);
    }

    #[test]
    fn test_read_emulation_prevention() {
        let data = [0x00, 0x00, 0x03, 0x01];
        let mut reader = EmulationPreventionIo::new(io::Cursor::new(data));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_read_emulation_prevention_multiple() {
        let data = [0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x03, 0xff];
        let mut reader = EmulationPreventionIo::new(io::Cursor::new(data));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0x00, 0x00, 0x03, 0xff]);
    }

    #[test]
    fn test_roundtrip() {
        let original = [
            0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00,
        ];

        let mut encoded = Vec::new();
        {
            let mut writer = EmulationPreventionIo::new(&mut encoded);
            writer.write_all(&original).unwrap();
        }

        let mut reader = EmulationPreventionIo::new(io::Cursor::new(encoded));
        let mut decoded = Vec::new();
        reader.read_to_end(&mut decoded).unwrap();

        assert_eq!(decoded, original);
    }
}
