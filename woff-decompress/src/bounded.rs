use std::io::{self, Write};

/// A sink that refuses to grow past a fixed number of bytes.
pub(crate) struct BoundedOutput {
    data: Vec<u8>,
    remaining: usize,
}

impl BoundedOutput {
    pub(crate) fn new(max_len: usize) -> Self {
        BoundedOutput {
            data: Vec::new(),
            remaining: max_len,
        }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Write for BoundedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining {
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "declared table size exceeded",
            ));
        }
        self.remaining -= buf.len();
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
