//! Output destinations and the fan-out writer

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A writer shared between the host and the logger.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Where records go.
///
/// The logger only keeps a handle; opening, flushing and closing the
/// underlying resource stays with the host.
#[derive(Clone)]
pub enum Destination {
    /// Process standard output
    Stdout,
    /// Process standard error
    Stderr,
    /// Any host-owned writer
    Writer(SharedWriter),
}

impl Destination {
    /// Wrap an owned writer into a shared destination
    pub fn writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Destination::Writer(Arc::new(Mutex::new(writer)))
    }

    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        match self {
            Destination::Stdout => io::stdout().lock().write_all(record),
            Destination::Stderr => io::stderr().lock().write_all(record),
            Destination::Writer(w) => w
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(record),
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("Stdout"),
            Destination::Stderr => f.write_str("Stderr"),
            Destination::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<SharedBuffer> for Destination {
    fn from(buffer: SharedBuffer) -> Self {
        Destination::Writer(buffer.inner)
    }
}

/// Duplicates each record across several destinations.
#[derive(Debug, Clone)]
pub(crate) struct FanOut {
    destinations: Vec<Destination>,
}

impl FanOut {
    /// Build over a non-empty list of destinations
    pub(crate) fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// Write one record to every destination.
    ///
    /// A failing destination does not stop delivery to the others; the
    /// first error seen is returned.
    pub(crate) fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut first_err = None;
        for destination in &self.destinations {
            if let Err(e) = destination.write_record(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// In-memory capturing destination.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured bytes as text
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }

    /// Captured byte count
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing was captured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Captured text split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fan_out_duplicates() {
        let a = SharedBuffer::new();
        let b = SharedBuffer::new();
        let fan = FanOut::new(vec![a.clone().into(), b.clone().into()]);

        fan.write_record(b"hello\n").unwrap();

        assert_eq!(a.contents(), "hello\n");
        assert_eq!(b.contents(), "hello\n");
    }

    #[test]
    fn test_failing_destination_does_not_block_others() {
        let good = SharedBuffer::new();
        let fan = FanOut::new(vec![Destination::writer(Broken), good.clone().into()]);

        let err = fan.write_record(b"x\n").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(good.contents(), "x\n");
    }

    #[test]
    fn test_shared_buffer_clear() {
        let mut buf = SharedBuffer::new();
        buf.write_all(b"one\ntwo\n").unwrap();
        assert_eq!(buf.lines(), vec!["one", "two"]);

        buf.clear();
        assert!(buf.is_empty());
    }
}
