//! Random-access byte sources the image and its resources are read from.

use alloc::{vec, vec::Vec};

use crate::errors::*;

/// Random-access, read-only source of image bytes.
///
/// Reads address absolute offsets and never move a shared cursor,
/// so a source can be read from multiple threads at once.
pub trait ByteSource: Sync {
    /// Returns the total size of the source in bytes.
    fn size(&self) -> u64;

    /// Fill the buffer with the bytes starting at the given offset.
    ///
    /// # Returns
    /// Returns an error if the range exceeds the source or the underlying read fails.
    fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError>;

    /// Read `length` bytes starting at the given offset into a new buffer.
    /// The range is checked against [`ByteSource::size`] before allocating.
    fn read_vec(&self, offset: u64, length: u64) -> Result<Vec<u8>, ExtractError> {
        match offset.checked_add(length) {
            Some(end) if end <= self.size() => {}
            _ => return Err(ExtractError::OutOfBounds { offset, length }),
        }
        let mut buffer = vec![0; length as usize];
        self.read_at(offset, &mut buffer)?;
        Ok(buffer)
    }
}

impl ByteSource for [u8] {
    fn size(&self) -> u64 { self.len() as u64 }

    fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
        let length = buffer.len() as u64;
        let start = usize::try_from(offset).ok();
        let end = start.and_then(|start| start.checked_add(buffer.len()));
        match (start, end) {
            (Some(start), Some(end)) if end <= self.len() => {
                buffer.copy_from_slice(&self[start..end]);
                Ok(())
            }
            _ => Err(ExtractError::OutOfBounds { offset, length }),
        }
    }
}

impl ByteSource for Vec<u8> {
    fn size(&self) -> u64 { self.as_slice().size() }

    fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
        self.as_slice().read_at(offset, buffer)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn size(&self) -> u64 { (**self).size() }

    fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
        (**self).read_at(offset, buffer)
    }
}

#[cfg(feature = "std")]
pub use file::FileSource;

#[cfg(feature = "std")]
mod file {
    use std::{
        fs::File,
        path::{Path, PathBuf},
    };

    use log::trace;

    use super::ByteSource;
    use crate::errors::*;

    /// Byte source reading from a file opened read-only.
    ///
    /// The file handle is owned by the source and closed when it is dropped,
    /// on success and error paths alike.
    #[derive(Debug)]
    pub struct FileSource {
        file: File,
        path: PathBuf,
        size: u64,
        #[cfg(not(any(unix, windows)))]
        cursor: std::sync::Mutex<()>,
    }

    impl FileSource {
        /// Open the file at the given path for reading.
        ///
        /// # Returns
        /// Returns an error if the file could not be opened or its metadata could not be read.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
            let path = path.as_ref().to_path_buf();
            let file = File::open(&path)?;
            let size = file.metadata()?.len();
            trace!("opened {} ({} bytes)", path.display(), size);
            Ok(Self {
                file,
                path,
                size,
                #[cfg(not(any(unix, windows)))]
                cursor: std::sync::Mutex::new(()),
            })
        }

        /// Returns the path the source was opened from.
        pub fn path(&self) -> &Path { &self.path }
    }

    impl ByteSource for FileSource {
        fn size(&self) -> u64 { self.size }

        #[cfg(unix)]
        fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
            use std::os::unix::fs::FileExt;
            self.file.read_exact_at(buffer, offset)?;
            Ok(())
        }

        #[cfg(windows)]
        fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
            use std::{io, os::windows::fs::FileExt};
            let mut read = 0;
            while read < buffer.len() {
                match self.file.seek_read(&mut buffer[read..], offset + read as u64)? {
                    0 => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
                    n => read += n,
                }
            }
            Ok(())
        }

        #[cfg(not(any(unix, windows)))]
        fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<(), ExtractError> {
            use std::io::{Read, Seek, SeekFrom};
            // seek and read have to happen under one lock
            let _cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(buffer)?;
            Ok(())
        }
    }

    impl Drop for FileSource {
        fn drop(&mut self) {
            trace!("closing {}", self.path.display());
        }
    }
}
