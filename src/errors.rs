//! Errors specific to reading a PE image and extracting its resources.

use alloc::string::String;

#[cfg(feature = "std")]
use std::io::Error as IOError;

/// Error that can occur when reading and parsing bytes.
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(feature = "std", error("{0}"))]
pub struct ReadError(pub String);

/// Errors that can occur when reading a PE image or extracting its resources.
///
/// Any error aborts the whole extraction, no partial results are returned.
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ExtractError {
    #[cfg_attr(feature = "std", error("invalid bytes: {0}"))]
    InvalidBytes(ReadError),
    #[cfg_attr(feature = "std", error("read of {length} bytes at {offset:#x} outside source"))]
    OutOfBounds { offset: u64, length: u64 },
    #[cfg_attr(feature = "std", error("resource data address {rva:#x} invalid for section delta {diff:#x}"))]
    InvalidAddress { rva: u32, diff: i64 },
    #[cfg_attr(feature = "std", error("not a portable executable: {0}"))]
    NotPortableExecutable(String),
    #[cfg(feature = "std")]
    #[error("io error: {0}")]
    IOError(IOError),
}
impl From<ReadError> for ExtractError {
    fn from(error: ReadError) -> Self { ExtractError::InvalidBytes(error) }
}
#[cfg(feature = "std")]
impl From<IOError> for ExtractError {
    fn from(error: IOError) -> Self { ExtractError::IOError(error) }
}
