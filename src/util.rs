use alloc::{
    format,
    string::{String, ToString},
};
use core::{any::type_name, char::REPLACEMENT_CHARACTER, mem::size_of};

use zerocopy::FromBytes;

use crate::{source::ByteSource, ExtractError, ReadError};

pub fn read<T: FromBytes + Copy>(resource: &[u8]) -> Result<T, ReadError> {
    T::read_from_prefix(resource)
        .map_err(|_| ReadError(type_name::<T>().to_string()))
        .map(|(value, _)| value)
}

/// Read a fixed-layout record at the given offset of the source.
pub fn read_at<T: FromBytes + Copy, S: ByteSource + ?Sized>(
    source: &S, offset: u64,
) -> Result<T, ExtractError> {
    let data = source.read_vec(offset, size_of::<T>() as u64)?;
    Ok(read::<T>(&data)?)
}

/// Decode utf16le code units, replacing unpaired surrogates.
/// Odd trailing bytes are ignored.
pub fn decode_u16_string(data: &[u8]) -> String {
    char::decode_utf16(data.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])))
        .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER))
        .collect()
}

/// Read a length-prefixed utf16le string, returning the string and the number of bytes consumed.
/// The prefix is the length in 16 bit characters.
pub fn read_prefixed_u16_string(data: &[u8]) -> Result<(String, usize), ReadError> {
    let length = read::<u16>(data)? as usize;
    let end = 2 + length * 2;
    if data.len() < end {
        return Err(ReadError(format!(
            "string of {} characters exceeds {} remaining bytes",
            length,
            data.len() - 2
        )));
    }
    Ok((decode_u16_string(&data[2..end]), end))
}
