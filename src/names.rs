//! Resolution of resource directory entry names.

use alloc::string::String;
use core::fmt;

use log::trace;

use crate::{constants::*, errors::*, source::ByteSource, types::*, util::*};

/// Returns the symbolic name of a standard resource type, or `None` for unmapped codes.
pub fn resource_type_name(code: u32) -> Option<&'static str> {
    let Ok(code) = WORD::try_from(code) else {
        return None;
    };
    Some(match code {
        RT_CURSOR => "RT_CURSOR",
        RT_BITMAP => "RT_BITMAP",
        RT_ICON => "RT_ICON",
        RT_MENU => "RT_MENU",
        RT_DIALOG => "RT_DIALOG",
        RT_STRING => "RT_STRING",
        RT_FONTDIR => "RT_FONTDIR",
        RT_FONT => "RT_FONT",
        RT_ACCELERATOR => "RT_ACCELERATOR",
        RT_RCDATA => "RT_RCDATA",
        RT_MESSAGETABLE => "RT_MESSAGETABLE",
        RT_VERSION => "RT_VERSION",
        RT_DLGINCLUDE => "RT_DLGINCLUDE",
        RT_PLUGPLAY => "RT_PLUGPLAY",
        RT_VXD => "RT_VXD",
        RT_ANICURSOR => "RT_ANICURSOR",
        RT_ANIICON => "RT_ANIICON",
        RT_HTML => "RT_HTML",
        RT_MANIFEST => "RT_MANIFEST",
        _ => return None,
    })
}

/// Resolved name of a resource directory entry.
/// This can either be a raw id or a name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResourceEntryName {
    // raw id
    ID(u32),
    // offset relative to the resource section and decoded string
    Name(u32, String),
}
impl ResourceEntryName {
    /// Resolve the name field of a directory entry.
    /// String names are read at `base_offset` plus the entry's name offset.
    ///
    /// # Returns
    /// Returns an error if a string name could not be read.
    pub fn parse<S: ByteSource + ?Sized>(
        source: &S, base_offset: u64, name: EntryName,
    ) -> Result<Self, ExtractError> {
        match name {
            EntryName::Id(id) => {
                trace!("reading resource id {:#x?}", id);
                Ok(Self::ID(id))
            }
            EntryName::String(offset) => {
                let address = base_offset + offset as u64;
                trace!("reading resource name at {:#x?}", address);
                let length = read_at::<u16, _>(source, address)? as u64;
                // size is in 16 bit characters so it needs to be doubled
                let data = source.read_vec(address + 2, length * 2)?;
                let name = decode_u16_string(&data);
                trace!("resource name: {:?}", name);
                Ok(Self::Name(offset, name))
            }
        }
    }

    /// Returns the raw entry value without the string flag.
    /// For ids this is the id, for names the offset of the name string.
    pub fn value(&self) -> u32 {
        match self {
            Self::ID(id) => *id,
            Self::Name(offset, _) => *offset,
        }
    }

    /// Returns the decoded name, or `None` for ids.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ID(_) => None,
            Self::Name(_, name) => Some(name),
        }
    }
}

/// Resolved type of a top-level resource directory entry.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResourceType {
    /// Numeric type code, standard or custom.
    Id(u32),
    /// Custom type identified by a string.
    Name(String),
}
impl ResourceType {
    /// Returns the symbolic `RT_*` name of a standard type.
    /// Unmapped codes return `None`, they may be custom or unrecognized standard types.
    pub fn symbolic_name(&self) -> Option<&'static str> {
        match self {
            Self::Id(code) => resource_type_name(*code),
            Self::Name(_) => None,
        }
    }

    /// Returns the numeric type code, or `None` for named types.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Id(code) => Some(*code),
            Self::Name(_) => None,
        }
    }

    pub fn is_string_table(&self) -> bool { *self == Self::Id(RT_STRING as u32) }
}
impl From<&ResourceEntryName> for ResourceType {
    fn from(name: &ResourceEntryName) -> Self {
        match name {
            ResourceEntryName::ID(code) => Self::Id(*code),
            ResourceEntryName::Name(_, name) => Self::Name(name.clone()),
        }
    }
}
impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(code) => match resource_type_name(*code) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", code),
            },
            Self::Name(name) => f.write_str(name),
        }
    }
}
