//! Portable executable data types.
//!
//! These types are a one-to-one mapping of the data described in <https://docs.microsoft.com/en-us/windows/win32/debug/pe-format>

use core::str;

use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::constants::*;

#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct DosHeader {
    pub e_magic:    u16,
    pub e_cblp:     u16,
    pub e_cp:       u16,
    pub e_crlc:     u16,
    pub e_cparhdr:  u16,
    pub e_minalloc: u16,
    pub e_maxalloc: u16,
    pub e_ss:       u16,
    pub e_sp:       u16,
    pub e_csum:     u16,
    pub e_ip:       u16,
    pub e_cs:       u16,
    pub e_lfarlc:   u16,
    pub e_ovno:     u16,
    pub e_res:      [u16; 4],
    pub e_oemid:    u16,
    pub e_oeminfo:  u16,
    pub e_res2:     [u16; 10],
    pub e_lfanew:   u32,
}

#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct CoffHeader {
    pub machine:                 u16,
    pub number_of_sections:      u16,
    pub time_date_stamp:         u32,
    pub pointer_to_symbol_table: u32,
    pub number_of_symbols:       u32,
    pub size_of_optional_header: u16,
    pub characteristics:         u16,
}

#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct ImageDataDirectory {
    pub virtual_address: u32,
    pub size:            u32,
}

#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct OptionalHeader32 {
    pub magic:                          u16,
    pub major_linker_version:           u8,
    pub minor_linker_version:           u8,
    pub size_of_code:                   u32,
    pub size_of_initialized_data:       u32,
    pub size_of_uninitialized_data:     u32,
    pub address_of_entry_point:         u32,
    pub base_of_code:                   u32,
    pub base_of_data:                   u32,
    pub image_base:                     u32,
    pub section_alignment:              u32,
    pub file_alignment:                 u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version:            u16,
    pub minor_image_version:            u16,
    pub major_subsystem_version:        u16,
    pub minor_subsystem_version:        u16,
    pub win32_version_value:            u32,
    pub size_of_image:                  u32,
    pub size_of_headers:                u32,
    pub check_sum:                      u32,
    pub subsystem:                      u16,
    pub dll_characteristics:            u16,
    pub size_of_stack_reserve:          u32,
    pub size_of_stack_commit:           u32,
    pub size_of_heap_reserve:           u32,
    pub size_of_heap_commit:            u32,
    pub loader_flags:                   u32,
    pub number_of_rva_and_sizes:        u32,
    pub data_directory:                 [ImageDataDirectory; PE_NUMBER_OF_DATA_DIRECTORIES],
}

#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct OptionalHeader64 {
    pub magic:                          u16,
    pub major_linker_version:           u8,
    pub minor_linker_version:           u8,
    pub size_of_code:                   u32,
    pub size_of_initialized_data:       u32,
    pub size_of_uninitialized_data:     u32,
    pub address_of_entry_point:         u32,
    pub base_of_code:                   u32,
    pub image_base:                     u64,
    pub section_alignment:              u32,
    pub file_alignment:                 u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version:            u16,
    pub minor_image_version:            u16,
    pub major_subsystem_version:        u16,
    pub minor_subsystem_version:        u16,
    pub win32_version_value:            u32,
    pub size_of_image:                  u32,
    pub size_of_headers:                u32,
    pub check_sum:                      u32,
    pub subsystem:                      u16,
    pub dll_characteristics:            u16,
    pub size_of_stack_reserve:          u64,
    pub size_of_stack_commit:           u64,
    pub size_of_heap_reserve:           u64,
    pub size_of_heap_commit:            u64,
    pub loader_flags:                   u32,
    pub number_of_rva_and_sizes:        u32,
    pub data_directory:                 [ImageDataDirectory; PE_NUMBER_OF_DATA_DIRECTORIES],
}

/// Optional header in either the PE32 or the PE32+ layout, selected by its magic.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OptionalHeader {
    OptionalHeader32(OptionalHeader32),
    OptionalHeader64(OptionalHeader64),
}
impl OptionalHeader {
    /// Returns the size of the decoded header in bytes.
    pub const fn size(&self) -> u64 {
        match self {
            OptionalHeader::OptionalHeader32(_) => PE_32_OPTIONAL_HEADER_SIZE,
            OptionalHeader::OptionalHeader64(_) => PE_64_OPTIONAL_HEADER_SIZE,
        }
    }

    pub const fn magic(&self) -> u16 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.magic,
            OptionalHeader::OptionalHeader64(header) => header.magic,
        }
    }

    pub const fn address_of_entry_point(&self) -> u32 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.address_of_entry_point,
            OptionalHeader::OptionalHeader64(header) => header.address_of_entry_point,
        }
    }

    pub const fn image_base(&self) -> u64 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.image_base as u64,
            OptionalHeader::OptionalHeader64(header) => header.image_base,
        }
    }

    pub const fn section_alignment(&self) -> u32 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.section_alignment,
            OptionalHeader::OptionalHeader64(header) => header.section_alignment,
        }
    }

    pub const fn file_alignment(&self) -> u32 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.file_alignment,
            OptionalHeader::OptionalHeader64(header) => header.file_alignment,
        }
    }

    pub const fn subsystem(&self) -> u16 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.subsystem,
            OptionalHeader::OptionalHeader64(header) => header.subsystem,
        }
    }

    pub const fn number_of_rva_and_sizes(&self) -> u32 {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.number_of_rva_and_sizes,
            OptionalHeader::OptionalHeader64(header) => header.number_of_rva_and_sizes,
        }
    }

    /// Returns all 16 data directory slots, regardless of `number_of_rva_and_sizes`.
    pub const fn data_directory(&self) -> [ImageDataDirectory; PE_NUMBER_OF_DATA_DIRECTORIES] {
        match self {
            OptionalHeader::OptionalHeader32(header) => header.data_directory,
            OptionalHeader::OptionalHeader64(header) => header.data_directory,
        }
    }
}

/// Signature, file header and optional header located at `e_lfanew`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NtHeaders {
    pub signature:       u32,
    pub file_header:     CoffHeader,
    pub optional_header: OptionalHeader,
}
impl NtHeaders {
    /// Returns the size of the headers in bytes.
    /// The section table follows immediately after.
    pub const fn size(&self) -> u64 { 4 + PE_COFF_HEADER_SIZE + self.optional_header.size() }
}

#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct SectionHeader {
    pub name:                   [u8; 8],
    pub virtual_size:           u32,
    pub virtual_address:        u32,
    pub size_of_raw_data:       u32,
    pub pointer_to_raw_data:    u32,
    pub pointer_to_relocations: u32,
    pub pointer_to_linenumbers: u32,
    pub number_of_relocations:  u16,
    pub number_of_linenumbers:  u16,
    pub characteristics:        u32,
}

impl SectionHeader {
    /// Returns the section name up to the first null, without trailing space padding,
    /// or `None` if the name is not valid utf8.
    pub fn name(&self) -> Option<&str> {
        let end = self.name.iter().position(|&c| c == b'\0').unwrap_or(self.name.len());
        let end = self.name[..end].iter().rposition(|&c| c != b' ').map_or(0, |i| i + 1);
        str::from_utf8(&self.name[..end]).ok()
    }

    /// Returns `true` if the raw name starts with the given prefix.
    /// Bytes after the prefix are not interpreted.
    pub fn name_starts_with(&self, prefix: &str) -> bool { self.name.starts_with(prefix.as_bytes()) }
}

#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct ResourceDirectoryTable {
    pub characteristics:        u32,
    pub time_date_stamp:        u32,
    pub major_version:          u16,
    pub minor_version:          u16,
    pub number_of_name_entries: u16,
    pub number_of_id_entries:   u16,
}
impl ResourceDirectoryTable {
    /// Returns the number of entries following the table.
    pub const fn number_of_entries(&self) -> u32 {
        self.number_of_name_entries as u32 + self.number_of_id_entries as u32
    }
}

#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct ResourceDirectoryEntry {
    pub name_offset_or_integer_id:         u32,
    pub data_entry_or_subdirectory_offset: u32,
}

/// Interpretation of the name field of a resource directory entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryName {
    /// Numeric type, id or language.
    Id(u32),
    /// Offset of a length-prefixed utf16 string, relative to the start of the resource section.
    String(u32),
}

/// Interpretation of the offset field of a resource directory entry.
/// Both offsets are relative to the start of the resource section.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryTarget {
    Directory(u32),
    Data(u32),
}

impl ResourceDirectoryEntry {
    pub const fn name(&self) -> EntryName {
        let value = self.name_offset_or_integer_id;
        if value & RESOURCE_HIGH_BIT != 0 {
            EntryName::String(value & !RESOURCE_HIGH_BIT)
        } else {
            EntryName::Id(value)
        }
    }

    pub const fn target(&self) -> EntryTarget {
        let value = self.data_entry_or_subdirectory_offset;
        if value & RESOURCE_HIGH_BIT != 0 {
            EntryTarget::Directory(value & !RESOURCE_HIGH_BIT)
        } else {
            EntryTarget::Data(value)
        }
    }
}

#[repr(C, packed(4))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, FromBytes, IntoBytes, Immutable, Default)]
pub struct ResourceDataEntry {
    pub data_rva: u32,
    pub size:     u32,
    pub codepage: u32,
    pub reserved: u32,
}
