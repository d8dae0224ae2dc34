//! Windows API and binary constants.

#![allow(non_upper_case_globals)]

pub type DWORD = u32;
pub type WORD = u16;
pub type LANGID = WORD;


// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-lcid/a9eac961-e77d-41a6-90a5-ce1a8b0cdb9c
pub const LANGUAGE_ID_EN_US: LANGID = 1033; // 0x0409, en-US
// https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-ucoderef/28fefe92-d66c-4b03-90a9-97b473223d43
pub const CODE_PAGE_ID_EN_US: LANGID = 1200; // 0x04B0, UTF-16LE


// https://docs.microsoft.com/en-us/windows/win32/debug/pe-format

pub const PE_DOS_MAGIC: WORD = 0x5a4d; // MZ
pub const PE_NT_SIGNATURE: DWORD = 0x00004550; // PE00
pub const PE_32_MAGIC: WORD = 0x010b;
pub const PE_64_MAGIC: WORD = 0x020b;

pub const PE_DOS_HEADER_SIZE: u64 = 64;
pub const PE_COFF_HEADER_SIZE: u64 = 20;
pub const PE_32_OPTIONAL_HEADER_SIZE: u64 = 224;
pub const PE_64_OPTIONAL_HEADER_SIZE: u64 = 240;
pub const PE_SECTION_HEADER_SIZE: u64 = 40;
pub const PE_NUMBER_OF_DATA_DIRECTORIES: usize = 16;

pub const RESOURCE_SECTION_NAME: &str = ".rsrc";


// https://learn.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section

pub const RESOURCE_DIRECTORY_TABLE_SIZE: u64 = 16;
pub const RESOURCE_DIRECTORY_ENTRY_SIZE: u64 = 8;
pub const RESOURCE_DATA_ENTRY_SIZE: u64 = 16;
/// Set on a directory entry name that is an offset to a string, and on an entry target that is an offset to a subdirectory.
pub const RESOURCE_HIGH_BIT: DWORD = 0x80000000;
/// Levels of the conventional resource tree: type, name or id, language.
pub const RESOURCE_TREE_DEPTH: usize = 3;
pub const RESOURCE_STRINGS_PER_BLOCK: u32 = 16;


// https://docs.microsoft.com/en-us/windows/win32/menurc/resource-types

pub const RT_CURSOR: WORD = 0x01;
pub const RT_BITMAP: WORD = 0x02;
pub const RT_ICON: WORD = 0x03;
pub const RT_MENU: WORD = 0x04;
pub const RT_DIALOG: WORD = 0x05;
pub const RT_STRING: WORD = 0x06;
pub const RT_FONTDIR: WORD = 0x07;
pub const RT_FONT: WORD = 0x08;
pub const RT_ACCELERATOR: WORD = 0x09;
pub const RT_RCDATA: WORD = 0x0A;
pub const RT_MESSAGETABLE: WORD = 0x0B;
pub const RT_GROUP_CURSOR: WORD = 0x0C;
pub const RT_GROUP_ICON: WORD = 0x0E;
pub const RT_VERSION: WORD = 0x10;
pub const RT_DLGINCLUDE: WORD = 0x11;
pub const RT_PLUGPLAY: WORD = 0x13;
pub const RT_VXD: WORD = 0x14;
pub const RT_ANICURSOR: WORD = 0x15;
pub const RT_ANIICON: WORD = 0x16;
pub const RT_HTML: WORD = 0x17;
pub const RT_MANIFEST: WORD = 0x18;
