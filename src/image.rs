//! Portable executable image headers.
//!
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format> for more information.

use alloc::{format, vec::Vec};

use ahash::RandomState;
use indexmap::IndexMap;
use log::{debug, trace};

use crate::{constants::*, errors::*, source::ByteSource, types::*, util::*};

/// Image data directory type enumeration.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DataDirectoryType {
    ExportTable,
    ImportTable,
    ResourceTable,
    ExceptionTable,
    CertificateTable,
    BaseRelocationTable,
    Debug,
    Architecture,
    GlobalPtr,
    TLSTable,
    LoadConfigTable,
    BoundImport,
    IAT,
    DelayImportDescriptor,
    CLRRuntimeHeader,
    Reserved,
}

/// Location of the resource section in the image.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ResourceSection {
    pointer_to_raw_data: u32,
    virtual_address:     u32,
}
impl ResourceSection {
    pub fn new(pointer_to_raw_data: u32, virtual_address: u32) -> Self {
        Self {
            pointer_to_raw_data,
            virtual_address,
        }
    }

    /// Returns the file offset of the section data.
    /// All offsets inside the resource directory are relative to it.
    pub fn base_offset(&self) -> u64 { self.pointer_to_raw_data as u64 }

    /// Returns the virtual address of the section.
    pub fn virtual_address(&self) -> u32 { self.virtual_address }

    /// Returns the delta between virtual addresses and file offsets in the section.
    pub fn diff(&self) -> i64 { self.virtual_address as i64 - self.pointer_to_raw_data as i64 }

    /// Translate a relative virtual address inside the section to a file offset.
    ///
    /// # Returns
    /// Returns an error if the address translates to a negative offset.
    pub fn file_offset(&self, rva: u32) -> Result<u64, ExtractError> {
        let offset = rva as i64 - self.diff();
        u64::try_from(offset).map_err(|_| ExtractError::InvalidAddress {
            rva,
            diff: self.diff(),
        })
    }
}

/// Decoded headers of a portable executable image.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Image {
    pub(crate) dos_header:            DosHeader,
    pub(crate) nt_headers:            NtHeaders,
    pub(crate) header_data_directory: IndexMap<DataDirectoryType, ImageDataDirectory, RandomState>,
    pub(crate) section_table:         Vec<SectionHeader>,
}

impl Image {
    /// Parse the headers of a portable executable image.
    ///
    /// Signatures are not validated, a source that is not a portable executable produces meaningless
    /// headers or fails with a read error. See [`Image::parse_validated`].
    ///
    /// # Returns
    /// Returns the `Image`, or an error if the headers could not be read.
    pub fn parse<S: ByteSource + ?Sized>(source: &S) -> Result<Self, ExtractError> {
        Self::parse_with(source, false)
    }

    /// Parse the headers of a portable executable image, checking the `MZ` and `PE\0\0` signatures.
    ///
    /// # Returns
    /// Returns the `Image`, or [`ExtractError::NotPortableExecutable`] if a signature does not match.
    pub fn parse_validated<S: ByteSource + ?Sized>(source: &S) -> Result<Self, ExtractError> {
        Self::parse_with(source, true)
    }

    fn parse_with<S: ByteSource + ?Sized>(
        source: &S, validate_signatures: bool,
    ) -> Result<Self, ExtractError> {
        let dos_header = read_at::<DosHeader, _>(source, 0)?;
        debug!("{:#x?}", dos_header);
        if validate_signatures && dos_header.e_magic != PE_DOS_MAGIC {
            return Err(ExtractError::NotPortableExecutable(format!(
                "no dos magic: {:#x?}",
                { dos_header.e_magic }
            )));
        }

        let nt_headers_offset = dos_header.e_lfanew as u64;
        let signature = read_at::<u32, _>(source, nt_headers_offset)?;
        debug!("pe_signature: {:#x?}", signature);
        if validate_signatures && signature != PE_NT_SIGNATURE {
            return Err(ExtractError::NotPortableExecutable(format!(
                "no pe signature: {:#x?}",
                signature
            )));
        }

        let file_header_offset = nt_headers_offset + 4;
        let file_header = read_at::<CoffHeader, _>(source, file_header_offset)?;
        debug!("{:#x?}: {:#x?}", file_header_offset, file_header);

        let optional_header_offset = file_header_offset + PE_COFF_HEADER_SIZE;
        let magic = read_at::<u16, _>(source, optional_header_offset)?;
        let optional_header = if magic == PE_64_MAGIC {
            OptionalHeader::OptionalHeader64(read_at(source, optional_header_offset)?)
        } else {
            OptionalHeader::OptionalHeader32(read_at(source, optional_header_offset)?)
        };
        debug!("{:#x?}: {:#x?}", optional_header_offset, optional_header);

        let nt_headers = NtHeaders {
            signature,
            file_header,
            optional_header,
        };

        let mut header_data_directory =
            IndexMap::<DataDirectoryType, ImageDataDirectory, _>::with_hasher(RandomState::new());
        use DataDirectoryType::*;
        for (index, (&header, data)) in [
            ExportTable,
            ImportTable,
            ResourceTable,
            ExceptionTable,
            CertificateTable,
            BaseRelocationTable,
            Debug,
            Architecture,
            GlobalPtr,
            TLSTable,
            LoadConfigTable,
            BoundImport,
            IAT,
            DelayImportDescriptor,
            CLRRuntimeHeader,
            Reserved,
        ]
        .iter()
        .zip(optional_header.data_directory())
        .enumerate()
        {
            if (index as u32) < optional_header.number_of_rva_and_sizes() {
                trace!("{:?}: {:#x?}", header, data);
                header_data_directory.insert(header, data);
            }
        }

        let section_table_offset = nt_headers_offset + nt_headers.size();
        let mut section_table = Vec::with_capacity(file_header.number_of_sections as usize);
        for index in 0..file_header.number_of_sections as u64 {
            let section_header_offset = section_table_offset + index * PE_SECTION_HEADER_SIZE;
            let section_header = read_at::<SectionHeader, _>(source, section_header_offset)?;
            debug!(
                "{:#x?}: {}: {:#x?}",
                section_header_offset,
                section_header.name().unwrap_or("?"),
                section_header
            );
            section_table.push(section_header);
        }

        Ok(Self {
            dos_header,
            nt_headers,
            header_data_directory,
            section_table,
        })
    }

    /// Locate the resource section by its `.rsrc` name prefix.
    /// Padding and any bytes after the prefix are ignored, so `.rsrc\0\xff` and `.rsrc$01` match.
    /// If multiple sections match, the last one is used.
    ///
    /// # Returns
    /// Returns `None` if the image has no resource section.
    pub fn resource_section(&self) -> Option<ResourceSection> {
        let section = self
            .section_table
            .iter()
            .rev()
            .find(|section| section.name_starts_with(RESOURCE_SECTION_NAME))?;
        debug!(
            "found resource section at {:#x?} (virtual address {:#x?})",
            { section.pointer_to_raw_data },
            { section.virtual_address }
        );
        Some(ResourceSection::new(section.pointer_to_raw_data, section.virtual_address))
    }

    /// Returns the parsed dos header.
    pub fn dos_header(&self) -> &DosHeader { &self.dos_header }

    /// Returns the parsed signature, file header and optional header.
    pub fn nt_headers(&self) -> &NtHeaders { &self.nt_headers }

    /// Returns the parsed coff header.
    pub fn coff_header(&self) -> &CoffHeader { &self.nt_headers.file_header }

    /// Returns the parsed optional header.
    pub fn optional_header(&self) -> &OptionalHeader { &self.nt_headers.optional_header }

    /// Returns the data directory for the requested header.
    pub fn data_directory(&self, directory: DataDirectoryType) -> Option<&ImageDataDirectory> {
        self.header_data_directory.get(&directory)
    }

    /// Returns all data directories existing in the image.
    pub fn data_directories(&self) -> Vec<DataDirectoryType> {
        self.header_data_directory.keys().copied().collect::<Vec<_>>()
    }

    /// Returns the section header for the section at the index.
    pub fn section_header<Index: Into<usize>>(&self, index: Index) -> Option<&SectionHeader> {
        self.section_table.get(index.into())
    }

    /// Returns all section tables existing in the image.
    pub fn section_table(&self) -> &Vec<SectionHeader> { &self.section_table }
}
