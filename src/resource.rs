//! Data types for walking the resource section.
//! The resource section contains the resource directory and the resource data.
//! See <https://learn.microsoft.com/en-us/windows/win32/debug/pe-format#the-rsrc-section> for more information.

use alloc::{collections::BTreeSet, vec::Vec};

use log::{trace, warn};

use crate::{constants::*, errors::*, image::*, names::*, source::ByteSource, types::*, util::*};

/// Portable executable resource directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceDirectory {
    pub(crate) section: ResourceSection,
    pub(crate) root:    ResourceTable,
}
impl ResourceDirectory {
    /// Parse the resource directory tree of the given resource section.
    /// Data entries are located but their data is not read, see [`ResourceData::read`].
    /// Every directory table is parsed at most once, further entries referencing it are skipped.
    ///
    /// # Returns
    /// Returns an error if a directory table, entry or name could not be read.
    pub fn parse<S: ByteSource + ?Sized>(
        source: &S, section: ResourceSection,
    ) -> Result<Self, ExtractError> {
        let mut visited = BTreeSet::from([0]);
        let root = ResourceTable::parse(source, section, 0, 0, &mut visited)?;
        Ok(Self { section, root })
    }

    /// Returns the resource section the directory was parsed from.
    pub fn section(&self) -> ResourceSection { self.section }

    /// Returns the root resource table.
    /// The root resource table contains the top-level resource entries.
    pub fn root(&self) -> &ResourceTable { &self.root }
}

/// Portable executable resource table.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ResourceTable {
    pub(crate) data:    ResourceDirectoryTable,
    pub(crate) entries: Vec<(ResourceEntryName, ResourceEntry)>,
}
impl ResourceTable {
    fn parse<S: ByteSource + ?Sized>(
        source: &S, section: ResourceSection, directory_offset: u32, level: usize,
        visited: &mut BTreeSet<u32>,
    ) -> Result<Self, ExtractError> {
        let base_offset = section.base_offset();
        let table_offset = base_offset + directory_offset as u64;
        let resource_table = read_at::<ResourceDirectoryTable, _>(source, table_offset)?;
        trace!("{} {:#x?}", "--".repeat(level + 1), resource_table);

        let mut entries = Vec::with_capacity(resource_table.number_of_entries() as usize);

        let mut entry_offset = table_offset + RESOURCE_DIRECTORY_TABLE_SIZE;
        for _ in 0..resource_table.number_of_entries() {
            let entry = read_at::<ResourceDirectoryEntry, _>(source, entry_offset)?;
            trace!("{} {:#x?}", "--".repeat(level + 1), entry);
            entry_offset += RESOURCE_DIRECTORY_ENTRY_SIZE;

            let name = ResourceEntryName::parse(source, base_offset, entry.name())?;
            let is_leaf_level = level + 1 == RESOURCE_TREE_DEPTH;
            match entry.target() {
                EntryTarget::Directory(offset) if !is_leaf_level && !visited.insert(offset) => {
                    warn!(
                        "{} skipping resource entry {:?} referencing already parsed table {:#x?}",
                        "--".repeat(level + 1),
                        name,
                        offset
                    );
                }
                EntryTarget::Directory(offset) if !is_leaf_level => {
                    let table = ResourceTable::parse(source, section, offset, level + 1, visited)?;
                    entries.push((name, ResourceEntry::Table(table)));
                }
                EntryTarget::Data(offset) if is_leaf_level => {
                    let data_offset = base_offset + offset as u64;
                    let data = read_at::<ResourceDataEntry, _>(source, data_offset)?;
                    let address = section.file_offset(data.data_rva)?;
                    trace!("{} {:#x?} {:#x?}", "--".repeat(level + 1), address, data);
                    entries.push((name, ResourceEntry::Data(ResourceData { entry: data, address })));
                }
                target => {
                    warn!(
                        "{} skipping resource entry {:?} with unexpected target {:#x?} at level {}",
                        "--".repeat(level + 1),
                        name,
                        target,
                        level
                    );
                }
            }
        }
        Ok(Self {
            data: resource_table,
            entries,
        })
    }

    /// Returns the directory table header.
    pub fn header(&self) -> &ResourceDirectoryTable { &self.data }

    /// Get a resource entry from the table.
    /// # Returns
    /// The first resource entry with the given name.
    pub fn get(&self, name: &ResourceEntryName) -> Option<&ResourceEntry> {
        self.entries.iter().find(|(entry_name, _)| entry_name == name).map(|(_, entry)| entry)
    }

    /// Returns the entries in the table in directory order.
    pub fn entries(&self) -> impl Iterator<Item = (&ResourceEntryName, &ResourceEntry)> {
        self.entries.iter().map(|(name, entry)| (name, entry))
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Located resource data.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResourceData {
    entry:   ResourceDataEntry,
    address: u64,
}
impl ResourceData {
    /// Returns the raw data entry.
    pub fn entry(&self) -> &ResourceDataEntry { &self.entry }

    /// Returns the file offset of the data.
    pub fn address(&self) -> u64 { self.address }

    /// Returns the size of the data in bytes.
    pub fn size(&self) -> u32 { self.entry.size }

    /// Returns the codepage of the data.
    pub fn codepage(&self) -> u32 { self.entry.codepage }

    /// Read the raw data from the source.
    pub fn read<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Vec<u8>, ExtractError> {
        trace!("reading {} bytes at {:#x?}", self.size(), self.address);
        source.read_vec(self.address, self.size() as u64)
    }
}

/// Resource entry in a resource table.
/// This can be either a child table or located data.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ResourceEntry {
    Table(ResourceTable),
    Data(ResourceData),
}
impl ResourceEntry {
    /// Returns the child table, or `None` for data.
    pub fn table(&self) -> Option<&ResourceTable> {
        match self {
            ResourceEntry::Table(table) => Some(table),
            ResourceEntry::Data(_) => None,
        }
    }

    /// Returns the located data, or `None` for tables.
    pub fn data(&self) -> Option<&ResourceData> {
        match self {
            ResourceEntry::Table(_) => None,
            ResourceEntry::Data(data) => Some(data),
        }
    }
}

/// Flattened path to a resource data entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResourceLeaf<'a> {
    pub(crate) group:    usize,
    pub(crate) name:     &'a ResourceEntryName,
    pub(crate) language: &'a ResourceEntryName,
    pub(crate) data:     &'a ResourceData,
}

impl ResourceDirectory {
    /// Flatten the tree into resource types and their data entries in directory order.
    /// Leaves reference the index of their type.
    pub(crate) fn leaves(&self) -> (Vec<ResourceType>, Vec<ResourceLeaf<'_>>) {
        let mut types = Vec::with_capacity(self.root.len());
        let mut leaves = Vec::new();
        for (type_name, type_entry) in self.root.entries() {
            let Some(names) = type_entry.table() else {
                continue;
            };
            let group = types.len();
            types.push(ResourceType::from(type_name));
            for (name, name_entry) in names.entries() {
                let Some(languages) = name_entry.table() else {
                    continue;
                };
                for (language, language_entry) in languages.entries() {
                    if let Some(data) = language_entry.data() {
                        leaves.push(ResourceLeaf {
                            group,
                            name,
                            language,
                            data,
                        });
                    }
                }
            }
        }
        (types, leaves)
    }

    /// Returns the resolved names of all resource types in directory order.
    pub fn types(&self) -> Vec<ResourceType> {
        self.root.entries().map(|(name, _)| ResourceType::from(name)).collect()
    }
}
