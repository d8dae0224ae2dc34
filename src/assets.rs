//! Extraction of resource data into typed assets.

use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use debug_ignore::DebugIgnore;
use log::{debug, log, Level};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    constants::*, errors::*, image::*, names::*, resource::*, source::ByteSource, util::*,
};

/// Options for extracting resources.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct ExtractOptions {
    verbose:             bool,
    validate_signatures: bool,
}
impl ExtractOptions {
    pub fn new() -> Self { Self::default() }

    /// Log the extraction summary at info instead of debug level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the `MZ` and `PE\0\0` signatures before reading the resource section.
    pub fn validate_signatures(mut self, validate_signatures: bool) -> Self {
        self.validate_signatures = validate_signatures;
        self
    }

    pub fn is_verbose(&self) -> bool { self.verbose }

    pub fn validates_signatures(&self) -> bool { self.validate_signatures }
}

/// Content of an extracted asset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AssetData {
    /// Raw resource data.
    Bytes(DebugIgnore<Vec<u8>>),
    /// String of a string table.
    Text(String),
}
impl AssetData {
    /// Returns the raw data, or `None` for strings.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(data) => Some(data.as_slice()),
            Self::Text(_) => None,
        }
    }

    /// Returns the string, or `None` for raw data.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Bytes(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Resource extracted from the resource directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Asset {
    id:       u32,
    name:     String,
    label:    Option<String>,
    language: u32,
    codepage: u32,
    data:     AssetData,
}
impl Asset {
    /// Returns the id of the asset.
    /// For string tables this is the string id, otherwise the value of the name or id entry.
    pub fn id(&self) -> u32 { self.id }

    /// Returns the resolved name of the resource type.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the string name of the name or id entry, or `None` if it is a numeric id.
    pub fn label(&self) -> Option<&str> { self.label.as_deref() }

    /// Returns the language id of the data entry.
    pub fn language(&self) -> u32 { self.language }

    /// Returns the codepage of the data entry.
    pub fn codepage(&self) -> u32 { self.codepage }

    /// Returns the content of the asset.
    pub fn data(&self) -> &AssetData { &self.data }
}

/// Assets of one resource type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceGroup {
    resource_type: ResourceType,
    assets:        Vec<Asset>,
}
impl ResourceGroup {
    /// Returns the resolved resource type.
    pub fn resource_type(&self) -> &ResourceType { &self.resource_type }

    /// Returns the symbolic name, custom name or numeric code of the resource type.
    pub fn type_name(&self) -> String { self.resource_type.to_string() }

    /// Returns the assets in directory order.
    pub fn assets(&self) -> &[Asset] { &self.assets }
}

/// Decode a string table block with the given id.
/// A block holds 16 length-prefixed utf16 strings, empty slots are skipped but consume an id.
///
/// # Returns
/// The string ids and strings, or an error if the block is too short for its strings.
pub fn decode_string_table(block: &[u8], block_id: u32) -> Result<Vec<(u32, String)>, ReadError> {
    let base_id = block_id.wrapping_sub(1).wrapping_mul(RESOURCE_STRINGS_PER_BLOCK);
    let mut strings = Vec::new();
    let mut offset = 0;
    for index in 0..RESOURCE_STRINGS_PER_BLOCK {
        let (string, length) = read_prefixed_u16_string(&block[offset..]).map_err(|e| {
            ReadError(format!("string table {} truncated at slot {}: {}", block_id, index, e))
        })?;
        offset += length;
        if length > 2 {
            strings.push((base_id.wrapping_add(index), string));
        }
    }
    Ok(strings)
}

fn extract_leaf<S: ByteSource + ?Sized>(
    source: &S, resource_type: &ResourceType, leaf: &ResourceLeaf<'_>,
) -> Result<Vec<Asset>, ExtractError> {
    let data = leaf.data.read(source)?;
    let name = resource_type.to_string();
    let label = leaf.name.name().map(String::from);
    let language = leaf.language.value();
    let codepage = leaf.data.codepage();

    if resource_type.is_string_table() {
        let strings = decode_string_table(&data, leaf.name.value())?;
        Ok(strings
            .into_iter()
            .map(|(id, text)| Asset {
                id,
                name: name.clone(),
                label: label.clone(),
                language,
                codepage,
                data: AssetData::Text(text),
            })
            .collect())
    } else {
        Ok(vec![Asset {
            id: leaf.name.value(),
            name,
            label,
            language,
            codepage,
            data: AssetData::Bytes(data.into()),
        }])
    }
}

impl ResourceDirectory {
    /// Read the data of all resources and group them by type.
    ///
    /// Groups are ordered like the types in the root table, assets by name or id and then language.
    /// With the `parallel` feature, data is read concurrently.
    ///
    /// # Returns
    /// Returns an error if any data could not be read or decoded. No partial results are returned.
    pub fn extract<S: ByteSource + ?Sized>(
        &self, source: &S,
    ) -> Result<Vec<ResourceGroup>, ExtractError> {
        let (types, leaves) = self.leaves();

        #[cfg(feature = "parallel")]
        let assets = leaves
            .par_iter()
            .map(|leaf| extract_leaf(source, &types[leaf.group], leaf))
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let assets = leaves
            .iter()
            .map(|leaf| extract_leaf(source, &types[leaf.group], leaf))
            .collect::<Result<Vec<_>, _>>()?;

        let mut groups = types
            .into_iter()
            .map(|resource_type| ResourceGroup {
                resource_type,
                assets: Vec::new(),
            })
            .collect::<Vec<_>>();
        for (leaf, assets) in leaves.iter().zip(assets) {
            groups[leaf.group].assets.extend(assets);
        }
        Ok(groups)
    }
}

/// Extract all resources of a portable executable image.
///
/// # Returns
/// Returns the resource groups in directory order, `None` if the image has no `.rsrc` section,
/// or an error if the image or any resource could not be read.
pub fn extract<S: ByteSource + ?Sized>(
    source: &S, options: &ExtractOptions,
) -> Result<Option<Vec<ResourceGroup>>, ExtractError> {
    let image = if options.validate_signatures {
        Image::parse_validated(source)?
    } else {
        Image::parse(source)?
    };

    let Some(section) = image.resource_section() else {
        debug!("no resource section found");
        return Ok(None);
    };

    let directory = ResourceDirectory::parse(source, section)?;
    let groups = directory.extract(source)?;

    let level = if options.verbose { Level::Info } else { Level::Debug };
    for group in &groups {
        log!(level, "{}: {} assets", group.resource_type, group.assets.len());
    }
    log!(
        level,
        "extracted {} assets in {} groups",
        groups.iter().map(|group| group.assets.len()).sum::<usize>(),
        groups.len()
    );

    Ok(Some(groups))
}

#[cfg(feature = "std")]
/// Extract all resources of the portable executable image at the given path.
///
/// The file is opened read-only and closed before returning, whether extraction succeeds or fails.
///
/// # Returns
/// See [`extract`]. Also returns an error if the file could not be opened.
pub fn extract_file<P: AsRef<std::path::Path>>(
    path: P, options: &ExtractOptions,
) -> Result<Option<Vec<ResourceGroup>>, ExtractError> {
    let source = crate::source::FileSource::open(path)?;
    debug!("loading {}", source.path().display());
    extract(&source, options)
}
