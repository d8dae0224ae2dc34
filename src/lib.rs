//! Resource **extract**or for **p**ortable **e**xecutables.
//!
//! Supports:
//! * Parsing of portable executable headers and section tables
//! * Walking the resource directory tree
//! * Extraction of resource data and string tables, grouped by resource type
//!
//! See [`extract_file`] and [`extract`] for the main entry points, and [`Image`] and [`ResourceDirectory`]
//! for lower-level access to the headers and the resource tree.
//!
//! # Examples
//!
//! ### Resource extraction
//! ```
//! use extractpe::{extract_file, AssetData, ExtractOptions};
//!
//! // read and group all resources, `None` if there is no resource section
//! let groups = extract_file(BINARY_PATH, &ExtractOptions::new())?.unwrap_or_default();
//!
//! for group in &groups {
//!     for asset in group.assets() {
//!         match asset.data() {
//!             AssetData::Text(text) => println!("{} {}: {}", group.type_name(), asset.id(), text),
//!             AssetData::Bytes(data) => println!("{} {}: {} bytes", group.type_name(), asset.id(), data.len()),
//!         }
//!     }
//! }
//! ```
//!
//! ### Resource tree
//! ```
//! use extractpe::{Image, ResourceDirectory};
//!
//! let data = std::fs::read(BINARY_PATH)?;
//!
//! // parse the image headers and locate the resource section
//! let image = Image::parse(&data[..])?;
//! let section = image.resource_section().unwrap();
//!
//! // walk the resource directory without reading resource data
//! let directory = ResourceDirectory::parse(&data[..], section)?;
//! println!("{:?}", directory.types());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]

extern crate alloc;

pub(crate) mod assets;
pub(crate) mod errors;
pub(crate) mod image;
pub(crate) mod names;
pub(crate) mod resource;
pub(crate) mod source;
pub(crate) mod util;

pub mod constants;
pub mod types;

pub use crate::{assets::*, errors::*, image::*, names::*, resource::*, source::*};
