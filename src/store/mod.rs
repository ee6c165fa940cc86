// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for mappings and the reading shelf.
//!
//! Both stores are plain folders of JSON documents written via atomic
//! temp-file renames. The mapping store is authoritative and strict; the
//! shelf store is client-local and fails open on damaged documents.

pub mod mapping_store;
pub mod shelf_folder;
mod write;

pub use mapping_store::{LookupOutcome, MappingStore};
pub use shelf_folder::ShelfFolder;
pub use write::{StoreError, WriteDurability};
