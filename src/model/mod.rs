// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Slugs and mappings are the service-side vocabulary; the comic/chapter
//! shapes mirror the upstream catalog the client renders.

pub mod comic;
pub mod ids;
pub mod mapping;

pub use comic::{
    Chapter, ChapterListing, ChapterNavigation, Comic, ComicCard, ComicStatus, ComicType, Genre,
};
pub use ids::{Slug, SlugError};
pub use mapping::{Mapping, MappingKind, ParseMappingKindError};
