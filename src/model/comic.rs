// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog shapes scraped from the upstream comic API.
//!
//! These mirror what the upstream endpoints return; every field except the
//! slug is best-effort (`default`) because the scraper output drifts.

use serde::{Deserialize, Serialize};

use super::ids::Slug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComicType {
    Manga,
    Manhwa,
    Manhua,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComicStatus {
    Completed,
    #[default]
    #[serde(other)]
    Ongoing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub title: String,
}

/// Full comic detail as served by the upstream `detail/{slug}` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comic {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "type")]
    pub comic_type: ComicType,
    #[serde(default)]
    pub status: ComicStatus,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub chapters: Vec<ChapterListing>,
    #[serde(
        default,
        rename = "latestChapter",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_chapter: Option<String>,
}

/// One row of a comic's chapter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterListing {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Full chapter payload from the upstream `chapter/{slug}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub navigation: ChapterNavigation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterNavigation {
    #[serde(default)]
    pub prev: Option<Slug>,
    #[serde(default)]
    pub next: Option<Slug>,
}

/// The subset of a comic that shelf records persist and list views render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicCard {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "type")]
    pub comic_type: ComicType,
    #[serde(default)]
    pub status: ComicStatus,
    #[serde(default)]
    pub rating: String,
}

impl From<&Comic> for ComicCard {
    fn from(comic: &Comic) -> Self {
        Self {
            slug: comic.slug.clone(),
            title: comic.title.clone(),
            image: comic.image.clone(),
            comic_type: comic.comic_type,
            status: comic.status,
            rating: comic.rating.clone(),
        }
    }
}
