// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The local reading shelf: progress, history, bookmarks and reader settings.
//!
//! Everything here is per-device and single-writer. The shelf owns the
//! dedup/eviction rules; persistence lives in [`crate::store::ShelfFolder`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ComicCard, Slug};

/// Both the progress list and the history list keep at most this many comics,
/// most recently read first.
pub const SHELF_CAP: usize = 50;

/// Per-comic reading position.
///
/// Replaced wholesale on every update except `read_chapters`, which
/// accumulates every chapter the reader has opened for this comic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingProgress {
    pub comic_slug: Slug,
    pub chapter_slug: Slug,
    pub chapter_title: String,
    pub percent: u8,
    pub last_read: DateTime<Utc>,
    pub total_chapters: u32,
    pub read_chapters: BTreeSet<Slug>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub comic: ComicCard,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub comic: ComicCard,
    pub chapter: ChapterRef,
    pub read_at: DateTime<Utc>,
    pub percent: u8,
}

/// The chapter slice a history row needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRef {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    Medium,
    #[default]
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Reader preferences; unknown or missing fields load as the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub mode: ReaderMode,
    pub quality: ImageQuality,
    pub auto_next: bool,
    pub show_progress: bool,
    pub theme: Theme,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            mode: ReaderMode::default(),
            quality: ImageQuality::default(),
            auto_next: true,
            show_progress: true,
            theme: Theme::default(),
        }
    }
}

fn clamp_percent(percent: u8) -> u8 {
    percent.min(100)
}

/// The in-memory shelf. Lists are ordered most-recent-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shelf {
    progress: Vec<ReadingProgress>,
    bookmarks: Vec<Bookmark>,
    history: Vec<HistoryItem>,
    settings: ReaderSettings,
}

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> &[ReadingProgress] {
        &self.progress
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ReaderSettings) {
        self.settings = settings;
    }

    /// Records a read position for a comic.
    ///
    /// The previous record for the comic is replaced wholesale, but its
    /// `read_chapters` set carries over and gains the current chapter. The
    /// updated record moves to the front and the list is capped at
    /// [`SHELF_CAP`].
    pub fn record_progress(
        &mut self,
        comic_slug: Slug,
        chapter_slug: Slug,
        chapter_title: impl Into<String>,
        percent: u8,
        total_chapters: u32,
        at: DateTime<Utc>,
    ) {
        let mut read_chapters = match self
            .progress
            .iter()
            .position(|p| p.comic_slug == comic_slug)
        {
            Some(index) => self.progress.remove(index).read_chapters,
            None => BTreeSet::new(),
        };
        read_chapters.insert(chapter_slug.clone());

        self.progress.insert(
            0,
            ReadingProgress {
                comic_slug,
                chapter_slug,
                chapter_title: chapter_title.into(),
                percent: clamp_percent(percent),
                last_read: at,
                total_chapters,
                read_chapters,
            },
        );
        self.progress.truncate(SHELF_CAP);
    }

    pub fn progress_for(&self, comic_slug: &str) -> Option<&ReadingProgress> {
        self.progress
            .iter()
            .find(|p| p.comic_slug.as_str() == comic_slug)
    }

    /// Drops the progress record for one comic, or every record when `None`.
    pub fn clear_progress(&mut self, comic_slug: Option<&str>) {
        match comic_slug {
            Some(slug) => self.progress.retain(|p| p.comic_slug.as_str() != slug),
            None => self.progress.clear(),
        }
    }

    /// Adds the comic to the bookmarks, or removes it when already present.
    pub fn toggle_bookmark(&mut self, comic: ComicCard, at: DateTime<Utc>) -> BookmarkToggle {
        match self
            .bookmarks
            .iter()
            .position(|b| b.comic.slug == comic.slug)
        {
            Some(index) => {
                self.bookmarks.remove(index);
                BookmarkToggle::Removed
            }
            None => {
                self.bookmarks.push(Bookmark {
                    comic,
                    added_at: at,
                });
                BookmarkToggle::Added
            }
        }
    }

    pub fn is_bookmarked(&self, comic_slug: &str) -> bool {
        self.bookmarks
            .iter()
            .any(|b| b.comic.slug.as_str() == comic_slug)
    }

    /// Prepends a history entry, first removing any live entry for the same
    /// comic, then caps the list at [`SHELF_CAP`].
    pub fn record_history(
        &mut self,
        comic: ComicCard,
        chapter: ChapterRef,
        percent: u8,
        at: DateTime<Utc>,
    ) {
        self.history.retain(|h| h.comic.slug != comic.slug);
        self.history.insert(
            0,
            HistoryItem {
                comic,
                chapter,
                read_at: at,
                percent: clamp_percent(percent),
            },
        );
        self.history.truncate(SHELF_CAP);
    }

    pub fn remove_history(&mut self, comic_slug: &str) {
        self.history.retain(|h| h.comic.slug.as_str() != comic_slug);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Resets the whole shelf, settings included.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn restore(
        progress: Vec<ReadingProgress>,
        bookmarks: Vec<Bookmark>,
        history: Vec<HistoryItem>,
        settings: ReaderSettings,
    ) -> Self {
        Self {
            progress,
            bookmarks,
            history,
            settings,
        }
    }
}
