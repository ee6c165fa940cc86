// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ComicCard, Slug};
use crate::shelf::{
    Bookmark, ChapterRef, HistoryItem, ReaderSettings, ReadingProgress, Shelf, SHELF_CAP,
};

use super::write::{remove_if_exists, write_atomic, StoreError, WriteDurability};

const PROGRESS_FILENAME: &str = "progress.json";
const BOOKMARKS_FILENAME: &str = "bookmarks.json";
const HISTORY_FILENAME: &str = "history.json";
const SETTINGS_FILENAME: &str = "settings.json";

/// Persists the reading shelf as one JSON document per collection.
///
/// Reads are fail-open: a missing, unreadable or unparsable document loads as
/// the empty collection (or default settings) so a damaged shelf never takes
/// the reader down. Writes are atomic and surface their errors.
#[derive(Debug, Clone)]
pub struct ShelfFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl ShelfFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn progress_path(&self) -> PathBuf {
        self.root.join(PROGRESS_FILENAME)
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.root.join(BOOKMARKS_FILENAME)
    }

    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILENAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILENAME)
    }

    /// Loads the whole shelf, never failing. Invariants are re-imposed on the
    /// way in: one record per comic, caps enforced, percent clamped.
    pub fn load_shelf(&self) -> Shelf {
        let progress = self
            .load_doc::<Vec<ProgressJson>>(&self.progress_path())
            .unwrap_or_default();
        let bookmarks = self
            .load_doc::<Vec<BookmarkJson>>(&self.bookmarks_path())
            .unwrap_or_default();
        let history = self
            .load_doc::<Vec<HistoryJson>>(&self.history_path())
            .unwrap_or_default();
        let settings = self
            .load_doc::<ReaderSettings>(&self.settings_path())
            .unwrap_or_default();

        let mut seen = BTreeSet::new();
        let mut progress: Vec<ReadingProgress> = progress
            .into_iter()
            .filter_map(|record| progress_from_json(record, &self.progress_path()))
            .filter(|record| seen.insert(record.comic_slug.clone()))
            .collect();
        progress.truncate(SHELF_CAP);

        let mut seen = BTreeSet::new();
        let bookmarks: Vec<Bookmark> = bookmarks
            .into_iter()
            .map(bookmark_from_json)
            .filter(|record| seen.insert(record.comic.slug.clone()))
            .collect();

        let mut seen = BTreeSet::new();
        let mut history: Vec<HistoryItem> = history
            .into_iter()
            .map(history_from_json)
            .filter(|record| seen.insert(record.comic.slug.clone()))
            .collect();
        history.truncate(SHELF_CAP);

        Shelf::restore(progress, bookmarks, history, settings)
    }

    pub fn save_shelf(&self, shelf: &Shelf) -> Result<(), StoreError> {
        self.save_doc(
            &self.progress_path(),
            &shelf.progress().iter().map(progress_to_json).collect::<Vec<_>>(),
        )?;
        self.save_doc(
            &self.bookmarks_path(),
            &shelf.bookmarks().iter().map(bookmark_to_json).collect::<Vec<_>>(),
        )?;
        self.save_doc(
            &self.history_path(),
            &shelf.history().iter().map(history_to_json).collect::<Vec<_>>(),
        )?;
        self.save_doc(&self.settings_path(), shelf.settings())
    }

    /// Removes every shelf document.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.progress_path())?;
        remove_if_exists(&self.bookmarks_path())?;
        remove_if_exists(&self.history_path())?;
        remove_if_exists(&self.settings_path())
    }

    fn load_doc<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let doc_str = match fs::read_to_string(path) {
            Ok(doc_str) => doc_str,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("shelf: cannot read {path:?}, starting empty: {err}");
                return None;
            }
        };

        match serde_json::from_str(&doc_str) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!("shelf: cannot parse {path:?}, starting empty: {err}");
                None
            }
        }
    }

    fn save_doc<T: Serialize>(&self, path: &Path, doc: &T) -> Result<(), StoreError> {
        let doc_str = serde_json::to_string_pretty(doc).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(
            &self.root,
            path,
            format!("{doc_str}\n").as_bytes(),
            self.durability,
        )
    }
}

// Wire shapes match what the web client wrote to localStorage, so an existing
// shelf carries over untouched.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressJson {
    comic_slug: String,
    chapter_slug: String,
    #[serde(default)]
    chapter_title: String,
    #[serde(default)]
    progress: u32,
    last_read: DateTime<Utc>,
    #[serde(default)]
    total_chapters: u32,
    #[serde(default)]
    read_chapters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkJson {
    comic: ComicCard,
    added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryJson {
    comic: ComicCard,
    chapter: ChapterRef,
    read_at: DateTime<Utc>,
    #[serde(default)]
    progress: u32,
}

fn clamp_wire_percent(progress: u32) -> u8 {
    progress.min(100) as u8
}

fn progress_from_json(record: ProgressJson, path: &Path) -> Option<ReadingProgress> {
    let comic_slug = match Slug::new(record.comic_slug) {
        Ok(slug) => slug,
        Err(err) => {
            warn!("shelf: dropping progress record with bad comic slug in {path:?}: {err}");
            return None;
        }
    };
    let chapter_slug = match Slug::new(record.chapter_slug) {
        Ok(slug) => slug,
        Err(err) => {
            warn!("shelf: dropping progress record with bad chapter slug in {path:?}: {err}");
            return None;
        }
    };

    Some(ReadingProgress {
        comic_slug,
        chapter_slug,
        chapter_title: record.chapter_title,
        percent: clamp_wire_percent(record.progress),
        last_read: record.last_read,
        total_chapters: record.total_chapters,
        read_chapters: record
            .read_chapters
            .into_iter()
            .filter_map(|raw| Slug::new(raw).ok())
            .collect(),
    })
}

fn progress_to_json(record: &ReadingProgress) -> ProgressJson {
    ProgressJson {
        comic_slug: record.comic_slug.to_string(),
        chapter_slug: record.chapter_slug.to_string(),
        chapter_title: record.chapter_title.clone(),
        progress: u32::from(record.percent),
        last_read: record.last_read,
        total_chapters: record.total_chapters,
        read_chapters: record.read_chapters.iter().map(ToString::to_string).collect(),
    }
}

fn bookmark_from_json(record: BookmarkJson) -> Bookmark {
    Bookmark {
        comic: record.comic,
        added_at: record.added_at,
    }
}

fn bookmark_to_json(record: &Bookmark) -> BookmarkJson {
    BookmarkJson {
        comic: record.comic.clone(),
        added_at: record.added_at,
    }
}

fn history_from_json(record: HistoryJson) -> HistoryItem {
    HistoryItem {
        comic: record.comic,
        chapter: record.chapter,
        read_at: record.read_at,
        percent: clamp_wire_percent(record.progress),
    }
}

fn history_to_json(record: &HistoryItem) -> HistoryJson {
    HistoryJson {
        comic: record.comic.clone(),
        chapter: record.chapter.clone(),
        read_at: record.read_at,
        progress: u32::from(record.percent),
    }
}

#[cfg(test)]
mod tests;
