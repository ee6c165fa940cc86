// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::ShelfFolder;
use crate::model::{ComicCard, ComicStatus, ComicType, Slug};
use crate::shelf::{ChapterRef, ReaderMode, Shelf};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("lembar-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct ShelfFolderTestCtx {
    tmp: TempDir,
    folder: ShelfFolder,
}

impl ShelfFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let folder = ShelfFolder::new(tmp.path().join("shelf"));
        Self { tmp, folder }
    }
}

#[fixture]
fn ctx() -> ShelfFolderTestCtx {
    ShelfFolderTestCtx::new("shelf-folder")
}

fn card(slug: &str) -> ComicCard {
    ComicCard {
        slug: Slug::new(slug).unwrap(),
        title: slug.to_owned(),
        image: String::new(),
        comic_type: ComicType::Manhwa,
        status: ComicStatus::Completed,
        rating: String::new(),
    }
}

fn populated_shelf() -> Shelf {
    let at = Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap();
    let mut shelf = Shelf::new();
    shelf.record_progress(
        Slug::new("one-piece").unwrap(),
        Slug::new("one-piece-chapter-1").unwrap(),
        "Chapter 1",
        75,
        1100,
        at,
    );
    shelf.toggle_bookmark(card("one-piece"), at);
    shelf.record_history(
        card("one-piece"),
        ChapterRef {
            slug: Slug::new("one-piece-chapter-1").unwrap(),
            title: "Chapter 1".to_owned(),
        },
        75,
        at,
    );
    let mut settings = shelf.settings().clone();
    settings.mode = ReaderMode::Horizontal;
    shelf.set_settings(settings);
    shelf
}

#[rstest]
fn shelf_roundtrips(ctx: ShelfFolderTestCtx) {
    let shelf = populated_shelf();
    ctx.folder.save_shelf(&shelf).unwrap();

    let loaded = ctx.folder.load_shelf();
    assert_eq!(loaded, shelf);
}

#[rstest]
fn missing_documents_load_as_empty_shelf(ctx: ShelfFolderTestCtx) {
    let loaded = ctx.folder.load_shelf();
    assert_eq!(loaded, Shelf::new());
}

#[rstest]
fn corrupt_documents_load_as_empty_collections(ctx: ShelfFolderTestCtx) {
    ctx.folder.save_shelf(&populated_shelf()).unwrap();
    std::fs::write(ctx.folder.history_path(), "{oops").unwrap();
    std::fs::write(ctx.folder.settings_path(), "[]").unwrap();

    let loaded = ctx.folder.load_shelf();
    assert!(loaded.history().is_empty());
    assert_eq!(loaded.settings(), &crate::shelf::ReaderSettings::default());
    // Undamaged documents still load.
    assert!(loaded.is_bookmarked("one-piece"));
    assert!(loaded.progress_for("one-piece").is_some());
}

#[rstest]
fn documents_use_the_client_wire_shape(ctx: ShelfFolderTestCtx) {
    ctx.folder.save_shelf(&populated_shelf()).unwrap();

    let doc_str = std::fs::read_to_string(ctx.folder.progress_path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&doc_str).unwrap();
    assert_eq!(doc[0]["comicSlug"], "one-piece");
    assert_eq!(doc[0]["progress"], 75);
    assert!(doc[0]["readChapters"].is_array());

    let doc_str = std::fs::read_to_string(ctx.folder.history_path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&doc_str).unwrap();
    assert_eq!(doc[0]["comic"]["slug"], "one-piece");
    assert_eq!(doc[0]["comic"]["type"], "manhwa");
}

#[rstest]
fn load_drops_records_with_invalid_slugs_and_duplicates(ctx: ShelfFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.root()).unwrap();
    std::fs::write(
        ctx.folder.progress_path(),
        r#"[
            {"comicSlug":"one-piece","chapterSlug":"one-piece-chapter-2","progress":240,
             "lastRead":"2026-02-14T09:30:00Z","totalChapters":1100,"readChapters":[]},
            {"comicSlug":"","chapterSlug":"x","progress":10,
             "lastRead":"2026-02-14T09:30:00Z","totalChapters":1,"readChapters":[]},
            {"comicSlug":"one-piece","chapterSlug":"one-piece-chapter-1","progress":10,
             "lastRead":"2026-02-13T09:30:00Z","totalChapters":1100,"readChapters":[]}
        ]"#,
    )
    .unwrap();

    let loaded = ctx.folder.load_shelf();
    assert_eq!(loaded.progress().len(), 1);
    let record = loaded.progress_for("one-piece").unwrap();
    // First entry wins; out-of-range percent is clamped.
    assert_eq!(record.chapter_slug.as_str(), "one-piece-chapter-2");
    assert_eq!(record.percent, 100);
}

#[rstest]
fn bookmarks_with_unseen_scraper_values_still_load(ctx: ShelfFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.root()).unwrap();
    std::fs::write(
        ctx.folder.bookmarks_path(),
        r#"[{
            "comic": {"slug": "one-piece", "title": "One Piece",
                      "type": "webtoon", "status": "hiatus"},
            "addedAt": "2026-02-14T09:30:00Z"
        }]"#,
    )
    .unwrap();

    let loaded = ctx.folder.load_shelf();
    assert!(loaded.is_bookmarked("one-piece"));
    let bookmark = &loaded.bookmarks()[0];
    assert_eq!(bookmark.comic.comic_type, ComicType::Other);
    assert_eq!(bookmark.comic.status, ComicStatus::Ongoing);
}

#[rstest]
fn clear_all_removes_every_document(ctx: ShelfFolderTestCtx) {
    ctx.folder.save_shelf(&populated_shelf()).unwrap();
    ctx.folder.clear_all().unwrap();

    assert!(!ctx.folder.progress_path().exists());
    assert!(!ctx.folder.bookmarks_path().exists());
    assert!(!ctx.folder.history_path().exists());
    assert!(!ctx.folder.settings_path().exists());
    assert_eq!(ctx.folder.load_shelf(), Shelf::new());

    // Clearing an already-empty shelf folder is fine.
    ctx.folder.clear_all().unwrap();
}
