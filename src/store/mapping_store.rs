// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Mapping, MappingKind, Slug};

use super::write::{write_atomic, StoreError, WriteDurability};

const MAPPINGS_FILENAME: &str = "mappings.json";

/// Outcome of [`MappingStore::lookup_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOutcome {
    pub uuid: Uuid,
    pub created: bool,
}

/// Folder-backed store for slug-to-UUID mappings.
///
/// All mappings live in one JSON document (`mappings.json`) loaded into memory
/// with two indexes: by uuid and by `(slug, kind)`. The `(slug, kind)` index is
/// authoritative, so a pair can never map to two UUIDs; callers serialize
/// mutations (the HTTP service holds the store behind a mutex).
#[derive(Debug, Clone)]
pub struct MappingStore {
    root: PathBuf,
    durability: WriteDurability,
    by_uuid: BTreeMap<Uuid, Mapping>,
    by_key: BTreeMap<(Slug, MappingKind), Uuid>,
}

impl MappingStore {
    /// Opens the store rooted at `root`, creating the folder and loading the
    /// mapping document when present. A corrupt document is a hard error: this
    /// store is the authority for published UUIDs and must not silently drop
    /// them.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;

        let mut store = Self {
            root,
            durability: WriteDurability::default(),
            by_uuid: BTreeMap::new(),
            by_key: BTreeMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mappings_path(&self) -> PathBuf {
        self.root.join(MAPPINGS_FILENAME)
    }

    pub fn len(&self) -> usize {
        self.by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uuid.is_empty()
    }

    /// Lookup by uuid.
    pub fn get(&self, uuid: Uuid) -> Option<&Mapping> {
        self.by_uuid.get(&uuid)
    }

    /// Lookup by `(slug, kind)` without creating anything.
    pub fn find(&self, slug: &Slug, kind: MappingKind) -> Option<Uuid> {
        self.by_key.get(&(slug.clone(), kind)).copied()
    }

    /// Returns the uuid for `(slug, kind)`, creating and persisting a fresh v4
    /// uuid when the pair is unseen. Calling twice with the same pair returns
    /// the same uuid.
    pub fn lookup_or_create(
        &mut self,
        slug: Slug,
        kind: MappingKind,
    ) -> Result<LookupOutcome, StoreError> {
        if let Some(uuid) = self.find(&slug, kind) {
            return Ok(LookupOutcome {
                uuid,
                created: false,
            });
        }

        let mut uuid = Uuid::new_v4();
        // v4 collisions are not a practical concern, but the uuid index is a
        // stated invariant, so re-roll rather than clobber.
        while self.by_uuid.contains_key(&uuid) {
            uuid = Uuid::new_v4();
        }

        self.by_uuid
            .insert(uuid, Mapping::new(uuid, slug.clone(), kind));
        self.by_key.insert((slug, kind), uuid);
        self.save()?;

        Ok(LookupOutcome {
            uuid,
            created: true,
        })
    }

    fn load(&mut self) -> Result<(), StoreError> {
        let path = self.mappings_path();
        let doc_str = match fs::read_to_string(&path) {
            Ok(doc_str) => doc_str,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let doc: MappingsDocJson =
            serde_json::from_str(&doc_str).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        for record in doc.mappings {
            let mapping = mapping_from_json(record)?;
            let key = (mapping.slug().clone(), mapping.kind());

            if self.by_key.contains_key(&key) {
                return Err(StoreError::DuplicateMappingKey {
                    slug: mapping.slug().to_string(),
                    kind: mapping.kind().to_string(),
                });
            }
            if self.by_uuid.contains_key(&mapping.uuid()) {
                return Err(StoreError::DuplicateUuid {
                    uuid: mapping.uuid().to_string(),
                });
            }

            self.by_key.insert(key, mapping.uuid());
            self.by_uuid.insert(mapping.uuid(), mapping);
        }

        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        let path = self.mappings_path();
        let doc = MappingsDocJson {
            mappings: self.by_uuid.values().map(mapping_to_json).collect(),
        };
        let doc_str = serde_json::to_string_pretty(&doc).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        write_atomic(
            &self.root,
            &path,
            format!("{doc_str}\n").as_bytes(),
            self.durability,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MappingsDocJson {
    #[serde(default)]
    mappings: Vec<MappingJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MappingJson {
    uuid: String,
    slug: String,
    #[serde(rename = "type")]
    kind: String,
}

fn mapping_to_json(mapping: &Mapping) -> MappingJson {
    MappingJson {
        uuid: mapping.uuid().to_string(),
        slug: mapping.slug().to_string(),
        kind: mapping.kind().to_string(),
    }
}

fn mapping_from_json(record: MappingJson) -> Result<Mapping, StoreError> {
    let uuid = Uuid::parse_str(&record.uuid).map_err(|source| StoreError::InvalidUuid {
        value: record.uuid.clone(),
        source,
    })?;
    let slug = Slug::new(record.slug.clone()).map_err(|source| StoreError::InvalidSlug {
        field: "mappings[].slug",
        value: record.slug,
        source,
    })?;
    let kind = record
        .kind
        .parse::<MappingKind>()
        .map_err(|source| StoreError::InvalidKind {
            value: record.kind,
            source,
        })?;

    Ok(Mapping::new(uuid, slug, kind))
}
