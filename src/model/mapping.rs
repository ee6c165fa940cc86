// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::Slug;

/// Whether a mapping points at a series or at a single chapter.
///
/// Series and chapter slugs live in separate namespaces upstream, so the kind
/// is part of the mapping key: the same raw slug may map to two different
/// UUIDs, one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    Series,
    Chapter,
}

impl MappingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Chapter => "chapter",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingKind {
    type Err = ParseMappingKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(Self::Series),
            "chapter" => Ok(Self::Chapter),
            _ => Err(ParseMappingKindError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMappingKindError {
    value: String,
}

impl fmt::Display for ParseMappingKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mapping kind {:?} (expected \"series\" or \"chapter\")",
            self.value
        )
    }
}

impl std::error::Error for ParseMappingKindError {}

/// One slug-to-UUID association.
///
/// The UUID is the opaque identifier the client exposes in its own URLs so
/// upstream slugs never leak into shareable links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    uuid: Uuid,
    slug: Slug,
    kind: MappingKind,
}

impl Mapping {
    pub fn new(uuid: Uuid, slug: Slug, kind: MappingKind) -> Self {
        Self { uuid, slug, kind }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn kind(&self) -> MappingKind {
        self.kind
    }
}
