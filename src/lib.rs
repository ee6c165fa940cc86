// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lembar: backend pieces for a comic-reading web client.
//!
//! Two halves live here. [`api`] plus [`store::MappingStore`] form the
//! slug-to-UUID mapping service the client uses for shareable links, and
//! [`shelf`] plus [`store::ShelfFolder`] hold a reader's local progress,
//! bookmarks and history. [`upstream`] talks to the third-party scraper the
//! catalog comes from.

pub mod api;
pub mod model;
pub mod shelf;
pub mod store;
pub mod upstream;
