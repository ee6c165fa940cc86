// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lembar-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lembar and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The HTTP surface of the mapping service.

pub mod server;

pub use server::{router, ApiError, ApiState};
