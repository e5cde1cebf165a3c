// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for uploaded images and exported designs.

pub mod export;
pub mod media;
