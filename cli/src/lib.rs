// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! LogLens CLI library - exposes testable components

pub mod commands;
