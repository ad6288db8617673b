// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for Cortex bounded context

pub mod event_bus;
pub mod json_file_store;
pub mod memory_store;
pub mod repository;

pub use event_bus::{EventBus, EventBusError, EventReceiver};
pub use json_file_store::JsonFileStateRepository;
pub use memory_store::InMemoryStateRepository;
pub use repository::StateRepository;
