// Copyright 2025 Cowboy AI, LLC.

//! Display projections of the category graph
//!
//! Projections turn a snapshot scope and a mode into a renderer-neutral
//! view model. They are pure functions of the snapshot; caching lives in
//! [`ProjectionCache`] and is driven by commit change sets.

mod builder;
mod cache;
mod view;

pub use builder::build_view;
pub use cache::{CacheStats, ProjectionCache, ViewKey};
pub use view::{
    view_id, EdgeRole, NaturalitySquare, ViewEdge, ViewMode, ViewModel, ViewNode, ViewScope,
};

pub(crate) use builder::build_tracked;
