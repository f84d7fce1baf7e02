//! Flutter-facing bindings over `flowcanvas_core`.

pub mod api;
