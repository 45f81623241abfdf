//! Shared type definitions for the Crabtown simulation.
//!
//! This crate is the single source of truth for the types used across the
//! Crabtown workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the Three.js renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and messages
//! - [`structs`] -- Entity records (agents, messages) and snapshot views

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{AgentId, MessageId};
pub use structs::{
    AgentView, AirPoint, Crab, CrabPose, GroundPoint, LiveMessage, Message, MotionMode,
    SessionInfo, WorldSnapshot,
};

#[cfg(test)]
mod tests {
    //! Integration test for `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::MessageId::export_all();

        let _ = crate::structs::GroundPoint::export_all();
        let _ = crate::structs::AirPoint::export_all();
        let _ = crate::structs::MotionMode::export_all();
        let _ = crate::structs::Crab::export_all();
        let _ = crate::structs::CrabPose::export_all();
        let _ = crate::structs::Message::export_all();
        let _ = crate::structs::LiveMessage::export_all();
        let _ = crate::structs::AgentView::export_all();
        let _ = crate::structs::WorldSnapshot::export_all();
        let _ = crate::structs::SessionInfo::export_all();
    }
}
