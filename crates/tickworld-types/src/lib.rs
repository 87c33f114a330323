//! Shared type definitions for the Tickworld simulation.
//!
//! This crate is the vocabulary every other crate speaks. Types defined here
//! flow to `TypeScript` via `ts-rs` so a presentation layer can render and
//! edit worlds without re-declaring them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Entity kinds, headings, and the vacuum action vocabulary
//! - [`structs`] -- Grid coordinates, the vacuum percept, object classes

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Cleanliness, EntityKind, Heading, UnknownTag, VacuumAction};
pub use ids::EntityId;
pub use structs::{Coord, ObjectClass, VacuumPercept};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings into `bindings/` relative to the crate
        // root when `export_all` is called.
        use ts_rs::TS;

        let _ = crate::ids::EntityId::export_all();

        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::Heading::export_all();
        let _ = crate::enums::Cleanliness::export_all();
        let _ = crate::enums::VacuumAction::export_all();

        let _ = crate::structs::Coord::export_all();
        let _ = crate::structs::VacuumPercept::export_all();
        let _ = crate::structs::ObjectClass::export_all();
    }
}
