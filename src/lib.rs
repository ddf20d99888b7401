//=========================================================================
// Bindery
//=========================================================================
//
// Game engine shell built around an event system with declarative
// event-to-event bindings.
//
// Crate layout:
// - `core`: events, listeners, bindings, input forwarding, Root lifecycle
// - `engine`: EngineBuilder / Engine, the runtime facade
// - `platform`: winit window and input collection (private)
//
// The event core can be used on its own, without a window:
// ```rust
// use bindery::core::{EventConfig, Root};
// use bindery::core::event::{EventBinding, WindowClosedEvent};
//
// let mut root = Root::new(EventConfig::default());
// root.initialize().unwrap();
// root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------

mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
