//! triz-mcp - Guided TRIZ research protocol engine
//!
//! Walks an engineering problem through 60 validated research steps across
//! 6 TRIZ phases: Understand & Scope, Define Ideal, Function Analysis,
//! Select Tools, Generate Solutions, Rank & Implement. Each step serves a
//! concrete research instruction, validates the submitted findings, and
//! accumulates them for later steps; every accepted step persists the full
//! session so work survives crashes and context loss.
//!
//! The crate exposes the protocol three ways: as a library ([`GuidedEngine`]),
//! as MCP tools ([`mcp::get_tools`]), and through the `triz` CLI binary.

pub mod engine;
pub mod error;
pub mod mcp;
pub mod steps;
pub mod store;
pub mod synthesis;
pub mod types;
pub mod validator;

pub use engine::GuidedEngine;
pub use error::{EngineError, EngineResult};
pub use steps::{InstructionProvider, TrizProtocol};
pub use store::{SessionStore, SqliteStore};
pub use types::{
    CurrentView, Instruction, Phase, PhaseSummary, Session, StartResult, Step, StepStatus,
    SubmitResult, TOTAL_STEPS,
};
