// Shared prompt constants.
// The study module owns its own templates; this file holds the cross-cutting system turn.

/// System turn sent with every completion request.
pub const STUDY_ASSISTANT_SYSTEM: &str = "You are a helpful AI study assistant.";
