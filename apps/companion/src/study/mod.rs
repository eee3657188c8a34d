// Study assistant: prompt composition, the answer pipeline, and the offline fallback.
// All completion calls go through llm_client.

pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
