// Session state machine and its plumbing: stage transitions, per-question
// countdown with auto-submit, pause/resume, and the HTTP handlers driving it.

pub mod handlers;
pub mod machine;
pub mod timer;
