//! Request handlers for profile advice and reference-data lookups.
//! All Completion API access goes through `llm_client::CompletionClient`.

pub mod advice;
pub mod form;
pub mod handlers;
pub mod profile;
pub mod recommendations;
