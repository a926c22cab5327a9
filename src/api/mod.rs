//! API layer for lumina-rs
//!
//! This module provides the request/response contract consumed by the reader
//! UI and the service that answers it.

pub mod request;
pub mod response;
pub mod service;

// Re-export main API types
pub use request::{
    CommentaryRequest, DefinitionRequest, PassageRequest, Request, SearchRequest, TextRequest, TopicsRequest,
    VerseRequest,
};
pub use response::{
    DefinitionResponse, ErrorResponse, ModulesResponse, Response, TextBody, TextResponse, Topic, TopicsResponse,
    VerseEntry, VersionsResponse, XrefsResponse,
};
pub use service::StudyService;
