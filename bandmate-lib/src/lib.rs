//! Core library for Bandmate, a social-matching service for musicians.
//!
//! Profiles live as nodes in an embedded graph database. Every swipe decision
//! is a directed edge between two profile nodes carrying the verdict, and the
//! relationship sets (liked, passed, matched, pending likes) are derived from
//! those edges rather than stored, so the two sides of a relationship can
//! never disagree. [`Repository`] is the single entry point for all
//! operations.

pub mod fs;
pub mod repository;

pub use repository::{
    Error, Filters, MatchSummary, Outcome, Profile, ProfileDraft, ProfileUpdate, PublicProfile,
    Repository, Result, Session, Uid, Verdict,
};
