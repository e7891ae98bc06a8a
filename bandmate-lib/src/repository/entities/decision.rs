//! Swipe decisions and match reconciliation.
//!
//! A decision is a directed edge between two profile nodes carrying the
//! verdict and a timestamp; it is the only record of who swiped on whom. A
//! pair is matched exactly when like edges exist in both directions, and a
//! like is pending exactly when the reverse direction is still undecided, so
//! the relationship sets can never drift apart. The whole transition for one
//! swipe runs in a single write transaction: the precondition re-check, the
//! reciprocal-like probe, and the edge insert commit or roll back together.

use std::str::FromStr;

use agdb::{Comparison, CountComparison, DbId, QueryBuilder};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::repository::{
    db::Db,
    entities::{Error, Profile, Result, Uid, attrs::Skill},
};

/// A single one-directional swipe verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Like,
    Pass,
}

impl FromStr for Verdict {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "like" => Ok(Self::Like),
            "pass" => Ok(Self::Pass),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

/// What recording a decision did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// The decision was a like and the target had already liked the actor.
    pub is_match: bool,
    /// The decision was a like the target has not reciprocated yet; it now
    /// shows up in the target's pending likes.
    pub is_new_notification: bool,
    /// Present only when this decision completed a match.
    pub matched: Option<MatchSummary>,
}

/// Compact view of the counterpart handed back when a match forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub id: Uid,
    pub name: String,
    pub pictures: Vec<String>,
    pub skills: Vec<Skill>,
}

/// Record `verdict` from `actor` about `target`.
///
/// The first decision on an ordered pair is also the last: any further call
/// for the same pair fails with [`Error::AlreadyDecided`] and leaves every
/// edge untouched. Racing decisions serialize on the write lock, so when two
/// profiles like each other concurrently, whichever edge lands second sees
/// the first and reports the match.
pub(crate) fn record(
    db: &Db,
    actor: &Profile,
    target: &Profile,
    verdict: Verdict,
) -> Result<Outcome> {
    if actor.uid() == target.uid() {
        return Err(Error::SelfDecision);
    }

    let actor_uid = actor.uid();
    let target_uid = target.uid();
    let decided_at = Utc::now().timestamp_millis();

    let reciprocal_like = db.write().transaction_mut(|t| -> Result<bool> {
        // Both handles were resolved before the write lock was taken, so
        // re-resolve them by UID under it. A vanished actor lost a race; a
        // vanished target no longer exists to be decided on.
        let actor_id = t
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("profiles")
                    .where_()
                    .key("uid")
                    .value(Comparison::Equal(actor_uid.into()))
                    .query(),
            )?
            .elements
            .first()
            .map(|e| e.id)
            .ok_or(Error::StorageConflict)?;
        let target_id = t
            .exec(
                QueryBuilder::select()
                    .search()
                    .from("profiles")
                    .where_()
                    .key("uid")
                    .value(Comparison::Equal(target_uid.into()))
                    .query(),
            )?
            .elements
            .first()
            .map(|e| e.id)
            .ok_or(Error::TargetNotFound)?;

        // One decision per ordered pair, ever
        let prior = t
            .exec(
                QueryBuilder::select()
                    .search()
                    .from(actor_id)
                    .where_()
                    .distance(CountComparison::Equal(1))
                    .and()
                    .keys("verdict")
                    .query(),
            )?
            .elements;
        if prior.iter().any(|e| e.to == Some(target_id)) {
            return Err(Error::AlreadyDecided);
        }

        // Has the target already liked the actor?
        let mut reciprocal_like = false;
        for element in &t
            .exec(
                QueryBuilder::select()
                    .search()
                    .from(target_id)
                    .where_()
                    .distance(CountComparison::Equal(1))
                    .and()
                    .keys("verdict")
                    .query(),
            )?
            .elements
        {
            if element.to == Some(actor_id) && verdict_of(element)? == Verdict::Like {
                reciprocal_like = true;
            }
        }

        let edge_id = t
            .exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from(actor_id)
                    .to(target_id)
                    .query(),
            )?
            .elements
            .first()
            .expect("edge insertion should return the new edge as the first element")
            .id;
        t.exec_mut(
            QueryBuilder::insert()
                .values([[
                    ("verdict", verdict.to_string()).into(),
                    ("decided_at", decided_at).into(),
                ]])
                .ids(edge_id)
                .query(),
        )?;

        Ok(reciprocal_like)
    })?;

    debug!("Recorded {verdict}: {actor_uid} -> {target_uid}");

    Ok(match verdict {
        Verdict::Like if reciprocal_like => Outcome {
            is_match: true,
            is_new_notification: false,
            matched: Some(target.summary()?),
        },
        Verdict::Like => Outcome {
            is_match: false,
            is_new_notification: true,
            matched: None,
        },
        // A pass on an outstanding like quietly resolves it; the original
        // liker is not told.
        Verdict::Pass => Outcome {
            is_match: false,
            is_new_notification: false,
            matched: None,
        },
    })
}

/// All decision edges leaving `of`, as `(target, verdict)` pairs.
pub(crate) fn outgoing(db: &Db, of: DbId) -> Result<Vec<(DbId, Verdict)>> {
    let elements = db
        .read()
        .exec(
            QueryBuilder::select()
                .search()
                .from(of)
                .where_()
                .distance(CountComparison::Equal(1))
                .and()
                .keys("verdict")
                .query(),
        )?
        .elements;

    let mut decisions = Vec::with_capacity(elements.len());
    for element in &elements {
        let Some(to) = element.to else { continue };
        decisions.push((to, verdict_of(element)?));
    }

    Ok(decisions)
}

/// All decision edges arriving at `of`, as `(origin, verdict)` pairs.
pub(crate) fn incoming(db: &Db, of: DbId) -> Result<Vec<(DbId, Verdict)>> {
    let elements = db
        .read()
        .exec(
            QueryBuilder::select()
                .search()
                .to(of)
                .where_()
                .distance(CountComparison::Equal(1))
                .and()
                .keys("verdict")
                .query(),
        )?
        .elements;

    let mut decisions = Vec::with_capacity(elements.len());
    for element in &elements {
        let Some(from) = element.from else { continue };
        decisions.push((from, verdict_of(element)?));
    }

    Ok(decisions)
}

fn verdict_of(element: &agdb::DbElement) -> Result<Verdict> {
    let value = element
        .values
        .iter()
        .find(|kv| kv.key == "verdict".into())
        .expect("decision edges carry a verdict")
        .value
        .clone();

    Verdict::from_str(&String::try_from(value)?)
}
