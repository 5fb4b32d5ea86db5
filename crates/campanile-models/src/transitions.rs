//! Status-transition registry shared by every lifecycle entity.
//!
//! The transition model is deliberately permissive: any status may move to
//! any other status, and the only guard is the identity check. Requesting
//! the status an entity already holds is a no-op, reported back as
//! `success = false` rather than an error, so callers can tell "nothing
//! happened" apart from "the request was invalid". This also means
//! transitions are reversible (a `Closed` term may reopen); registrars
//! correct mistakes through the same endpoint that made them, with no
//! special-case paths. Tightening this into a real transition matrix
//! (e.g. making `Cancelled` terminal) would happen here and nowhere else.

/// Decision for a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The target differs from the current status; apply and persist it.
    Apply,
    /// The target equals the current status; leave the entity untouched.
    NoOp,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self, Transition::NoOp)
    }
}

/// Plan a status change for any lifecycle entity.
///
/// Pure decision; the caller persists the new value when the answer is
/// [`Transition::Apply`].
pub fn plan<S: PartialEq>(current: &S, requested: &S) -> Transition {
    if current == requested {
        Transition::NoOp
    } else {
        Transition::Apply
    }
}
