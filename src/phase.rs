//! Lifecycle of one strategy invocation.
//!
//! `Idle -> Flushed -> SetTiming -> SetDone -> GetTiming -> GetDone -> Reported`

use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Flushed,
    SetTiming,
    SetDone,
    GetTiming,
    GetDone,
    Reported,
}

impl Phase {
    pub fn next(self) -> Option<Phase> {
        match self {
            Self::Idle => Some(Self::Flushed),
            Self::Flushed => Some(Self::SetTiming),
            Self::SetTiming => Some(Self::SetDone),
            Self::SetDone => Some(Self::GetTiming),
            Self::GetTiming => Some(Self::GetDone),
            Self::GetDone => Some(Self::Reported),
            Self::Reported => None,
        }
    }

    /// Move to `to`, which must be the direct successor of the current phase.
    pub fn advance(&mut self, to: Phase) -> Result<()> {
        if self.next() != Some(to) {
            bail!("illegal phase transition {:?} -> {:?}", self, to);
        }
        *self = to;
        Ok(())
    }
}
