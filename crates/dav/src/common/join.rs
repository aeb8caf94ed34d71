/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::DavError;

/// Fan-out/join bookkeeping for one response entry.
///
/// The pending count starts at one so that it cannot reach zero while the
/// initial batch is still being scheduled; the scheduler releases that guard
/// with a plain `complete(None)` once every fetch has been started. Every
/// follow-up fetch must call `start()` before it is pushed onto the
/// executor. The first error is latched and reported exactly once, on the
/// transition to zero; completions arriving after that are no-ops.
#[derive(Debug)]
pub(crate) struct FetchJoin {
    pending: u32,
    first_error: Option<DavError>,
    finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    Pending,
    Finished,
}

impl FetchJoin {
    pub fn new() -> Self {
        FetchJoin {
            pending: 1,
            first_error: None,
            finished: false,
        }
    }

    pub fn start(&mut self) {
        debug_assert!(!self.finished);
        self.pending += 1;
    }

    pub fn complete(&mut self, error: Option<DavError>) -> Settle {
        if self.finished {
            return Settle::Pending;
        }
        if let Some(error) = error {
            if self.first_error.is_none() {
                self.first_error = Some(error);
            }
        }
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.finished = true;
            Settle::Finished
        } else {
            Settle::Pending
        }
    }

    pub fn has_error(&self) -> bool {
        self.first_error.is_some()
    }

    pub fn into_error(self) -> Option<DavError> {
        self.first_error
    }
}
