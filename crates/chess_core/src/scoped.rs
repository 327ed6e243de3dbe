use std::ops::Deref;

use crate::Board;

/// A move pushed onto a [`Board`] for the lifetime of the guard.
///
/// The board is only readable while the guard lives. Dropping it pops the
/// move, so the board is restored on every exit path, unwinding included.
#[must_use = "dropping the guard immediately undoes the move"]
pub struct ScopedMove<'a> {
    board: &'a mut Board,
}

impl<'a> ScopedMove<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Self {
        Self { board }
    }
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        self.board.pop();
    }
}
