//! Scoped update sessions.

use std::ops::{Deref, DerefMut};

use crate::LayoutDb;

/// An open update session on a [`LayoutDb`].
///
/// The session is opened on construction and closed when the guard is
/// dropped, including during unwinding.
pub struct UpdateSession<'a, D: LayoutDb + ?Sized> {
    db: &'a mut D,
}

impl<'a, D: LayoutDb + ?Sized> UpdateSession<'a, D> {
    /// Opens an update session on `db`.
    pub fn new(db: &'a mut D) -> Self {
        db.begin_session();
        Self { db }
    }
}

impl<D: LayoutDb + ?Sized> Deref for UpdateSession<'_, D> {
    type Target = D;
    fn deref(&self) -> &Self::Target {
        self.db
    }
}

impl<D: LayoutDb + ?Sized> DerefMut for UpdateSession<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.db
    }
}

impl<D: LayoutDb + ?Sized> Drop for UpdateSession<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.db.end_session() {
            tracing::error!("failed to close update session: {}", e);
        }
    }
}
