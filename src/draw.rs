//! Two-click rectangle drawing.
//!
//! `begin` arms the session, the first click places the anchor and the
//! second click finalizes the rectangle and returns to idle. Calls that are
//! not legal in the current state are no-ops.

use log::debug;
use serde::Serialize;

use crate::{GeoPoint, Rectangle};

/// State of a [`DrawSession`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum DrawState {
    #[default]
    Idle,
    Armed {
        anchor: Option<GeoPoint>,
        cursor: Option<GeoPoint>,
    },
}

/// Finite-state machine turning map clicks into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DrawSession {
    state: DrawState,
}

impl DrawSession {
    /// A session in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already armed with no anchor.
    pub fn armed() -> Self {
        let mut session = Self::new();
        session.begin();
        session
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DrawState::Armed { .. })
    }

    pub fn anchor(&self) -> Option<GeoPoint> {
        match self.state {
            DrawState::Armed { anchor, .. } => anchor,
            DrawState::Idle => None,
        }
    }

    pub fn cursor(&self) -> Option<GeoPoint> {
        match self.state {
            DrawState::Armed { cursor, .. } => cursor,
            DrawState::Idle => None,
        }
    }

    /// Arm the session, discarding any anchor already placed.
    pub fn begin(&mut self) {
        self.state = DrawState::Armed {
            anchor: None,
            cursor: None,
        };
    }

    /// Feed a map click. Returns the finalized rectangle on the second click.
    pub fn click(&mut self, point: GeoPoint) -> Option<Rectangle> {
        match self.state {
            DrawState::Idle => None,
            DrawState::Armed { anchor: None, .. } => {
                self.state = DrawState::Armed {
                    anchor: Some(point),
                    cursor: Some(point),
                };
                None
            }
            DrawState::Armed {
                anchor: Some(anchor),
                ..
            } => {
                let rect = Rectangle::from_corners(anchor, point);
                self.state = DrawState::Idle;
                debug!("[DrawSession] Finalized rectangle {:?}", rect);
                Some(rect)
            }
        }
    }

    /// Track the pointer for the live preview; only meaningful once anchored.
    pub fn move_cursor(&mut self, point: GeoPoint) {
        if let DrawState::Armed {
            anchor: Some(_),
            cursor,
        } = &mut self.state
        {
            *cursor = Some(point);
        }
    }

    /// Abort drawing without producing a rectangle.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Rectangle spanned by the anchor and the cursor while drawing.
    pub fn preview(&self) -> Option<Rectangle> {
        match self.state {
            DrawState::Armed {
                anchor: Some(anchor),
                cursor: Some(cursor),
            } => Some(Rectangle::from_corners(anchor, cursor)),
            _ => None,
        }
    }
}
