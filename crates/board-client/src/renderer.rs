//! Client-side board model.
//!
//! Keeps an advisory copy of the position, rebuilds an 8×8 grid of cells from
//! it on every state-changing event, and turns drag gestures into move
//! requests. The advisory position only ever changes on server events; a
//! local drop is checked against it but never applied.

use chess_core::{
    game::parse_position, CoreError, GameOver, MoveIntent, MoveRequest, PlayerRole, ServerEvent,
};
use shakmaty::{Chess, Color, File, Piece, Position, Rank, Role, Square};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub square: Square,
    pub light: bool,
    pub piece: Option<Piece>,
    pub draggable: bool,
}

impl Cell {
    pub fn glyph(&self) -> Option<char> {
        self.piece.map(glyph)
    }
}

/// Rows as displayed, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: Vec<Vec<Cell>>,
    pub flipped: bool,
}

impl Grid {
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Display coordinates of `square`.
    pub fn locate(&self, square: Square) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| cell.square == square)
                .map(|c| (r, c))
        })
    }
}

/// Last notice worth showing the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    GameOver(GameOver),
    MoveError(String),
}

pub struct BoardRenderer {
    position: Chess,
    role: Option<PlayerRole>,
    token: Option<String>,
    grid: Grid,
    dragging: Option<Square>,
    notice: Option<Notice>,
}

impl Default for BoardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardRenderer {
    pub fn new() -> Self {
        let mut renderer = Self {
            position: Chess::default(),
            role: None,
            token: None,
            grid: Grid {
                rows: Vec::new(),
                flipped: false,
            },
            dragging: None,
            notice: None,
        };
        renderer.render();
        renderer
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn role(&self) -> Option<PlayerRole> {
        self.role
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Apply a server event. Returns whether the grid was rebuilt.
    pub fn handle(&mut self, event: &ServerEvent) -> Result<bool, CoreError> {
        match event {
            ServerEvent::PlayerRole(side) => {
                self.role = Some(PlayerRole::Player(*side));
            }
            ServerEvent::SpectatorRole => {
                self.role = Some(PlayerRole::Spectator);
                self.token = None;
            }
            ServerEvent::SeatToken(token) => {
                self.token = Some(token.clone());
                return Ok(false);
            }
            ServerEvent::BoardState(fen) => {
                self.position = parse_position(fen)?;
            }
            ServerEvent::Move(intent) => match intent.resolve(&self.position) {
                Some(mv) => self.position.play_unchecked(mv),
                // Already reflected; the snapshot that follows resyncs anyway.
                None => tracing::debug!(?intent, "Broadcast move not applicable locally"),
            },
            ServerEvent::GameOver(over) => {
                self.notice = Some(Notice::GameOver(*over));
                return Ok(false);
            }
            ServerEvent::MoveError(msg) => {
                self.notice = Some(Notice::MoveError(msg.clone()));
                return Ok(false);
            }
        }
        self.render();
        Ok(true)
    }

    /// Parse and apply one text frame from the server. Frames that are not a
    /// known event, or carry an unusable snapshot, are logged and skipped.
    /// Returns the event and whether the grid was rebuilt.
    pub fn apply_frame(&mut self, text: &str) -> Option<(ServerEvent, bool)> {
        let event: ServerEvent = match serde_json::from_str(text) {
            Ok(ev) => ev,
            Err(e) => {
                tracing::warn!("Ignoring unknown frame: {e}");
                return None;
            }
        };
        match self.handle(&event) {
            Ok(rendered) => Some((event, rendered)),
            Err(e) => {
                tracing::warn!("Ignoring frame: {e}");
                None
            }
        }
    }

    /// Rebuild the grid from the advisory position.
    pub fn render(&mut self) {
        let flipped = self.role.is_some_and(PlayerRole::is_flipped);
        let mine = self.role.and_then(PlayerRole::side).map(Color::from);
        let board = self.position.board();

        let rows = (0..8u32)
            .map(|row| {
                (0..8u32)
                    .map(|col| {
                        let (file, rank) = if flipped {
                            (7 - col, row)
                        } else {
                            (col, 7 - row)
                        };
                        let square = Square::from_coords(File::new(file), Rank::new(rank));
                        let piece = board.piece_at(square);
                        Cell {
                            square,
                            light: (file + rank) % 2 == 1,
                            piece,
                            draggable: piece.is_some_and(|p| Some(p.color) == mine),
                        }
                    })
                    .collect()
            })
            .collect();

        self.grid = Grid { rows, flipped };
        self.dragging = None;
    }

    /// Pick up the piece at display coordinates, if it is ours.
    pub fn drag_start(&mut self, row: usize, col: usize) -> bool {
        match self.grid.cell(row, col) {
            Some(cell) if cell.draggable => {
                self.dragging = Some(cell.square);
                true
            }
            _ => {
                self.dragging = None;
                false
            }
        }
    }

    /// Drop the dragged piece. Yields a request to send if the move is legal
    /// on the advisory position.
    pub fn drop_on(&mut self, row: usize, col: usize) -> Option<MoveRequest> {
        let from = self.dragging.take()?;
        let to = self.grid.cell(row, col)?.square;
        let intent = MoveIntent::new(from, to);

        if intent.resolve(&self.position).is_none() {
            tracing::debug!(%from, %to, "Move is not legal locally");
            return None;
        }
        Some(MoveRequest {
            intent,
            token: self.token.clone(),
        })
    }
}

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}
