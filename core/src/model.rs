use crate::grid::GridCoord;

pub type PieceId = usize;
pub type GroupId = usize;

#[derive(Clone, Debug, PartialEq)]
pub struct GroupState {
    pub id: GroupId,
    /// Offset from the assembled position shared by every member.
    pub translation: [f32; 2],
    pub members: Vec<PieceId>,
}

impl GroupState {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Arena of pieces and the groups that own them. Groups are indexed by the
/// id of the piece that founded them; absorbed groups leave a `None` slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub grid_size: usize,
    pub piece_size: f32,
    /// Owning group per piece.
    pub piece_groups: Vec<GroupId>,
    pub groups: Vec<Option<GroupState>>,
    /// Back to front.
    pub group_order: Vec<GroupId>,
}

impl Scene {
    pub fn new(grid_size: usize, piece_size: f32, translations: &[[f32; 2]]) -> Self {
        let total = grid_size * grid_size;
        let piece_groups = (0..total).collect();
        let groups = (0..total)
            .map(|id| {
                Some(GroupState {
                    id,
                    translation: translations.get(id).copied().unwrap_or([0.0, 0.0]),
                    members: vec![id],
                })
            })
            .collect();
        Self {
            grid_size,
            piece_size,
            piece_groups,
            groups,
            group_order: (0..total).collect(),
        }
    }

    pub fn total_pieces(&self) -> usize {
        self.piece_groups.len()
    }

    pub fn group_of(&self, piece: PieceId) -> Option<GroupId> {
        self.piece_groups.get(piece).copied()
    }

    pub fn group(&self, group: GroupId) -> Option<&GroupState> {
        self.groups.get(group).and_then(|entry| entry.as_ref())
    }

    fn group_mut(&mut self, group: GroupId) -> Option<&mut GroupState> {
        self.groups.get_mut(group).and_then(|entry| entry.as_mut())
    }

    pub fn group_count(&self) -> usize {
        self.groups.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn translation(&self, group: GroupId) -> Option<[f32; 2]> {
        self.group(group).map(|state| state.translation)
    }

    pub fn set_translation(&mut self, group: GroupId, translation: [f32; 2]) -> bool {
        match self.group_mut(group) {
            Some(state) => {
                state.translation = translation;
                true
            }
            None => false,
        }
    }

    pub fn coord_of(&self, piece: PieceId) -> GridCoord {
        GridCoord::from_id(piece, self.grid_size)
    }

    pub fn piece_at(&self, coord: GridCoord) -> Option<PieceId> {
        if coord.row < self.grid_size && coord.col < self.grid_size {
            Some(coord.id(self.grid_size))
        } else {
            None
        }
    }

    /// Rendered top-left of the piece's slot: group translation plus home offset.
    pub fn piece_position(&self, piece: PieceId) -> Option<[f32; 2]> {
        let group = self.group_of(piece)?;
        let translation = self.translation(group)?;
        let (hx, hy) = self.coord_of(piece).home_offset(self.piece_size);
        Some([translation[0] + hx, translation[1] + hy])
    }

    pub fn bring_to_front(&mut self, group: GroupId) {
        if let Some(pos) = self.group_order.iter().position(|id| *id == group) {
            self.group_order.remove(pos);
            self.group_order.push(group);
        }
    }

    /// Moves every member of `absorbed` into `survivor`, which keeps its
    /// translation. Returns the moved pieces.
    pub fn merge(&mut self, survivor: GroupId, absorbed: GroupId) -> Option<Vec<PieceId>> {
        if survivor == absorbed {
            return None;
        }
        self.group(survivor)?;
        let moved = self.groups.get_mut(absorbed)?.take()?.members;
        let members = match self.group_mut(survivor) {
            Some(state) => {
                state.members.extend_from_slice(&moved);
                state.members.clone()
            }
            None => return None,
        };
        for piece in members {
            if let Some(owner) = self.piece_groups.get_mut(piece) {
                *owner = survivor;
            }
        }
        self.group_order.retain(|id| *id != absorbed);
        Some(moved)
    }

    /// Pieces back to front, following group order.
    pub fn piece_order(&self) -> Vec<PieceId> {
        let mut order = Vec::with_capacity(self.total_pieces());
        for &group in &self.group_order {
            if let Some(state) = self.group(group) {
                order.extend_from_slice(&state.members);
            }
        }
        order
    }

    pub fn is_solved(&self) -> bool {
        self.group_count() == 1
    }

    /// Every grid slot is held by exactly one live group, and piece tags agree.
    pub fn covers_grid_exactly_once(&self) -> bool {
        let total = self.total_pieces();
        let mut seen = vec![false; total];
        for state in self.groups.iter().flatten() {
            for &piece in &state.members {
                if piece >= total || seen[piece] {
                    return false;
                }
                if self.group_of(piece) != Some(state.id) {
                    return false;
                }
                seen[piece] = true;
            }
        }
        seen.into_iter().all(|hit| hit)
    }
}
