//! Longest road and largest army.
//!
//! Both awards are worth [`ACHIEVEMENT_POINTS`] and change hands only when another
//! player strictly beats the holder. A holder whose road is cut below everyone else
//! loses the award; if the new leaders are tied nobody holds it.

use crate::actions::GameEvent;
use crate::board::PlayerId;
use crate::game::GameState;
use crate::hex::{EdgeCoord, VertexCoord};
use tracing::info;

/// Shortest road that can claim longest road
pub const MIN_LONGEST_ROAD: u32 = 5;

/// Fewest knights that can claim largest army
pub const MIN_LARGEST_ARMY: u32 = 3;

pub const ACHIEVEMENT_POINTS: u32 = 2;

impl GameState {
    /// Length of the player's longest trail of roads.
    ///
    /// A trail uses each road at most once and cannot pass through a vertex holding an
    /// opponent's settlement or city.
    pub fn longest_road_length(&self, player: PlayerId) -> u32 {
        let roads: Vec<EdgeCoord> = self.structures_of(player).filter_map(|s| s.edge()).collect();
        let mut used = vec![false; roads.len()];
        let mut best = 0;

        for (start, road) in roads.iter().enumerate() {
            used[start] = true;
            for tip in road.endpoints() {
                best = best.max(1 + self.extend_trail(player, &roads, &mut used, &tip));
            }
            used[start] = false;
        }
        best
    }

    fn extend_trail(&self, player: PlayerId, roads: &[EdgeCoord], used: &mut [bool], at: &VertexCoord) -> u32 {
        if self.building_at(at).is_some_and(|b| b.owner != player) {
            return 0;
        }

        let mut best = 0;
        for index in 0..roads.len() {
            if used[index] {
                continue;
            }
            let [a, b] = roads[index].endpoints();
            let next = if a == *at {
                b
            } else if b == *at {
                a
            } else {
                continue;
            };
            used[index] = true;
            best = best.max(1 + self.extend_trail(player, roads, used, &next));
            used[index] = false;
        }
        best
    }

    /// Re-evaluate longest road after a road or settlement is placed
    pub(crate) fn update_longest_road(&mut self) -> Vec<GameEvent> {
        let lengths: Vec<(PlayerId, u32)> = self
            .players
            .iter()
            .map(|p| (p.id, self.longest_road_length(p.id)))
            .collect();
        let longest = lengths.iter().map(|(_, len)| *len).max().unwrap_or(0);

        let previous = self.longest_road_owner;
        let holder_keeps = previous.is_some_and(|holder| {
            lengths
                .iter()
                .any(|(id, len)| *id == holder && *len >= MIN_LONGEST_ROAD && *len == longest)
        });

        let current = if holder_keeps {
            previous
        } else {
            let mut leaders = lengths
                .iter()
                .filter(|(_, len)| *len >= MIN_LONGEST_ROAD && *len == longest);
            match (leaders.next(), leaders.next()) {
                (Some((id, _)), None) => Some(*id),
                _ => None,
            }
        };

        if current == previous {
            return Vec::new();
        }
        self.transfer_award(previous, current);
        self.longest_road_owner = current;

        let length = current.map_or(longest, |owner| {
            lengths.iter().find(|(id, _)| *id == owner).map_or(0, |(_, len)| *len)
        });
        info!(?previous, ?current, length, "longest road changed");
        vec![GameEvent::LongestRoadChanged {
            previous,
            current,
            length,
        }]
    }

    /// Re-evaluate largest army after a knight is played
    pub(crate) fn update_largest_army(&mut self) -> Vec<GameEvent> {
        let previous = self.largest_army_owner;

        let leader = self.players.iter().find(|p| {
            p.knights_played >= MIN_LARGEST_ARMY
                && self
                    .players
                    .iter()
                    .all(|other| other.id == p.id || other.knights_played < p.knights_played)
        });
        let Some((current, knights)) = leader.map(|p| (p.id, p.knights_played)) else {
            return Vec::new();
        };
        if previous == Some(current) {
            return Vec::new();
        }

        self.transfer_award(previous, Some(current));
        self.largest_army_owner = Some(current);

        info!(?previous, current, knights, "largest army changed");
        vec![GameEvent::LargestArmyChanged {
            previous,
            current: Some(current),
            knights,
        }]
    }

    fn transfer_award(&mut self, from: Option<PlayerId>, to: Option<PlayerId>) {
        if let Some(seat) = from.and_then(|id| self.players.get_mut(id as usize)) {
            seat.victory_points = seat.victory_points.saturating_sub(ACHIEVEMENT_POINTS);
        }
        if let Some(seat) = to.and_then(|id| self.players.get_mut(id as usize)) {
            seat.victory_points += ACHIEVEMENT_POINTS;
        }
    }
}
