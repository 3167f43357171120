//! Bank trades and port access.

use crate::actions::GameEvent;
use crate::board::{PlayerId, PortKind, Resource};
use crate::game::{GameError, GameState, TurnStep};
use crate::ledger::ResourceHand;
use tracing::debug;

/// Bank rate without any port
pub const DEFAULT_TRADE_RATIO: u32 = 4;

impl GameState {
    /// Ports reachable from the player's settlements and cities
    pub fn player_ports(&self, player: PlayerId) -> Vec<PortKind> {
        self.board
            .ports()
            .iter()
            .filter(|port| {
                port.vertices
                    .iter()
                    .any(|v| self.building_at(v).is_some_and(|b| b.owner == player))
            })
            .map(|port| port.kind)
            .collect()
    }

    /// Cards of `resource` the player must give for one card from the bank
    pub fn trading_ratio(&self, player: PlayerId, resource: Resource) -> u32 {
        self.player_ports(player)
            .iter()
            .filter(|kind| kind.applies_to(resource))
            .map(PortKind::rate)
            .min()
            .unwrap_or(DEFAULT_TRADE_RATIO)
    }

    pub(crate) fn bank_trade(
        &mut self,
        player: PlayerId,
        give: Resource,
        receive: Resource,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.step() != Some(&TurnStep::Build) {
            return Err(GameError::InvalidPhase);
        }
        if give == receive {
            return Err(GameError::InvalidTrade);
        }

        let ratio = self.trading_ratio(player, give);
        let offered = ResourceHand::single(give, ratio);
        if !self.player(player).is_some_and(|p| p.resources.can_afford(&offered)) {
            return Err(GameError::InsufficientResources);
        }
        if self.bank.get(receive) == 0 {
            return Err(GameError::BankDepleted);
        }

        self.pay_bank(player, &offered)?;
        self.grant_from_bank(player, receive, 1)?;
        debug!(player, %give, ratio, %receive, "bank trade");

        Ok(vec![GameEvent::BankTradeCompleted {
            player,
            gave: give,
            gave_count: ratio,
            received: receive,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Move;
    use crate::building::{Location, Structure, StructureId, StructureKind};
    use crate::random::ScriptedRandomness;
    use crate::testing::{give, roll, two_player_game};

    fn settle_on_port(game: &mut GameState, player: PlayerId, kind: PortKind) {
        let port = game.board.ports().iter().find(|p| p.kind == kind).cloned().unwrap();
        let id = StructureId(game.structures.len() as u32);
        game.structures.push(Structure {
            id,
            kind: StructureKind::Settlement,
            owner: player,
            location: Location::Vertex(port.vertices[0]),
        });
    }

    #[test]
    fn test_default_ratio() {
        let game = two_player_game();
        for resource in Resource::ALL {
            assert_eq!(game.trading_ratio(0, resource), DEFAULT_TRADE_RATIO);
        }
    }

    #[test]
    fn test_generic_port_ratio() {
        let mut game = two_player_game();
        settle_on_port(&mut game, 0, PortKind::Generic);

        for resource in Resource::ALL {
            assert_eq!(game.trading_ratio(0, resource), 3);
        }
        assert_eq!(game.trading_ratio(1, Resource::Ore), 4);
    }

    #[test]
    fn test_specific_port_beats_generic() {
        let mut game = two_player_game();
        settle_on_port(&mut game, 0, PortKind::Generic);
        settle_on_port(&mut game, 0, PortKind::Specific(Resource::Wheat));

        assert_eq!(game.trading_ratio(0, Resource::Wheat), 2);
        assert_eq!(game.trading_ratio(0, Resource::Brick), 3);
    }

    #[test]
    fn test_trade_same_resource_rejected() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(
            0,
            Move::BankTrade {
                give: Resource::Ore,
                receive: Resource::Ore,
            },
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), GameError::InvalidTrade);
    }

    #[test]
    fn test_trade_before_roll_rejected() {
        let mut game = two_player_game();
        give(&mut game, 0, ResourceHand::single(Resource::Brick, 4));
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(
            0,
            Move::BankTrade {
                give: Resource::Brick,
                receive: Resource::Wood,
            },
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), GameError::InvalidPhase);
    }

    #[test]
    fn test_trade_with_empty_bank() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        give(&mut game, 0, ResourceHand::single(Resource::Brick, 4));
        let left = game.bank.get(Resource::Ore);
        give(&mut game, 1, ResourceHand::single(Resource::Ore, left));
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(
            0,
            Move::BankTrade {
                give: Resource::Brick,
                receive: Resource::Ore,
            },
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), GameError::BankDepleted);
    }
}
