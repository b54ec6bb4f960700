//! The board game engine: every state transition of a turn.
//!
//! `BoardGame` owns the `GameState` and is its only writer. Each operation
//! checks its preconditions first and returns a `GameError` without touching
//! state when they do not hold.

use std::sync::Arc;

use crate::core::{
    Action, AssetId, BoardSnapshot, Clock, DiceSource, Event, GameConfig, GameResult, GameState,
    GameStatus, LogKind, PlayerId, Purchase, RentPayment, Roll, StepOutcome, SystemClock,
    TileAction, TurnPhase, DIE_FACES,
};
use crate::error::{ConfigError, EngineResult, GameError};

use super::policy::DecisionPolicy;

/// Author of log entries not tied to a player.
const SYSTEM_USER: &str = "System";

/// Board game engine.
///
/// ## Example
///
/// ```
/// use cryptopoly::core::{
///     AssetConfig, AssetId, GameConfig, PlayerConfig, ScriptedDice, TileAction,
/// };
/// use cryptopoly::rules::BoardGame;
///
/// let config = GameConfig::new(8)
///     .with_player(PlayerConfig::human("Alice"))
///     .with_player(PlayerConfig::human("Bob"))
///     .with_asset(AssetConfig::new(0, "ETH", 3, 200, 50));
/// let mut game = BoardGame::new(&config).unwrap();
///
/// let roll = game.roll_dice_with(&mut ScriptedDice::new([3])).unwrap();
/// assert_eq!(roll.path.as_slice(), &[1, 2, 3]);
///
/// assert_eq!(game.advance_along_path().unwrap(), TileAction::OfferBuy(AssetId::new(0)));
/// game.buy_asset().unwrap();
/// assert_eq!(game.state().current_index(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BoardGame {
    state: GameState,
    clock: Arc<dyn Clock>,
}

impl BoardGame {
    /// Start a game using the wall clock for log timestamps.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }

    /// Start a game with a custom log clock.
    pub fn with_clock(
        config: &GameConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        let mut game = Self {
            state: GameState::new(config)?,
            clock: Arc::new(clock),
        };
        let seats = game.state.player_count();
        game.log(LogKind::System, SYSTEM_USER, format!("Game started with {seats} players"));
        Ok(game)
    }

    /// Resume from an existing state (e.g. a decoded checkpoint).
    pub fn from_state(state: GameState, clock: impl Clock + 'static) -> Self {
        Self {
            state,
            clock: Arc::new(clock),
        }
    }

    /// Read-only view of the state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Give up the engine and keep the state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn snapshot(&self, log_lines: usize) -> BoardSnapshot {
        BoardSnapshot::capture(&self.state, log_lines)
    }

    /// Arrange ownership before play starts. See `GameState::grant_asset`.
    pub fn grant_asset(&mut self, asset: AssetId, player: PlayerId) -> EngineResult<()> {
        self.state.grant_asset(asset, player)
    }

    fn log(&mut self, kind: LogKind, user: impl Into<String>, action: impl Into<String>) {
        let now = self.clock.now_ms();
        let turn = self.state.turn_number;
        self.state.logs.push(user, action, kind, now, turn);
    }

    fn ensure_playing(&self) -> EngineResult<()> {
        match self.state.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Finished => Err(GameError::GameFinished),
        }
    }

    // === Dice ===

    /// Roll the game's own dice for the current player.
    ///
    /// Rejected with `ActionInProgress` while a move, decision or the
    /// customization overlay is pending; the dice are not touched then.
    pub fn roll_dice(&mut self) -> EngineResult<Roll> {
        self.ensure_can_roll()?;
        let value = self.state.rng.roll_die();
        self.start_move(value)
    }

    /// Roll with an external dice source (forced or replayed rolls).
    pub fn roll_dice_with(&mut self, dice: &mut impl DiceSource) -> EngineResult<Roll> {
        self.ensure_can_roll()?;
        let value = dice.roll_die();
        if !(1..=DIE_FACES).contains(&value) {
            return Err(GameError::InvalidRoll(value));
        }
        self.start_move(value)
    }

    fn ensure_can_roll(&self) -> EngineResult<()> {
        self.ensure_playing()?;
        if self.state.is_busy() {
            tracing::warn!(
                phase = self.state.phase.name(),
                customizing = self.state.customizing,
                "roll rejected: action in progress"
            );
            return Err(GameError::ActionInProgress);
        }
        Ok(())
    }

    fn start_move(&mut self, value: u8) -> EngineResult<Roll> {
        let player = self.state.current_player();
        let (name, start) = (player.name.clone(), player.position);
        let path = self.state.path_from(start, value);

        self.state.phase = TurnPhase::Moving {
            path: path.clone(),
            step: 0,
        };
        self.log(LogKind::Movement, name.clone(), format!("Rolled a {value}!"));
        tracing::debug!(player = %name, roll = value, ?path, "dice rolled");

        Ok(Roll { value, path })
    }

    // === Movement ===

    /// Move the current player one tile along the rolled path.
    ///
    /// After the last tile the landing is resolved: a free tile ends the
    /// turn, an asset opens the matching decision.
    pub fn step(&mut self) -> EngineResult<StepOutcome> {
        self.ensure_playing()?;
        let (position, done) = match &mut self.state.phase {
            TurnPhase::Moving { path, step } => {
                let position = *path.get(*step).ok_or(GameError::NotMoving)?;
                *step += 1;
                (position, *step == path.len())
            }
            _ => return Err(GameError::NotMoving),
        };

        self.state.current_player_mut().position = position;
        tracing::debug!(player = self.state.current_player, position, "step");

        if !done {
            return Ok(StepOutcome::Moved { position });
        }
        let tile = self.land();
        Ok(StepOutcome::Landed { position, tile })
    }

    /// Walk the remainder of the rolled path and resolve the landing.
    pub fn advance_along_path(&mut self) -> EngineResult<TileAction> {
        loop {
            if let StepOutcome::Landed { tile, .. } = self.step()? {
                return Ok(tile);
            }
        }
    }

    fn land(&mut self) -> TileAction {
        let tile = self.state.resolve_tile();
        match tile {
            TileAction::None => {
                let player = self.state.current_player();
                let (name, position) = (player.name.clone(), player.position);
                self.log(LogKind::System, name, format!("Landed on tile {position}"));
                self.state.phase = TurnPhase::Idle;
                self.next_turn();
            }
            TileAction::OfferBuy(asset) => self.state.phase = TurnPhase::AwaitingBuy { asset },
            TileAction::OfferPay { asset, .. } => {
                self.state.phase = TurnPhase::AwaitingPay { asset };
            }
        }
        tile
    }

    /// What the tile under the current player requires.
    #[must_use]
    pub fn resolve_tile(&self) -> TileAction {
        self.state.resolve_tile()
    }

    /// The decision the current player owes, if any.
    #[must_use]
    pub fn pending_decision(&self) -> Option<TileAction> {
        match self.state.phase {
            TurnPhase::AwaitingBuy { .. } | TurnPhase::AwaitingPay { .. } => {
                Some(self.state.resolve_tile())
            }
            _ => None,
        }
    }

    // === Decisions ===

    /// Buy the asset on offer and end the turn.
    ///
    /// With insufficient funds nothing changes and the offer stays open;
    /// the caller may `pass` instead.
    pub fn buy_asset(&mut self) -> EngineResult<Purchase> {
        self.ensure_playing()?;
        let TurnPhase::AwaitingBuy { asset } = self.state.phase else {
            return Err(GameError::NoPendingDecision);
        };
        let entry = self.state.asset(asset).ok_or(GameError::UnknownAsset(asset))?;
        if entry.owner.is_some() {
            return Err(GameError::AlreadyOwned(asset));
        }
        let (price, asset_name) = (entry.price, entry.name.clone());

        let buyer = self.state.current_player();
        if buyer.balance < price {
            tracing::warn!(
                player = %buyer.name,
                price,
                balance = buyer.balance,
                "purchase rejected"
            );
            return Err(GameError::InsufficientFunds {
                needed: price,
                available: buyer.balance,
            });
        }

        let player = self.state.current_player_mut();
        player.balance -= price;
        player.assets.insert(asset);
        let (id, name) = (player.id, player.name.clone());
        if let Some(entry) = self.state.asset_mut(asset) {
            entry.owner = Some(id);
        }
        self.state.prize_pot = self.state.prize_pot.saturating_add(price);

        self.log(LogKind::Transaction, name.clone(), format!("Bought {asset_name} for {price}"));
        tracing::info!(player = %name, asset = %asset_name, price, "asset bought");
        self.next_turn();

        Ok(Purchase {
            player: id,
            asset,
            price,
        })
    }

    /// Decline the asset on offer and end the turn.
    pub fn pass(&mut self) -> EngineResult<AssetId> {
        self.ensure_playing()?;
        let TurnPhase::AwaitingBuy { asset } = self.state.phase else {
            return Err(GameError::NoPendingDecision);
        };
        let asset_name = self.state.asset(asset).map(|a| a.name.clone()).unwrap_or_default();
        let name = self.state.current_player().name.clone();

        self.log(LogKind::System, name, format!("Passed on {asset_name}"));
        self.next_turn();
        Ok(asset)
    }

    /// Pay rent to the owner of the current tile and end the turn.
    ///
    /// The payment is capped at the payer's balance; the uncovered part is
    /// reported as `shortfall` and never collected. When the recorded owner
    /// is not at the table the turn ends without a transfer.
    pub fn pay_rent(&mut self) -> EngineResult<RentPayment> {
        self.ensure_playing()?;
        let TurnPhase::AwaitingPay { asset } = self.state.phase else {
            return Err(GameError::NoPendingDecision);
        };

        let payer = self.state.current_player();
        let (payer_id, payer_name, balance) = (payer.id, payer.name.clone(), payer.balance);
        let (rent, asset_name, recorded_owner) = match self.state.asset(asset) {
            Some(a) => (a.rent, a.name.clone(), a.owner),
            None => (0, String::new(), None),
        };
        let owner = recorded_owner.filter(|&o| o != payer_id && self.state.player(o).is_some());

        let Some(owner) = owner else {
            tracing::warn!(?asset, ?recorded_owner, "rent owner missing; skipping transfer");
            self.log(
                LogKind::System,
                payer_name,
                format!("No owner found for {asset_name}; rent skipped"),
            );
            self.next_turn();
            return Ok(RentPayment {
                payer: payer_id,
                owner: None,
                asset,
                amount: 0,
                shortfall: 0,
            });
        };

        let amount = balance.min(rent);
        let shortfall = rent - amount;
        self.state.current_player_mut().balance -= amount;
        let recipient = &mut self.state.players[owner.index()];
        recipient.balance = recipient.balance.saturating_add(amount);
        let owner_name = recipient.name.clone();

        let message = if shortfall > 0 {
            format!("Paid {amount} rent to {owner_name} for {asset_name} ({shortfall} short)")
        } else {
            format!("Paid {amount} rent to {owner_name} for {asset_name}")
        };
        self.log(LogKind::Transaction, payer_name.clone(), message);
        tracing::info!(payer = %payer_name, owner = %owner_name, amount, shortfall, "rent paid");
        self.next_turn();

        Ok(RentPayment {
            payer: payer_id,
            owner: Some(owner),
            asset,
            amount,
            shortfall,
        })
    }

    /// Apply the policy's choice if the current seat is AI-controlled and
    /// owes a decision.
    ///
    /// A buy the player cannot afford falls back to a pass. Returns `None`
    /// when there was nothing to decide.
    pub fn auto_decide(
        &mut self,
        policy: &impl DecisionPolicy,
    ) -> EngineResult<Option<Vec<Event>>> {
        if !self.state.current_player().is_ai || self.pending_decision().is_none() {
            return Ok(None);
        }
        let Some(decision) = policy.decide(&self.state) else {
            return Ok(None);
        };
        match self.apply(decision.into()) {
            Err(GameError::InsufficientFunds { .. }) => self.apply(Action::Pass).map(Some),
            other => other.map(Some),
        }
    }

    // === Turn flow ===

    /// Hand the turn to the next player, dropping any pending decision and
    /// closing the customization overlay.
    ///
    /// Not allowed mid-move.
    pub fn advance_turn(&mut self) -> EngineResult<PlayerId> {
        self.ensure_playing()?;
        if self.state.phase.is_moving() {
            return Err(GameError::ActionInProgress);
        }
        self.next_turn();
        Ok(self.state.current_player().id)
    }

    fn next_turn(&mut self) {
        let from = self.state.current_player;
        self.state.current_player = (from + 1) % self.state.players.len();
        self.state.phase = TurnPhase::Idle;
        self.state.customizing = false;
        self.state.turn_number += 1;
        tracing::info!(
            from,
            to = self.state.current_player,
            turn = self.state.turn_number,
            "turn advanced"
        );

        if let Some(max) = self.state.max_turns {
            if self.state.turn_number > max {
                self.finish_game();
            }
        }
    }

    /// Open the customization overlay. Only while idle.
    pub fn open_customization(&mut self) -> EngineResult<()> {
        self.ensure_playing()?;
        if !self.state.phase.is_idle() {
            return Err(GameError::ActionInProgress);
        }
        self.state.customizing = true;
        Ok(())
    }

    /// Close the customization overlay.
    pub fn close_customization(&mut self) -> EngineResult<()> {
        self.ensure_playing()?;
        self.state.customizing = false;
        Ok(())
    }

    /// End the game and return the standings by net worth.
    pub fn finish(&mut self) -> EngineResult<GameResult> {
        self.ensure_playing()?;
        Ok(self.finish_game())
    }

    fn finish_game(&mut self) -> GameResult {
        self.state.status = GameStatus::Finished;
        self.state.phase = TurnPhase::Idle;
        self.state.customizing = false;

        let result = self.state.standings();
        let names: Vec<String> = self
            .state
            .players
            .iter()
            .filter(|p| result.is_winner(p.id))
            .map(|p| p.name.clone())
            .collect();
        self.log(LogKind::System, SYSTEM_USER, format!("Game over! Winner: {}", names.join(", ")));
        tracing::info!(winners = ?names, turn = self.state.turn_number, "game finished");
        result
    }

    // === Dispatch ===

    /// Actions the current player can take right now.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.state.status == GameStatus::Finished {
            return Vec::new();
        }
        match self.state.phase {
            TurnPhase::Idle if self.state.customizing => {
                vec![Action::CloseCustomization, Action::EndTurn]
            }
            TurnPhase::Idle => vec![Action::Roll, Action::EndTurn, Action::OpenCustomization],
            TurnPhase::Moving { .. } => vec![Action::Step, Action::Advance],
            TurnPhase::AwaitingBuy { asset } => {
                let affordable = self
                    .state
                    .asset(asset)
                    .is_some_and(|a| a.price <= self.state.current_player().balance);
                if affordable {
                    vec![Action::Buy, Action::Pass]
                } else {
                    vec![Action::Pass]
                }
            }
            TurnPhase::AwaitingPay { .. } => vec![Action::PayRent],
        }
    }

    /// Apply an action and report what happened.
    pub fn apply(&mut self, action: Action) -> EngineResult<Vec<Event>> {
        let player = self.state.current_player().id;
        let turn_before = self.state.turn_number;
        let mut events = Vec::new();

        match action {
            Action::Roll => {
                let roll = self.roll_dice()?;
                events.push(Event::Rolled { player, roll });
            }
            Action::Step => {
                let outcome = self.step()?;
                Self::push_step(&mut events, player, outcome);
            }
            Action::Advance => loop {
                let outcome = self.step()?;
                Self::push_step(&mut events, player, outcome);
                if matches!(outcome, StepOutcome::Landed { .. }) {
                    break;
                }
            },
            Action::Buy => events.push(Event::Bought(self.buy_asset()?)),
            Action::Pass => {
                let asset = self.pass()?;
                events.push(Event::Passed { player, asset });
            }
            Action::PayRent => events.push(Event::RentPaid(self.pay_rent()?)),
            Action::EndTurn => {
                self.advance_turn()?;
            }
            Action::OpenCustomization => {
                self.open_customization()?;
                events.push(Event::Customization { open: true });
            }
            Action::CloseCustomization => {
                self.close_customization()?;
                events.push(Event::Customization { open: false });
            }
            Action::Finish => {
                let result = self.finish()?;
                events.push(Event::Finished(result));
                return Ok(events);
            }
        }

        if self.state.turn_number != turn_before {
            events.push(Event::TurnAdvanced {
                from: player,
                to: self.state.current_player().id,
            });
        }
        if self.state.status == GameStatus::Finished {
            events.push(Event::Finished(self.state.standings()));
        }
        Ok(events)
    }

    fn push_step(events: &mut Vec<Event>, player: PlayerId, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Moved { position } => events.push(Event::Moved { player, position }),
            StepOutcome::Landed { position, tile } => {
                events.push(Event::Moved { player, position });
                events.push(Event::Landed { player, position, tile });
            }
        }
    }
}
