use crate::capture::Turn;
use crate::card::{describe_requirement, TrainColor};
use crate::city::{unordered, CityToCity};
use crate::error::RulesError;
use crate::hand::{SelectedCards, TrainCards};
use crate::player::{Player, PlayerId};
use crate::rules::Rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::repeat;
use tracing::debug;

/// Identifies a route on the board. Ids are dense, in the order routes were added.
///
/// # JSON
/// Route ids are serialized as a plain unsigned integer.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct RouteId(pub usize);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What has to be paid, on top of the usual cards, to capture a route.
///
/// # JSON
/// ```
/// use rails::route::RouteKind;
///
/// assert_eq!(serde_json::from_str::<RouteKind>(r#""tunnel""#).unwrap(), RouteKind::Tunnel);
/// assert_eq!(
///     serde_json::from_str::<RouteKind>(r#"{ "ferry": { "locomotives": 1 } }"#).unwrap(),
///     RouteKind::Ferry { locomotives: 1 }
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    #[default]
    Plain,
    /// Part of the cards must be wild cards (locomotives), the rest of any single color.
    Ferry { locomotives: u8 },
    /// Cards revealed from the deck when capturing may raise the price.
    Tunnel,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteKind::Plain => "route",
            RouteKind::Ferry { .. } => "ferry",
            RouteKind::Tunnel => "tunnel",
        })
    }
}

/// Result of paying for a route, before the capture is completed.
#[derive(Debug, PartialEq)]
pub(crate) enum Payment {
    /// Every card was paid, and has gone to the discard pile.
    Paid { spent: SelectedCards },
    /// The player refused the extra cards of a tunnel. Nothing was spent.
    Abandoned { extra_cards: u8 },
}

/// A connection between two cities that a single player can capture.
///
/// Two routes linking the same cities are *parallel*: one player may not own both.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    id: RouteId,
    /// Unique across the board.
    name: String,
    ends: CityToCity,
    /// How many cards, and later wagons, are needed to capture this route.
    length: u8,
    /// `None` means that any color matches, as long as all cards share it.
    color: Option<TrainColor>,
    kind: RouteKind,
    /// Who captured this route, if anyone. Never changes once set.
    owner: Option<PlayerId>,
}

impl Route {
    pub(crate) fn new(
        id: RouteId,
        name: String,
        ends: CityToCity,
        length: u8,
        color: Option<TrainColor>,
        kind: RouteKind,
    ) -> Self {
        Self {
            id,
            name,
            ends,
            length,
            color,
            kind,
            owner: None,
        }
    }

    #[inline]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ends(&self) -> CityToCity {
        self.ends
    }

    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn color(&self) -> Option<TrainColor> {
        self.color
    }

    #[inline]
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    #[inline]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, player_id: PlayerId) {
        debug_assert!(self.owner.is_none(), "{} captured twice", self.name);
        self.owner = Some(player_id);
    }

    /// Whether both routes link the same two cities, in whichever direction, and are distinct.
    pub fn is_parallel_to(&self, other: &Route) -> bool {
        unordered(self.ends) == unordered(other.ends) && self.name != other.name
    }

    /// Whether the cards in `cards` are enough to pay for this route.
    ///
    /// For tunnels, this only covers the base price: the extra cards are unknown until the
    /// capture is attempted.
    pub fn can_be_paid_with(&self, cards: &TrainCards) -> bool {
        match self.kind {
            RouteKind::Plain | RouteKind::Tunnel => cards.can_pay(self.color, self.length),
            // Locomotives are set aside before checking the rest of the price.
            RouteKind::Ferry { locomotives } => {
                cards.count(TrainColor::Wild) >= locomotives
                    && cards.can_pay_keeping_wilds(None, self.length - locomotives, locomotives)
            }
        }
    }

    /// Asks the player for the cards of this route, and discards them.
    ///
    /// Expects the capture to be allowed. On `Err`, the player's hand is left untouched.
    pub(crate) fn pay(
        &self,
        player: &mut Player,
        rules: &Rules,
        turn: &mut Turn,
    ) -> Result<Payment, RulesError> {
        debug!(route = %self.name, kind = %self.kind, length = self.length, "paying for route");

        let spent = match self.kind {
            RouteKind::Plain => player.cards_mut().select_cards(
                self.color,
                self.length,
                false,
                turn.input,
            )?,
            RouteKind::Ferry { locomotives } => {
                Self::pay_ferry(player.cards_mut(), locomotives, self.length, turn)?
            }
            RouteKind::Tunnel => return self.pay_tunnel(player, rules, turn),
        };

        for card in &spent {
            turn.supply.discard_wagon_card(*card);
        }

        Ok(Payment::Paid { spent })
    }

    fn pay_ferry(
        cards: &mut TrainCards,
        locomotives: u8,
        length: u8,
        turn: &mut Turn,
    ) -> Result<SelectedCards, RulesError> {
        let wild_cards = cards.count(TrainColor::Wild);
        if wild_cards < locomotives {
            return Err(RulesError::InsufficientCards {
                requested: locomotives,
                selected: wild_cards,
            });
        }

        for _ in 0..locomotives {
            cards.remove(TrainColor::Wild);
        }

        let rest = match cards.select_cards(None, length - locomotives, false, turn.input) {
            Ok(rest) => rest,
            Err(error) => {
                cards.add_all(repeat(TrainColor::Wild).take(locomotives as usize));
                return Err(error);
            }
        };

        let mut spent: SelectedCards = repeat(TrainColor::Wild)
            .take(locomotives as usize)
            .collect();
        spent.extend(rest);

        Ok(spent)
    }

    /// Stages the base price, reveals cards from the deck, then asks for the extra cards
    /// if any revealed card matches the color being used.
    fn pay_tunnel(
        &self,
        player: &mut Player,
        rules: &Rules,
        turn: &mut Turn,
    ) -> Result<Payment, RulesError> {
        let player_name = player.name().to_owned();
        let cards = player.cards_mut();

        for card in cards.select_cards(self.color, self.length, false, turn.input)? {
            cards.stage(card);
        }

        let used_color = cards.staged_color();
        let matching_color = self.color.unwrap_or(used_color);

        let mut extra_cards = 0;
        for _ in 0..rules.tunnel_draws {
            let card = match turn.supply.draw_wagon_card() {
                Some(card) => card,
                None => {
                    debug!(tunnel = %self.name, "deck exhausted while drawing for a tunnel");
                    break;
                }
            };

            turn.log.log(format!("Drawn for the tunnel {}: {} card.", self.name, card));
            if card.is_wild() || card == matching_color {
                extra_cards += 1;
            }

            turn.supply.discard_wagon_card(card);
        }

        debug!(tunnel = %self.name, %used_color, extra_cards, "tunnel cards revealed");

        let mut extra = SelectedCards::new();
        if extra_cards > 0 {
            turn.log.log(format!(
                "{}: {} must pay {} extra {} card(s).",
                self.name,
                player_name,
                extra_cards,
                describe_requirement(Some(used_color))
            ));

            extra = match cards.select_cards(Some(used_color), extra_cards, true, turn.input) {
                Ok(extra) => extra,
                Err(error) => {
                    cards.unstage_all();
                    return Err(error);
                }
            };

            if extra.is_empty() {
                cards.unstage_all();
                turn.log.log(format!(
                    "{} gave up on capturing the tunnel {}.",
                    player_name, self.name
                ));

                return Ok(Payment::Abandoned { extra_cards });
            }
        }

        let mut spent = cards.drain_staged();
        spent.extend(extra);

        for card in &spent {
            turn.supply.discard_wagon_card(*card);
        }

        Ok(Payment::Paid { spent })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
