//! Bookkeeping shared by every kind of capture.

use crate::card::{TrainColor, WagonSupply};
use crate::error::RulesError;
use crate::game_log::GameLog;
use crate::input::PlayerInput;
use crate::player::{Player, PlayerId};
use crate::route::Route;
use crate::rules::Rules;

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::info;

/// The collaborators of the acting player, for the duration of one action.
pub struct Turn<'a> {
    /// Where drawn cards come from, and spent cards go.
    pub supply: &'a mut dyn WagonSupply,
    /// The acting player's answers.
    pub input: &'a mut dyn PlayerInput,
    /// Events shared with every player.
    pub log: &'a mut dyn GameLog,
}

impl<'a> Turn<'a> {
    pub fn new(
        supply: &'a mut dyn WagonSupply,
        input: &'a mut dyn PlayerInput,
        log: &'a mut dyn GameLog,
    ) -> Self {
        Self { supply, input, log }
    }
}

/// How an attempt to capture a route ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// The route now belongs to the player, who scored `points`.
    Captured { points: i32 },
    /// The player declined to pay the extra cards of a tunnel.
    /// Their hand is as it was before the attempt, and the turn is still consumed.
    Abandoned { extra_cards: u8 },
}

/// Whether `player` already owns a route parallel to `route` amongst `candidates`.
///
/// A player may never own both routes of a double route.
pub fn owns_parallel_route<'r>(
    route: &Route,
    candidates: impl IntoIterator<Item = &'r Route>,
    player_id: PlayerId,
) -> bool {
    candidates
        .into_iter()
        .any(|candidate| candidate.is_parallel_to(route) && candidate.owner() == Some(player_id))
}

/// Human-readable summary of spent cards, e.g. "2 red cards and 1 wild card".
pub fn describe_cards(cards: &[TrainColor]) -> String {
    let parts: Vec<String> = TrainColor::iter()
        .filter_map(|color| {
            match cards.iter().filter(|card| **card == color).count() {
                0 => None,
                1 => Some(format!("1 {} card", color)),
                count => Some(format!("{} {} cards", count, color)),
            }
        })
        .collect();

    if parts.is_empty() {
        String::from("no card")
    } else {
        parts.join(" and ")
    }
}

/// Final step of every successful capture, once the cards are paid: places the wagons,
/// grants the points, and marks the route as owned.
///
/// Returns the points granted.
pub(crate) fn complete_capture(
    route: &mut Route,
    player: &mut Player,
    spent: &[TrainColor],
    rules: &Rules,
    log: &mut dyn GameLog,
) -> Result<i32, RulesError> {
    player.spend_wagons(route.length())?;

    let points = rules.points_for_length(route.length());
    player.add_points(points);
    route.set_owner(player.id());

    info!(route = %route, player = %player.id(), points, "route captured");
    log.log(format!(
        "{} has claimed the {} {} of length {} ({} points). They did so using {}.",
        player.name(),
        route.kind(),
        route,
        route.length(),
        points,
        describe_cards(spent)
    ));

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityId;
    use crate::route::{RouteId, RouteKind};

    use pretty_assertions::assert_eq;
    use TrainColor::*;

    fn route(id: usize, name: &str, ends: (usize, usize), length: u8) -> Route {
        Route::new(
            RouteId(id),
            String::from(name),
            (CityId(ends.0), CityId(ends.1)),
            length,
            None,
            RouteKind::Plain,
        )
    }

    #[test]
    fn describe_spent_cards() {
        assert_eq!(describe_cards(&[]), "no card");
        assert_eq!(describe_cards(&[Red]), "1 red card");
        assert_eq!(describe_cards(&[Wild, Red, Red]), "2 red cards and 1 wild card");
        assert_eq!(describe_cards(&[Wild, Wild]), "2 wild cards");
    }

    #[test]
    fn parallel_route_ownership() {
        let player_id = PlayerId(0);
        let paris_bruxelles = route(0, "Paris - Bruxelles", (0, 1), 2);
        let mut bruxelles_paris = route(1, "Paris - Bruxelles (2)", (1, 0), 2);
        let mut paris_dieppe = route(2, "Paris - Dieppe", (0, 2), 1);

        assert!(!owns_parallel_route(
            &paris_bruxelles,
            [&bruxelles_paris, &paris_dieppe],
            player_id
        ));

        paris_dieppe.set_owner(player_id);
        assert!(!owns_parallel_route(
            &paris_bruxelles,
            [&bruxelles_paris, &paris_dieppe],
            player_id
        ));

        bruxelles_paris.set_owner(PlayerId(1));
        assert!(!owns_parallel_route(&paris_bruxelles, [&bruxelles_paris], player_id));

        let mut owned = route(1, "Paris - Bruxelles (2)", (1, 0), 2);
        owned.set_owner(player_id);
        assert!(owns_parallel_route(&paris_bruxelles, [&owned], player_id));
        // A route is not parallel to itself.
        assert!(!owns_parallel_route(&owned, [&owned], player_id));
    }

    #[test]
    fn complete_capture_bookkeeping() -> Result<(), RulesError> {
        let rules = Rules::default();
        let mut player = Player::new(PlayerId(3), String::from("Ada"), &rules);
        let mut paris_bruxelles = route(0, "Paris - Bruxelles", (0, 1), 6);
        let mut log: Vec<String> = Vec::new();

        let points = complete_capture(
            &mut paris_bruxelles,
            &mut player,
            &[Wild; 6],
            &rules,
            &mut log,
        )?;

        assert_eq!(points, 15);
        assert_eq!(player.wagons(), 39);
        assert_eq!(player.score(), 27);
        assert_eq!(paris_bruxelles.owner(), Some(PlayerId(3)));
        assert_eq!(
            log,
            vec!["Ada has claimed the route Paris - Bruxelles of length 6 (15 points). They did so using 6 wild cards."]
        );

        Ok(())
    }

    #[test]
    fn complete_capture_without_wagons() {
        let rules = Rules {
            wagons: 2,
            ..Rules::default()
        };
        let mut player = Player::new(PlayerId(0), String::from("Ada"), &rules);
        let mut paris_bruxelles = route(0, "Paris - Bruxelles", (0, 1), 3);
        let mut log: Vec<String> = Vec::new();

        assert_eq!(
            complete_capture(&mut paris_bruxelles, &mut player, &[], &rules, &mut log),
            Err(RulesError::InsufficientWagons {
                requested: 3,
                left: 2
            })
        );
        assert_eq!(paris_bruxelles.owner(), None);
        assert!(log.is_empty());
    }
}
