use crate::capture::{complete_capture, describe_cards, owns_parallel_route, CaptureOutcome, Turn};
use crate::card::TrainColor;
use crate::city::{unordered, City, CityId, CityToCity};
use crate::error::RulesError;
use crate::player::Player;
use crate::route::{Payment, Route, RouteId, RouteKind};
use crate::rules::Rules;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// How a route is described before being placed on a board.
///
/// # JSON
/// ```
/// use rails::board::RouteDescription;
/// use rails::card::TrainColor;
/// use rails::route::RouteKind;
///
/// let route: RouteDescription = serde_json::from_str(
///     r#"{ "from": "Paris", "to": "Bruxelles", "length": 2, "color": "yellow" }"#,
/// ).unwrap();
///
/// assert_eq!(route.color, Some(TrainColor::Yellow));
/// assert_eq!(route.kind, RouteKind::Plain);
/// assert_eq!(route.name, None);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RouteDescription {
    /// Defaults to "`from` - `to`", suffixed with a counter if that name is already taken.
    #[serde(default)]
    pub name: Option<String>,
    pub from: String,
    pub to: String,
    pub length: u8,
    /// Omitted, or `null`, when any color matches.
    #[serde(default)]
    pub color: Option<TrainColor>,
    #[serde(default)]
    pub kind: RouteKind,
}

impl RouteDescription {
    /// A plain route, of any color.
    pub fn new(from: impl Into<String>, to: impl Into<String>, length: u8) -> Self {
        Self {
            name: None,
            from: from.into(),
            to: to.into(),
            length,
            color: None,
            kind: RouteKind::Plain,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: TrainColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_kind(mut self, kind: RouteKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Convenience macro to describe a route between two cities.
///
/// # Example
/// ```
/// use rails::route;
/// use rails::card::TrainColor;
/// use rails::route::RouteKind;
///
/// let plain = route!("Paris" => "Bruxelles", 2, Yellow);
/// assert_eq!(plain.color, Some(TrainColor::Yellow));
///
/// let tunnel = route!(tunnel "Zürich" => "München", 2, Yellow);
/// assert_eq!(tunnel.kind, RouteKind::Tunnel);
///
/// let ferry = route!(ferry "Dieppe" => "London", 2, locomotives = 1);
/// assert_eq!(ferry.kind, RouteKind::Ferry { locomotives: 1 });
/// assert_eq!(ferry.color, None);
/// ```
#[macro_export]
macro_rules! route {
    (tunnel $from:expr => $to:expr, $length:expr $(, $color:ident)?) => {
        $crate::route!($from => $to, $length $(, $color)?)
            .with_kind($crate::route::RouteKind::Tunnel)
    };
    (ferry $from:expr => $to:expr, $length:expr, locomotives = $locomotives:expr) => {
        $crate::route!($from => $to, $length)
            .with_kind($crate::route::RouteKind::Ferry { locomotives: $locomotives })
    };
    ($from:expr => $to:expr, $length:expr) => {
        $crate::board::RouteDescription::new($from, $to, $length)
    };
    ($from:expr => $to:expr, $length:expr, $color:ident) => {
        $crate::board::RouteDescription::new($from, $to, $length)
            .with_color($crate::card::TrainColor::$color)
    };
}

/// A whole board, as loaded by [`Board::from_json`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BoardDescription {
    pub cities: Vec<String>,
    pub routes: Vec<RouteDescription>,
}

/// Incrementally validates cities and routes, before freezing them into a [`Board`].
pub struct BoardBuilder {
    rules: Rules,
    cities: Vec<City>,
    city_ids: HashMap<String, CityId>,
    routes: Vec<Route>,
    route_names: HashSet<String>,
}

impl BoardBuilder {
    fn new(rules: Rules) -> Self {
        Self {
            rules,
            cities: Vec::new(),
            city_ids: HashMap::new(),
            routes: Vec::new(),
            route_names: HashSet::new(),
        }
    }

    pub fn add_city(&mut self, name: impl Into<String>) -> Result<CityId, RulesError> {
        let name = name.into();
        if self.city_ids.contains_key(&name) {
            return Err(RulesError::InvalidBoard(format!(
                "The city {} is listed twice.",
                name
            )));
        }

        let id = CityId(self.cities.len());
        self.city_ids.insert(name.clone(), id);
        self.cities.push(City::new(id, name));

        Ok(id)
    }

    fn city_id(&self, name: &str) -> Result<CityId, RulesError> {
        self.city_ids
            .get(name)
            .copied()
            .ok_or_else(|| RulesError::InvalidBoard(format!("Unknown city {}.", name)))
    }

    /// The first of "A - B", "A - B (2)", "A - B (3)", ... that no route uses yet.
    fn default_route_name(&self, from: &str, to: &str) -> String {
        let base = format!("{} - {}", from, to);
        let mut name = base.clone();
        let mut counter = 1;

        while self.route_names.contains(&name) {
            counter += 1;
            name = format!("{} ({})", base, counter);
        }

        name
    }

    pub fn add_route(&mut self, description: RouteDescription) -> Result<RouteId, RulesError> {
        let RouteDescription {
            name,
            from,
            to,
            length,
            color,
            kind,
        } = description;

        let ends: CityToCity = (self.city_id(&from)?, self.city_id(&to)?);
        let name = name.unwrap_or_else(|| self.default_route_name(&from, &to));

        let invalid = |reason: &str| {
            Err(RulesError::InvalidBoard(format!(
                "The route {} {}.",
                name, reason
            )))
        };

        if ends.0 == ends.1 {
            return invalid("must link two different cities");
        }

        if length == 0 {
            return invalid("must have a length of at least 1");
        }

        if color == Some(TrainColor::Wild) {
            return invalid("cannot be wild: leave its color out so that any color matches");
        }

        if let RouteKind::Ferry { locomotives } = kind {
            if locomotives == 0 || locomotives > length {
                return invalid("must require between one locomotive and its length");
            }

            if color.is_some() {
                return invalid("is a ferry, which accepts any color");
            }
        }

        if self.route_names.contains(&name) {
            return invalid("is listed twice");
        }

        let id = RouteId(self.routes.len());
        self.route_names.insert(name.clone());
        self.routes.push(Route::new(id, name, ends, length, color, kind));

        Ok(id)
    }

    pub fn build(self) -> Result<Board, RulesError> {
        self.rules.validate()?;

        let mut parallel_routes: HashMap<CityToCity, SmallVec<[RouteId; 2]>> = HashMap::new();
        for route in &self.routes {
            parallel_routes
                .entry(unordered(route.ends()))
                .or_default()
                .push(route.id());
        }

        debug!(
            cities = self.cities.len(),
            routes = self.routes.len(),
            "board built"
        );

        Ok(Board {
            rules: self.rules,
            cities: self.cities,
            routes: self.routes,
            parallel_routes,
        })
    }
}

/// The authoritative state of the board, per game: every city and route, and who owns them.
///
/// This is the entry point of the capture rules. A dispatcher first asks whether an action is
/// allowed ([`Board::is_route_capturable`], [`Board::is_station_buildable`]), then performs it
/// ([`Board::capture_route`], [`Board::build_station`]).
/// Not thread-safe!
#[derive(Debug, Serialize)]
pub struct Board {
    rules: Rules,
    cities: Vec<City>,
    routes: Vec<Route>,
    /// Maps two adjacent cities, in either order, to every route between them.
    #[serde(skip)]
    parallel_routes: HashMap<CityToCity, SmallVec<[RouteId; 2]>>,
}

impl Board {
    pub fn builder(rules: Rules) -> BoardBuilder {
        BoardBuilder::new(rules)
    }

    pub fn from_description(
        description: BoardDescription,
        rules: Rules,
    ) -> Result<Self, RulesError> {
        let mut builder = Self::builder(rules);

        for city in description.cities {
            builder.add_city(city)?;
        }

        for route in description.routes {
            builder.add_route(route)?;
        }

        builder.build()
    }

    /// Loads a board from its JSON description.
    ///
    /// # Example
    /// ```
    /// use rails::board::Board;
    /// use rails::rules::Rules;
    ///
    /// let board = Board::from_json(
    ///     r#"{
    ///         "cities": ["Paris", "Bruxelles", "Dieppe", "London"],
    ///         "routes": [
    ///             { "from": "Paris", "to": "Bruxelles", "length": 2, "color": "yellow" },
    ///             { "from": "Paris", "to": "Bruxelles", "length": 2, "color": "red" },
    ///             { "from": "Dieppe", "to": "London", "length": 2, "kind": { "ferry": { "locomotives": 1 } } }
    ///         ]
    ///     }"#,
    ///     Rules::default(),
    /// ).unwrap();
    ///
    /// assert_eq!(board.routes().len(), 3);
    /// assert!(board.route_by_name("Paris - Bruxelles (2)").is_some());
    /// ```
    pub fn from_json(json: &str, rules: Rules) -> Result<Self, RulesError> {
        let description: BoardDescription = serde_json::from_str(json)?;
        Self::from_description(description, rules)
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    #[inline]
    pub fn route(&self, route_id: RouteId) -> Option<&Route> {
        self.routes.get(route_id.0)
    }

    #[inline]
    pub fn city(&self, city_id: CityId) -> Option<&City> {
        self.cities.get(city_id.0)
    }

    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name() == name)
    }

    pub fn city_by_name(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.name() == name)
    }

    /// Every route linking the same two cities as `route`, itself included.
    fn routes_between(&self, route: &Route) -> impl Iterator<Item = &Route> {
        self.parallel_routes
            .get(&unordered(route.ends()))
            .into_iter()
            .flatten()
            .filter_map(|route_id| self.route(*route_id))
    }

    /// Predicate that assesses whether a player may capture a route right now.
    ///
    /// The route must be free, the player must have enough wagons, must not own a parallel route
    /// already, and must hold cards able to pay for it. Unknown routes are never capturable.
    pub fn is_route_capturable(&self, route_id: RouteId, player: &Player) -> bool {
        let route = match self.route(route_id) {
            Some(route) => route,
            None => return false,
        };

        route.owner().is_none()
            && player.wagons() >= route.length()
            && !owns_parallel_route(route, self.routes_between(route), player.id())
            && route.can_be_paid_with(player.cards())
    }

    /// Captures a route for a player, asking them which cards to pay with.
    ///
    /// Returns an `Err`, without changing anything, if the capture is not allowed
    /// (see [`Board::is_route_capturable`]).
    ///
    /// Otherwise, returns whether the route was captured, or whether the player gave up on
    /// capturing a tunnel. Either way, the player's turn is over.
    ///
    /// # Example
    /// ```
    /// use rails::route;
    /// use rails::board::Board;
    /// use rails::capture::{CaptureOutcome, Turn};
    /// use rails::card::{CardDealer, TrainColor};
    /// use rails::input::ScriptedInput;
    /// use rails::player::{Player, PlayerId};
    /// use rails::rules::Rules;
    ///
    /// let mut builder = Board::builder(Rules::default());
    /// builder.add_city("Paris").unwrap();
    /// builder.add_city("Bruxelles").unwrap();
    /// let route_id = builder.add_route(route!("Paris" => "Bruxelles", 2, Yellow)).unwrap();
    /// let mut board = builder.build().unwrap();
    ///
    /// let mut player = Player::new(PlayerId(0), String::from("Ada"), board.rules());
    /// player.give_train_cards([TrainColor::Yellow, TrainColor::Yellow]);
    ///
    /// let mut card_dealer = CardDealer::new();
    /// let mut input = ScriptedInput::new([]);
    /// let mut log: Vec<String> = Vec::new();
    /// let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);
    ///
    /// assert!(board.is_route_capturable(route_id, &player));
    /// assert_eq!(
    ///     board.capture_route(route_id, &mut player, &mut turn),
    ///     Ok(CaptureOutcome::Captured { points: 2 })
    /// );
    /// assert_eq!(player.wagons(), 43);
    /// assert!(!board.is_route_capturable(route_id, &player));
    /// ```
    pub fn capture_route(
        &mut self,
        route_id: RouteId,
        player: &mut Player,
        turn: &mut Turn,
    ) -> Result<CaptureOutcome, RulesError> {
        let route = self
            .route(route_id)
            .ok_or(RulesError::UnknownRoute(route_id))?;

        if !self.is_route_capturable(route_id, player) {
            warn!(route = %route, player = %player.id(), "route not capturable");
            return Err(RulesError::RouteNotCapturable {
                route: route.name().to_owned(),
                player: player.name().to_owned(),
            });
        }

        match route.pay(player, &self.rules, turn)? {
            Payment::Abandoned { extra_cards } => {
                info!(route = %route, player = %player.id(), extra_cards, "tunnel abandoned");
                Ok(CaptureOutcome::Abandoned { extra_cards })
            }
            Payment::Paid { spent } => {
                let route = self
                    .routes
                    .get_mut(route_id.0)
                    .ok_or(RulesError::UnknownRoute(route_id))?;
                let points = complete_capture(route, player, &spent, &self.rules, turn.log)?;

                Ok(CaptureOutcome::Captured { points })
            }
        }
    }

    /// Predicate that assesses whether a player may build a station in a city right now.
    ///
    /// The city must not have a station yet, and the player must have a station left and hold
    /// enough cards of a single color to pay for it. Unknown cities never accept a station.
    pub fn is_station_buildable(&self, city_id: CityId, player: &Player) -> bool {
        let city = match self.city(city_id) {
            Some(city) => city,
            None => return false,
        };

        match self.rules.station_price(player.stations()) {
            Some(price) => !city.has_station() && player.cards().can_pay(None, price),
            None => false,
        }
    }

    /// Builds a station in a city for a player, asking them which cards to pay with.
    ///
    /// Returns an `Err`, without changing anything, if the station is not allowed
    /// (see [`Board::is_station_buildable`]).
    pub fn build_station(
        &mut self,
        city_id: CityId,
        player: &mut Player,
        turn: &mut Turn,
    ) -> Result<(), RulesError> {
        let city = self
            .city(city_id)
            .ok_or(RulesError::UnknownCity(city_id))?;

        let price = match self.rules.station_price(player.stations()) {
            Some(price) if self.is_station_buildable(city_id, player) => price,
            _ => {
                warn!(city = %city, player = %player.id(), "station not buildable");
                return Err(RulesError::StationNotBuildable {
                    city: city.name().to_owned(),
                    player: player.name().to_owned(),
                });
            }
        };

        debug!(city = %city, price, "paying for station");
        let spent = player
            .cards_mut()
            .select_cards(None, price, false, turn.input)?;
        for card in &spent {
            turn.supply.discard_wagon_card(*card);
        }

        let city = self
            .cities
            .get_mut(city_id.0)
            .ok_or(RulesError::UnknownCity(city_id))?;
        city.set_owner(player.id());
        player.use_station(self.rules.station_value);

        info!(city = %city, player = %player.id(), price, "station built");
        turn.log.log(format!(
            "{} has built a station in {}. They did so using {}.",
            player.name(),
            city,
            describe_cards(&spent)
        ));

        Ok(())
    }

    /// Every route the player may capture right now, in board order.
    pub fn capturable_routes(&self, player: &Player) -> Vec<RouteId> {
        self.routes
            .iter()
            .map(Route::id)
            .filter(|route_id| self.is_route_capturable(*route_id, player))
            .collect()
    }

    /// Every city in which the player may build a station right now, in board order.
    pub fn buildable_cities(&self, player: &Player) -> Vec<CityId> {
        self.cities
            .iter()
            .map(City::id)
            .filter(|city_id| self.is_station_buildable(*city_id, player))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardDealer;
    use crate::input::ScriptedInput;
    use crate::player::PlayerId;

    use pretty_assertions::assert_eq;
    use TrainColor::*;

    const BOARD_JSON: &str = r#"{
        "cities": ["Paris", "Bruxelles", "Dieppe", "London", "Zürich", "München"],
        "routes": [
            { "from": "Paris", "to": "Bruxelles", "length": 2, "color": "yellow" },
            { "from": "Bruxelles", "to": "Paris", "length": 2, "color": "red" },
            { "from": "Dieppe", "to": "London", "length": 2, "kind": { "ferry": { "locomotives": 1 } } },
            { "name": "Alpine tunnel", "from": "Zürich", "to": "München", "length": 2, "color": "yellow", "kind": "tunnel" },
            { "from": "Paris", "to": "Dieppe", "length": 1, "color": "pink" }
        ]
    }"#;

    fn new_board() -> Board {
        Board::from_json(BOARD_JSON, Rules::default()).unwrap()
    }

    fn new_player(id: usize, cards: impl IntoIterator<Item = TrainColor>) -> Player {
        let mut player = Player::new(PlayerId(id), format!("Player {}", id), &Rules::default());
        player.give_train_cards(cards);
        player
    }

    fn route_id(board: &Board, name: &str) -> RouteId {
        board.route_by_name(name).unwrap().id()
    }

    fn city_id(board: &Board, name: &str) -> CityId {
        board.city_by_name(name).unwrap().id()
    }

    #[test]
    fn board_from_json() {
        let board = new_board();

        assert_eq!(board.cities().len(), 6);
        assert_eq!(
            board
                .routes()
                .iter()
                .map(Route::name)
                .collect::<Vec<_>>(),
            vec![
                "Paris - Bruxelles",
                "Bruxelles - Paris",
                "Dieppe - London",
                "Alpine tunnel",
                "Paris - Dieppe"
            ]
        );

        let paris_bruxelles = board.route_by_name("Paris - Bruxelles").unwrap();
        let bruxelles_paris = board.route_by_name("Bruxelles - Paris").unwrap();
        assert!(paris_bruxelles.is_parallel_to(bruxelles_paris));
        assert_eq!(board.routes_between(paris_bruxelles).count(), 2);

        let ferry = board.route_by_name("Dieppe - London").unwrap();
        assert_eq!(ferry.kind(), RouteKind::Ferry { locomotives: 1 });
        assert_eq!(ferry.color(), None);
    }

    #[test]
    fn board_default_names_stay_unique() -> Result<(), RulesError> {
        let mut builder = Board::builder(Rules::default());
        builder.add_city("Essen")?;
        builder.add_city("Berlin")?;
        builder.add_route(route!("Essen" => "Berlin", 2, Green))?;
        builder.add_route(route!("Essen" => "Berlin", 2, Blue))?;
        builder.add_route(route!("Essen" => "Berlin", 2))?;
        let board = builder.build()?;

        assert!(board.route_by_name("Essen - Berlin").is_some());
        assert!(board.route_by_name("Essen - Berlin (2)").is_some());
        assert!(board.route_by_name("Essen - Berlin (3)").is_some());

        Ok(())
    }

    #[test]
    fn invalid_boards() {
        let invalid = |routes: &str| {
            let json = format!(r#"{{ "cities": ["Paris", "Bruxelles"], "routes": [{}] }}"#, routes);
            matches!(
                Board::from_json(&json, Rules::default()),
                Err(RulesError::InvalidBoard(_))
            )
        };

        assert!(invalid(r#"{ "from": "Paris", "to": "Madrid", "length": 2 }"#));
        assert!(invalid(r#"{ "from": "Paris", "to": "Paris", "length": 2 }"#));
        assert!(invalid(r#"{ "from": "Paris", "to": "Bruxelles", "length": 0 }"#));
        assert!(invalid(r#"{ "from": "Paris", "to": "Bruxelles", "length": 2, "color": "wild" }"#));
        assert!(invalid(
            r#"{ "from": "Paris", "to": "Bruxelles", "length": 2, "kind": { "ferry": { "locomotives": 3 } } }"#
        ));
        assert!(invalid(
            r#"{ "from": "Paris", "to": "Bruxelles", "length": 2, "color": "red", "kind": { "ferry": { "locomotives": 1 } } }"#
        ));
        assert!(invalid(
            r#"{ "name": "A", "from": "Paris", "to": "Bruxelles", "length": 2 }, { "name": "A", "from": "Bruxelles", "to": "Paris", "length": 1 }"#
        ));
        assert!(!invalid(r#"{ "from": "Paris", "to": "Bruxelles", "length": 2 }"#));

        assert!(matches!(
            Board::from_json(r#"{ "cities": ["Paris", "Paris"], "routes": [] }"#, Rules::default()),
            Err(RulesError::InvalidBoard(_))
        ));
        assert!(matches!(
            Board::from_json(r#"{ "cities": "Paris" }"#, Rules::default()),
            Err(RulesError::Json(_))
        ));
    }

    #[test]
    fn board_with_invalid_rules() {
        let rules = Rules {
            tunnel_draws: 0,
            ..Rules::default()
        };

        assert!(matches!(
            Board::builder(rules).build(),
            Err(RulesError::InvalidRules(_))
        ));
    }

    #[test]
    fn route_capturable() {
        let board = new_board();
        let paris_bruxelles = route_id(&board, "Paris - Bruxelles");

        assert!(board.is_route_capturable(paris_bruxelles, &new_player(0, [Yellow, Wild])));
        assert!(!board.is_route_capturable(paris_bruxelles, &new_player(0, [Yellow, Red])));
        assert!(!board.is_route_capturable(RouteId(42), &new_player(0, [Wild; 8])));
    }

    #[test]
    fn route_not_capturable_without_wagons() {
        let rules = Rules {
            wagons: 1,
            ..Rules::default()
        };
        let board = Board::from_json(BOARD_JSON, rules.clone()).unwrap();
        let mut player = Player::new(PlayerId(0), String::from("Ada"), &rules);
        player.give_train_cards([Yellow, Yellow, Pink]);

        assert!(!board.is_route_capturable(route_id(&board, "Paris - Bruxelles"), &player));
        assert!(board.is_route_capturable(route_id(&board, "Paris - Dieppe"), &player));
    }

    #[test]
    fn capture_route_not_capturable() {
        let mut board = new_board();
        let mut player = new_player(0, [Red]);
        let mut card_dealer = CardDealer::with_decks([], vec![], vec![]);
        let mut input = ScriptedInput::new([]);
        let mut log: Vec<String> = Vec::new();
        let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);

        assert_eq!(
            board.capture_route(route_id(&board, "Paris - Bruxelles"), &mut player, &mut turn),
            Err(RulesError::RouteNotCapturable {
                route: String::from("Paris - Bruxelles"),
                player: String::from("Player 0"),
            })
        );
        assert_eq!(
            board.capture_route(RouteId(42), &mut player, &mut turn),
            Err(RulesError::UnknownRoute(RouteId(42)))
        );
        assert_eq!(player.cards().to_sorted_vec(), vec![Red]);
    }

    #[test]
    fn capture_parallel_routes() -> Result<(), RulesError> {
        let mut board = new_board();
        let paris_bruxelles = route_id(&board, "Paris - Bruxelles");
        let bruxelles_paris = route_id(&board, "Bruxelles - Paris");
        let mut player = new_player(0, [Yellow, Yellow, Red, Red]);
        let mut other_player = new_player(1, [Red, Red]);
        let mut card_dealer = CardDealer::with_decks([], vec![Black; 5], vec![]);
        let mut input = ScriptedInput::new([]);
        let mut log: Vec<String> = Vec::new();
        let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);

        assert_eq!(
            board.capture_route(paris_bruxelles, &mut player, &mut turn)?,
            CaptureOutcome::Captured { points: 2 }
        );
        assert_eq!(board.route(paris_bruxelles).unwrap().owner(), Some(PlayerId(0)));
        assert!(!board.is_route_capturable(paris_bruxelles, &other_player));

        // The same player cannot own both routes, whatever their cards.
        assert!(player.cards().can_pay(Some(Red), 2));
        assert!(!board.is_route_capturable(bruxelles_paris, &player));

        // Someone else can.
        assert!(board.is_route_capturable(bruxelles_paris, &other_player));
        assert_eq!(
            board.capture_route(bruxelles_paris, &mut other_player, &mut turn)?,
            CaptureOutcome::Captured { points: 2 }
        );
        assert_eq!(
            log,
            vec![
                "Player 0 has claimed the route Paris - Bruxelles of length 2 (2 points). They did so using 2 yellow cards.",
                "Player 1 has claimed the route Bruxelles - Paris of length 2 (2 points). They did so using 2 red cards.",
            ]
        );

        Ok(())
    }

    #[test]
    fn capture_ferry() -> Result<(), RulesError> {
        let mut board = new_board();
        let ferry = route_id(&board, "Dieppe - London");
        let mut player = new_player(0, [Wild, Wild, Orange]);
        let mut card_dealer = CardDealer::with_decks([], vec![Black; 5], vec![]);
        let mut input = ScriptedInput::new([Some(Orange)]);
        let mut log: Vec<String> = Vec::new();
        let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);

        assert_eq!(
            board.capture_route(ferry, &mut player, &mut turn)?,
            CaptureOutcome::Captured { points: 2 }
        );
        assert_eq!(player.cards().to_sorted_vec(), vec![Wild]);
        assert_eq!(player.wagons(), 43);
        assert_eq!(player.score(), 14);

        Ok(())
    }

    #[test]
    fn build_stations_up_the_price_ladder() -> Result<(), RulesError> {
        let mut board = new_board();
        let mut player = new_player(0, [Red, Blue, Blue, Green, Green, Wild]);
        let mut card_dealer = CardDealer::with_decks([], vec![Black; 5], vec![]);
        let mut input = ScriptedInput::new([
            Some(Red),
            Some(Blue),
            Some(Blue),
            Some(Green),
            Some(Green),
        ]);
        let mut log: Vec<String> = Vec::new();
        let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);

        board.build_station(city_id(&board, "Paris"), &mut player, &mut turn)?;
        assert_eq!(player.stations(), 2);
        assert_eq!(player.score(), 8);

        board.build_station(city_id(&board, "London"), &mut player, &mut turn)?;
        assert_eq!(player.stations(), 1);
        assert_eq!(player.score(), 4);

        // The last station costs three cards: two green and a wild card.
        board.build_station(city_id(&board, "München"), &mut player, &mut turn)?;
        assert_eq!(player.stations(), 0);
        assert_eq!(player.score(), 0);
        assert!(player.cards().is_empty());

        assert_eq!(
            board.city_by_name("München").unwrap().owner(),
            Some(PlayerId(0))
        );
        assert!(board.buildable_cities(&player).is_empty());
        assert_eq!(
            log,
            vec![
                "Player 0 has built a station in Paris. They did so using 1 red card.",
                "Player 0 has built a station in London. They did so using 2 blue cards.",
                "Player 0 has built a station in München. They did so using 2 green cards and 1 wild card.",
            ]
        );

        Ok(())
    }

    #[test]
    fn station_not_buildable() {
        let mut board = new_board();
        let paris = city_id(&board, "Paris");
        let mut player = new_player(0, [Red]);
        let mut other_player = new_player(1, [Red]);
        let mut card_dealer = CardDealer::with_decks([], vec![Black; 5], vec![]);
        let mut input = ScriptedInput::new([]);
        let mut log: Vec<String> = Vec::new();
        let mut turn = Turn::new(&mut card_dealer, &mut input, &mut log);

        assert_eq!(board.build_station(paris, &mut player, &mut turn), Ok(()));
        assert!(!board.is_station_buildable(paris, &other_player));
        assert_eq!(
            board.build_station(paris, &mut other_player, &mut turn),
            Err(RulesError::StationNotBuildable {
                city: String::from("Paris"),
                player: String::from("Player 1"),
            })
        );
        assert_eq!(
            board.build_station(CityId(42), &mut other_player, &mut turn),
            Err(RulesError::UnknownCity(CityId(42)))
        );

        // Two cards of different colors cannot pay for the second station.
        player.give_train_cards([Blue, Green]);
        assert!(!board.is_station_buildable(city_id(&board, "London"), &player));
    }

    #[test]
    fn menus() {
        let board = new_board();
        let player = new_player(0, [Yellow, Yellow]);

        assert_eq!(
            board.capturable_routes(&player),
            vec![
                route_id(&board, "Paris - Bruxelles"),
                route_id(&board, "Alpine tunnel")
            ]
        );
        assert_eq!(board.buildable_cities(&player).len(), 6);
        assert!(board.buildable_cities(&new_player(1, [])).is_empty());
    }

    #[test]
    fn board_to_json() -> serde_json::Result<()> {
        let mut builder = Board::builder(Rules::default());
        builder.add_city("Essen").unwrap();
        let board = builder.build().unwrap();

        let json = serde_json::to_value(&board)?;
        assert_eq!(json["cities"][0]["name"], "Essen");
        assert_eq!(json["rules"]["wagons"], 45);
        assert!(json.get("parallel_routes").is_none());

        Ok(())
    }
}
