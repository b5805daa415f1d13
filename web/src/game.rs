use crate::api::{ApiClient, ApiError};
use crate::session::{FirstMove, GameEpoch, GameReport, GameSession, Scoreboard};
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::Timeout;
use tictac_core::{Cell, Coord2, Outcome, Player, StrategyId, StrategyRotation, Verdict, iter_coords};
use tictac_protocol::{MoveResponse, NewGameRequest, NewGameResponse};
use yew::prelude::*;

pub(crate) const API_URL: &str = match option_env!("TICTAC_API_URL") {
    Some(url) => url,
    None => tictac_protocol::DEFAULT_API_URL,
};

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Base URL of the game server API
    #[arg(long, default_value = API_URL)]
    pub api_url: String,

    /// Symbol you play; only its moves are logged
    #[arg(long, default_value_t = Player::X)]
    pub human: Player,

    /// Play both sides on this device without contacting the server
    #[arg(long)]
    pub offline: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Setup,
    Starting,
    Playing,
    Finished(Box<GameReport>),
}

pub(crate) enum Msg {
    Start(FirstMove),
    Started {
        epoch: u32,
        result: Result<NewGameResponse, ApiError>,
    },
    CellClicked(Coord2),
    Moved {
        epoch: u32,
        coords: Coord2,
        result: Result<MoveResponse, ApiError>,
    },
    Reset,
    NextOpponent,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    coords: Coord2,
    cell: Cell,
    #[prop_or_default]
    winning: bool,
    #[prop_or_default]
    disabled: bool,
    callback: Callback<Coord2>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        coords,
        cell,
        winning,
        disabled,
        callback,
    } = props.clone();
    let flipping = use_state(|| false);

    let mut class = classes!(
        "cell",
        match cell {
            Some(Player::X) => classes!("x"),
            Some(Player::O) => classes!("o"),
            None => classes!("empty"),
        }
    );
    if winning {
        class.push("winning");
    }
    if disabled {
        class.push("locked");
    }
    if *flipping {
        class.push("flip");
    }

    let onclick = {
        let flipping = flipping.clone();
        Callback::from(move |_: MouseEvent| {
            if cell.is_some() || disabled {
                log::trace!("{:?} ignored click", coords);
                return;
            }
            flipping.set(true);
            let flipping = flipping.clone();
            Timeout::new(600, move || flipping.set(false)).forget();
            log::trace!("{:?} clicked", coords);
            callback.emit(coords);
        })
    };

    html! {
        <td {class} {onclick}>{cell.map(Player::symbol).unwrap_or_default()}</td>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct StatusProps {
    phase_label: Option<AttrValue>,
    current_player: Player,
    outcome: Outcome,
    strategy: Option<StrategyId>,
    score: Scoreboard,
    on_reset: Callback<()>,
}

#[function_component(StatusBar)]
fn status_bar(props: &StatusProps) -> Html {
    let message = match (&props.phase_label, props.outcome) {
        (Some(label), _) => html! { <span>{label.to_string()}</span> },
        (None, Outcome::Won { winner, .. }) => html! {
            <strong>{"Player "}<span class={player_class(winner)}>{winner.symbol()}</span>{" Wins!"}</strong>
        },
        (None, Outcome::Draw) => html! { <strong>{"It's a Draw!"}</strong> },
        (None, Outcome::InProgress) => html! {
            <span>{"Player "}<span class={player_class(props.current_player)}>{props.current_player.symbol()}</span>{"'s Turn"}</span>
        },
    };
    let strategy = props
        .strategy
        .as_ref()
        .map_or_else(|| "hot seat".to_string(), ToString::to_string);
    let Scoreboard { wins, losses, draws } = props.score;
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());

    html! {
        <nav class="status">
            <aside>{message}</aside>
            <small>{format!("Opponent: {strategy}")}</small>
            <small>{format!("W {wins} · L {losses} · D {draws}")}</small>
            <button onclick={on_reset}>{"New Game"}</button>
        </nav>
    }
}

fn player_class(player: Player) -> &'static str {
    match player {
        Player::X => "player-x",
        Player::O => "player-o",
    }
}

#[derive(Properties, Clone, PartialEq)]
struct StartProps {
    open: bool,
    offline: bool,
    strategy: StrategyId,
    on_start: Callback<FirstMove>,
}

#[function_component(StartDialog)]
fn start_dialog(props: &StartProps) -> Html {
    let choice = |label: &'static str, first: FirstMove| {
        let onclick = props.on_start.reform(move |_: MouseEvent| first);
        html! { <button {onclick}>{label}</button> }
    };
    let opponent_label = if props.offline { "Other player" } else { "Computer" };
    let title = if props.offline {
        "Two players, one screen".to_string()
    } else {
        format!("Next opponent: {}", props.strategy)
    };

    html! {
        <dialog id="start" open={props.open}>
            <article>
                <h2>{title}</h2>
                <p>{"Who moves first?"}</p>
                <footer>
                    {choice("Me", FirstMove::Human)}
                    {choice(opponent_label, FirstMove::Opponent)}
                    {choice("Random", FirstMove::Random)}
                </footer>
            </article>
        </dialog>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct GameOverProps {
    report: Option<Box<GameReport>>,
    on_next: Callback<()>,
}

#[function_component(GameOverDialog)]
fn game_over_dialog(props: &GameOverProps) -> Html {
    let Some(report) = &props.report else {
        return html! { <dialog id="game-over" open={false}/> };
    };
    let headline = match report.verdict {
        Verdict::Won => "You win!",
        Verdict::Lost => "You lose",
        Verdict::Draw => "It's a Draw!",
        Verdict::Unfinished => "Game over",
    };
    let next_label = if report.strategy.is_some() { "Next opponent" } else { "Play again" };
    let on_next = props.on_next.reform(|_: MouseEvent| ());

    html! {
        <dialog id="game-over" open={true}>
            <article>
                <h2>{headline}</h2>
                if let Some(strategy) = &report.strategy {
                    <p>{format!("Opponent strategy: {strategy}")}</p>
                }
                <ul>
                    { for report.insights.iter().map(|insight| html! { <li>{insight.to_string()}</li> }) }
                </ul>
                <footer>
                    <button onclick={on_next}>{next_label}</button>
                </footer>
            </article>
        </dialog>
    }
}

pub(crate) struct GameView {
    props: GameProps,
    api: ApiClient,
    rotation: StrategyRotation,
    epoch: GameEpoch,
    phase: Phase,
    session: Option<GameSession>,
    score: Scoreboard,
    /// Last server failure, shown until the next request goes out.
    error: Option<AttrValue>,
}

impl GameView {
    fn start(&mut self, ctx: &Context<Self>, first: FirstMove) -> bool {
        if !matches!(self.phase, Phase::Setup) {
            return false;
        }

        let epoch = self.epoch.begin(!self.props.offline);
        let human = self.props.human;
        let first_player = first.resolve(human, js_random_bool());
        log::debug!("starting game {} with {} first", epoch, first_player);

        if self.props.offline {
            self.session = Some(GameSession::hot_seat(epoch, human, first_player));
            self.phase = Phase::Playing;
            return true;
        }

        self.error = None;
        let request = NewGameRequest {
            first_player,
            strategy_id: self.rotation.current(),
        };
        let api = self.api.clone();
        ctx.link().send_future(async move {
            let result = api.new_game(&request).await;
            Msg::Started { epoch, result }
        });
        self.phase = Phase::Starting;
        true
    }

    fn started(&mut self, epoch: u32, result: Result<NewGameResponse, ApiError>) -> bool {
        if !self.epoch.accept_start(epoch) {
            log::debug!("dropping stale new-game response for game {}", epoch);
            return false;
        }

        match result {
            Ok(response) => {
                let session =
                    GameSession::remote(epoch, self.props.human, self.rotation.current(), response);
                log::debug!("game {} started against {:?}", epoch, session.strategy());
                self.session = Some(session);
                self.phase = Phase::Playing;
                self.finish_if_over();
            }
            Err(err) => {
                log::error!("could not start a new game: {}", err);
                self.error = Some(format!("Could not start a new game: {err}").into());
                self.phase = Phase::Setup;
            }
        }
        true
    }

    fn click(&mut self, ctx: &Context<Self>, coords: Coord2) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !matches!(self.phase, Phase::Playing) {
            return false;
        }

        if self.props.offline {
            return match session.play_local(coords, utc_now()) {
                Ok(_) => {
                    self.finish_if_over();
                    true
                }
                Err(err) => {
                    log::debug!("move at {:?} rejected: {}", coords, err);
                    false
                }
            };
        }

        let request = match session.begin_remote_move(coords) {
            Ok(request) => request,
            Err(err) => {
                log::debug!("move at {:?} rejected: {}", coords, err);
                return false;
            }
        };
        self.error = None;
        let epoch = session.epoch();
        let api = self.api.clone();
        ctx.link().send_future(async move {
            let result = api.send_move(&request).await;
            Msg::Moved {
                epoch,
                coords,
                result,
            }
        });
        true
    }

    fn moved(&mut self, epoch: u32, coords: Coord2, result: Result<MoveResponse, ApiError>) -> bool {
        let Some(session) = self.session.as_mut().filter(|session| session.accepts_reply(epoch)) else {
            log::debug!("dropping stale move response for game {}", epoch);
            return false;
        };

        match result {
            Ok(response) => {
                let outcome = session.complete_remote_move(coords, response, utc_now());
                log::debug!(
                    "move at {:?} -> {:?}, {} moves recorded",
                    coords,
                    outcome,
                    session.history().len()
                );
                self.finish_if_over();
            }
            Err(err) => {
                log::error!("move at {:?} failed: {}", coords, err);
                session.abort_remote_move();
                self.error = Some(format!("Move failed: {err}. Try again.").into());
            }
        }
        true
    }

    fn finish_if_over(&mut self) {
        let Some(report) = self.session.as_mut().and_then(GameSession::finish) else {
            return;
        };

        self.score.record(report.verdict);
        self.score.local_save();

        if !self.props.offline {
            let api = self.api.clone();
            let log = report.log.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = api.log_game(&log).await {
                    log::error!("could not log game: {}", err);
                }
            });
        }

        self.phase = Phase::Finished(Box::new(report));
    }

    fn reset(&mut self) -> bool {
        log::debug!("discarding game {}", self.epoch.current());
        self.epoch.discard();
        self.session = None;
        self.error = None;
        self.phase = Phase::Setup;
        true
    }

    fn next_opponent(&mut self) -> bool {
        if !matches!(self.phase, Phase::Finished(_)) {
            return false;
        }
        if !self.props.offline {
            self.rotation.advance();
        }
        self.session = None;
        self.phase = Phase::Setup;
        true
    }

    fn phase_label(&self) -> Option<AttrValue> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match &self.phase {
            Phase::Setup => Some("Pick who starts".into()),
            Phase::Starting => Some("Starting game…".into()),
            Phase::Playing if self.session.as_ref().is_some_and(GameSession::is_waiting) => {
                Some("Waiting for the server…".into())
            }
            Phase::Playing | Phase::Finished(_) => None,
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props().clone();
        let api = ApiClient::new(props.api_url.clone());
        if props.offline {
            log::info!("offline, both sides play on this device");
        } else {
            log::info!("game server: {}", api.base_url());
        }
        Self {
            api,
            props,
            rotation: StrategyRotation::default(),
            epoch: GameEpoch::default(),
            phase: Phase::Setup,
            session: None,
            score: LocalOrDefault::local_or_default(),
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start(first) => self.start(ctx, first),
            Started { epoch, result } => self.started(epoch, result),
            CellClicked(coords) => self.click(ctx, coords),
            Moved {
                epoch,
                coords,
                result,
            } => self.moved(epoch, coords, result),
            Reset => self.reset(),
            NextOpponent => self.next_opponent(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let session = self.session.as_ref();
        let outcome = session.map_or(Outcome::InProgress, GameSession::outcome);
        let current_player = session.map_or(self.props.human, GameSession::current_player);
        let strategy = session
            .and_then(|session| session.strategy().cloned())
            .or_else(|| (!self.props.offline).then(|| self.rotation.current()));
        let callback = ctx.link().callback(CellClicked);
        let report = match &self.phase {
            Phase::Finished(report) => Some(report.clone()),
            _ => None,
        };

        html! {
            <div class="tictac">
                <StatusBar
                    phase_label={self.phase_label()}
                    {current_player}
                    {outcome}
                    {strategy}
                    score={self.score}
                    on_reset={ctx.link().callback(|()| Reset)}
                />
                <table class={classes!("board", outcome.winner().map(|_| "won"))}>
                    {
                        for (0..3).map(|row| html! {
                            <tr>
                                {
                                    for iter_coords().filter(|&(r, _)| r == row).map(|coords| {
                                        let cell = session.and_then(|session| session.board()[coords]);
                                        let winning = outcome.is_winning_cell(coords);
                                        let disabled = !session.is_some_and(|session| session.can_play_at(coords));
                                        let callback = callback.clone();
                                        html! {
                                            <CellView {coords} {cell} {winning} {disabled} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <Modal>
                    <StartDialog
                        open={matches!(self.phase, Phase::Setup)}
                        offline={self.props.offline}
                        strategy={self.rotation.current()}
                        on_start={ctx.link().callback(Start)}
                    />
                    <GameOverDialog {report} on_next={ctx.link().callback(|()| NextOpponent)}/>
                </Modal>
            </div>
        }
    }
}
