use std::collections::HashMap;
use std::sync::Arc;

use arcguard::prelude::*;
use serde::Deserialize;
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Game store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Game {
    roles: HashMap<PlayerId, Vec<String>>, // every player in the game, with their roles
    closed: bool,
}

#[derive(Default)]
struct GameStore {
    games: RwLock<HashMap<GameId, Game>>,
}

impl GameStore {
    async fn add_game(&self, game: GameId, players: &[PlayerId]) {
        let mut games = self.games.write().await;
        let entry = games.entry(game).or_default();
        for player in players {
            entry.roles.entry(*player).or_default();
        }
    }

    async fn is_member(&self, game: GameId, player: PlayerId) -> Result<bool, PredicateError> {
        let games = self.games.read().await;
        let game_entry = games
            .get(&game)
            .ok_or_else(|| PredicateError::not_found("game", game))?;
        Ok(game_entry.roles.contains_key(&player))
    }

    async fn save_roles(&self, game: GameId, player: PlayerId, roles: Vec<String>) {
        if let Some(entry) = self.games.write().await.get_mut(&game) {
            entry.roles.insert(player, roles);
        }
    }

    async fn roles(&self, game: GameId, player: PlayerId) -> Option<Vec<String>> {
        let games = self.games.read().await;
        games.get(&game)?.roles.get(&player).cloned()
    }

    async fn close(&self, game: GameId) {
        if let Some(entry) = self.games.write().await.get_mut(&game) {
            entry.closed = true;
        }
    }

    async fn is_closed(&self, game: GameId) -> bool {
        self.games.read().await.get(&game).is_some_and(|g| g.closed)
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn game_arg(args: &ResolvedArguments) -> Result<GameId, PredicateError> {
    args.game_id("gameId")
        .ok_or_else(|| PredicateError::invalid_argument("gameId"))
}

/// `isMyPlayer(gameId, playerId)`: the caller is that player, in that game.
struct IsMyPlayer(Arc<GameStore>);

impl Predicate for IsMyPlayer {
    async fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> Result<bool, PredicateError> {
        let game = game_arg(args)?;
        let player = args
            .player_id("playerId")
            .ok_or_else(|| PredicateError::invalid_argument("playerId"))?;
        // Check the game first so a missing game is reported as such.
        let member = self.0.is_member(game, player).await?;
        Ok(member && principal.is_player(player))
    }
}

/// `isMyGame(gameId)`: the caller plays in that game.
struct IsMyGame(Arc<GameStore>);

impl Predicate for IsMyGame {
    async fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> Result<bool, PredicateError> {
        let game = game_arg(args)?;
        self.0.is_member(game, principal.player_id).await
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Tokens look like `token-<player id>`.
struct TokenAuth;

impl Authenticator for TokenAuth {
    async fn authenticate(&self, token: &str) -> Result<Principal, SessionError> {
        let id: u64 = token
            .strip_prefix("token-")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| SessionError::AuthFailed("malformed token".into()))?;
        Ok(Principal::new(PlayerId(id)))
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

const MANIFEST: &str = r#"{
    "version": 1,
    "operations": [
        { "name": "players.save_roles", "service": "players",
          "params": ["gameId", "playerId", "roles"],
          "guard": { "predicate": "isMyPlayer", "params": ["gameId", "playerId"] } },
        { "name": "games.close", "service": "games", "params": ["gameId"] }
    ],
    "services": [
        { "name": "games", "guard": { "predicate": "isMyGame", "params": ["gameId"] } }
    ]
}"#;

/// One scripted request, as a router would hand it over.
#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    SaveRoles {
        token: Option<String>,
        game_id: GameId,
        player_id: PlayerId,
        roles: Vec<String>,
    },
    CloseGame {
        token: Option<String>,
        game_id: GameId,
    },
}

const SCRIPT: &str = r#"[
    { "op": "save_roles", "token": "token-1", "game_id": 1, "player_id": 1, "roles": ["ECHO"] },
    { "op": "save_roles", "token": "token-1", "game_id": 1, "player_id": 2, "roles": ["NUKE"] },
    { "op": "save_roles", "token": "token-1", "game_id": 7, "player_id": 1, "roles": ["ECHO"] },
    { "op": "save_roles", "token": null, "game_id": 1, "player_id": 1, "roles": [] },
    { "op": "close_game", "token": "token-3", "game_id": 1 },
    { "op": "close_game", "token": "token-2", "game_id": 1 }
]"#;

struct App {
    guard: Guard,
    store: Arc<GameStore>,
}

impl App {
    async fn new() -> Result<Self, ArcguardError> {
        let store = Arc::new(GameStore::default());
        store.add_game(GameId(1), &[PlayerId(1), PlayerId(2)]).await;
        store.add_game(GameId(2), &[PlayerId(3)]).await;

        let guard = Guard::builder()
            .predicate("isMyPlayer", IsMyPlayer(Arc::clone(&store)))
            .predicate("isMyGame", IsMyGame(Arc::clone(&store)))
            .manifest(GuardManifest::from_json(MANIFEST.as_bytes())?)
            .build()?;

        Ok(Self { guard, store })
    }

    async fn handle(&self, request: Request) -> Result<(), ArcguardError> {
        match request {
            Request::SaveRoles {
                token,
                game_id,
                player_id,
                roles,
            } => {
                let ctx = PrincipalContext::authenticate(&TokenAuth, token.as_deref()).await?;
                let args = CallArguments::new()
                    .arg(game_id)
                    .arg(player_id)
                    .arg(roles.clone());
                self.guard
                    .call("players.save_roles", &ctx, &args, || {
                        self.store.save_roles(game_id, player_id, roles)
                    })
                    .await
            }
            Request::CloseGame { token, game_id } => {
                let ctx = PrincipalContext::authenticate(&TokenAuth, token.as_deref()).await?;
                let args = CallArguments::new().arg(game_id);
                self.guard
                    .call("games.close", &ctx, &args, || self.store.close(game_id))
                    .await
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    arcguard::telemetry::init();

    let app = App::new().await?;
    let requests: Vec<Request> = serde_json::from_str(SCRIPT)?;

    for (i, request) in requests.into_iter().enumerate() {
        match app.handle(request).await {
            Ok(()) => tracing::info!(request = i, "ok"),
            Err(e) => tracing::info!(request = i, error = %e, "rejected"),
        }
    }

    let roles = app.store.roles(GameId(1), PlayerId(1)).await;
    let closed = app.store.is_closed(GameId(1)).await;
    tracing::info!(?roles, closed, "game G-1 after script");
    Ok(())
}
