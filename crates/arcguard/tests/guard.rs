//! Integration tests for the `Guard`: authentication, manifest loading, and
//! guarded calls end to end.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arcguard::prelude::*;

// =========================================================================
// Mock store, predicates, and authenticator
// =========================================================================

/// Game id → member player ids.
#[derive(Default)]
struct Store {
    games: HashMap<GameId, HashSet<PlayerId>>,
}

impl Store {
    fn with_game(mut self, game: u64, players: &[u64]) -> Self {
        self.games
            .insert(GameId(game), players.iter().copied().map(PlayerId).collect());
        self
    }
}

fn game_arg(args: &ResolvedArguments) -> Result<GameId, PredicateError> {
    args.game_id("gameId")
        .ok_or_else(|| PredicateError::invalid_argument("gameId"))
}

/// The caller is `playerId` and plays in `gameId`.
struct IsMyPlayer(Arc<Store>);

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
        let members = self
            .0
            .games
            .get(&game)
            .ok_or_else(|| PredicateError::not_found("game", game))?;
        Ok(principal.is_player(player) && members.contains(&player))
    }
}

/// The caller plays in `gameId`.
struct IsMyGame(Arc<Store>);

impl Predicate for IsMyGame {
    async fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> Result<bool, PredicateError> {
        let game = game_arg(args)?;
        let members = self
            .0
            .games
            .get(&game)
            .ok_or_else(|| PredicateError::not_found("game", game))?;
        Ok(members.contains(&principal.player_id))
    }
}

/// Accepts any numeric token as a PlayerId.
struct TestAuth;

impl Authenticator for TestAuth {
    async fn authenticate(&self, token: &str) -> Result<Principal, SessionError> {
        let id: u64 = token
            .parse()
            .map_err(|_| SessionError::AuthFailed("not a number".into()))?;
        Ok(Principal::new(PlayerId(id)))
    }
}

const MANIFEST: &str = r#"{
    "version": 1,
    "config": { "evaluation_timeout_ms": 1000 },
    "operations": [
        { "name": "players.save_roles", "service": "players",
          "params": ["gameId", "playerId", "roles"],
          "guard": { "predicate": "isMyPlayer", "params": ["gameId", "playerId"] } },
        { "name": "games.close", "service": "games", "params": ["gameId"] },
        { "name": "games.add_vote", "service": "games", "params": ["gameId", "vote"] },
        { "name": "games.list", "params": [] }
    ],
    "services": [
        { "name": "games", "guard": { "predicate": "isMyGame", "params": ["gameId"] } }
    ],
    "variants": [
        { "name": "players.save_roles_bulk", "implements": "players.save_roles" }
    ]
}"#;

fn store() -> Arc<Store> {
    Arc::new(Store::default().with_game(1, &[1, 2]).with_game(2, &[3]))
}

fn guard() -> Guard {
    let store = store();
    let manifest = GuardManifest::from_json(MANIFEST.as_bytes()).unwrap();
    Guard::builder()
        .predicate("isMyPlayer", IsMyPlayer(Arc::clone(&store)))
        .predicate("isMyGame", IsMyGame(store))
        .manifest(manifest)
        .build()
        .unwrap()
}

async fn login(token: &str) -> PrincipalContext {
    PrincipalContext::authenticate(&TestAuth, Some(token))
        .await
        .unwrap()
}

fn save_roles(game: u64, player: u64) -> CallArguments {
    CallArguments::new()
        .arg(GameId(game))
        .arg(PlayerId(player))
        .arg(vec!["ECHO", "NUKE"])
}

// =========================================================================
// Save roles (isMyPlayer)
// =========================================================================

#[tokio::test]
async fn test_call_own_player_saves_roles() {
    let guard = guard();
    let ctx = login("1").await;
    let writes = AtomicUsize::new(0);
    let counter = &writes;

    let result = guard
        .call("players.save_roles", &ctx, &save_roles(1, 1), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_call_teammate_player_is_denied() {
    let guard = guard();
    let ctx = login("1").await;
    let writes = AtomicUsize::new(0);
    let counter = &writes;

    let result = guard
        .call("players.save_roles", &ctx, &save_roles(1, 2), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_denied());
    assert_eq!(err.to_string(), "403 access denied");
    assert_eq!(writes.load(Ordering::SeqCst), 0, "denied call must not write");
}

#[tokio::test]
async fn test_check_missing_game_and_mismatch_look_the_same() {
    let guard = guard();
    let ctx = login("1").await;

    let missing = guard.call("players.save_roles", &ctx, &save_roles(9, 1), || async {}).await;
    let mismatch = guard.call("players.save_roles", &ctx, &save_roles(1, 2), || async {}).await;

    assert_eq!(missing.unwrap_err().to_string(), mismatch.unwrap_err().to_string());
}

#[tokio::test]
async fn test_call_other_player_in_missing_game_is_denied() {
    let guard = guard();
    let ctx = login("1").await;

    let result = guard
        .call("players.save_roles", &ctx, &save_roles(9, 2), || async {})
        .await;

    let err = result.unwrap_err();
    assert!(err.is_denied());
    assert_eq!(err.to_string(), "403 access denied");
}

#[tokio::test]
async fn test_check_variant_inherits_declaration() {
    let guard = guard();
    let ctx = login("2").await;

    assert!(guard.is_guarded("players.save_roles_bulk"));
    assert!(
        guard
            .check("players.save_roles_bulk", &ctx, &save_roles(1, 2))
            .await
            .is_allowed()
    );
    assert!(
        !guard
            .check("players.save_roles_bulk", &ctx, &save_roles(1, 1))
            .await
            .is_allowed()
    );
}

// =========================================================================
// Service-level declarations (isMyGame)
// =========================================================================

#[tokio::test]
async fn test_check_service_declaration_guards_every_operation() {
    let guard = guard();
    let outsider = login("3").await;
    let member = login("2").await;
    let close = CallArguments::new().arg(GameId(1));
    let vote = CallArguments::new().arg(GameId(1)).arg("yes");

    assert!(guard.check("games.close", &member, &close).await.is_allowed());
    assert!(guard.check("games.add_vote", &member, &vote).await.is_allowed());
    assert!(!guard.check("games.close", &outsider, &close).await.is_allowed());
    assert!(!guard.check("games.add_vote", &outsider, &vote).await.is_allowed());
}

#[tokio::test]
async fn test_check_operation_outside_services_is_unguarded() {
    let guard = guard();

    assert!(!guard.is_guarded("games.list"));
    assert!(
        guard
            .check("games.list", &PrincipalContext::anonymous(), &CallArguments::new())
            .await
            .is_allowed()
    );
}

// =========================================================================
// Authentication
// =========================================================================

#[tokio::test]
async fn test_call_without_token_is_denied() {
    let guard = guard();
    let ctx = PrincipalContext::authenticate(&TestAuth, None).await.unwrap();

    let outcome = guard.check("players.save_roles", &ctx, &save_roles(1, 1)).await;

    assert_eq!(outcome, CallOutcome::Denied(DenyReason::Unauthenticated));
}

#[tokio::test]
async fn test_authenticate_bad_token_is_session_error() {
    let result = PrincipalContext::authenticate(&TestAuth, Some("abc")).await;

    let err: ArcguardError = result.unwrap_err().into();
    assert!(matches!(err, ArcguardError::Session(SessionError::AuthFailed(_))));
}

// =========================================================================
// Startup validation
// =========================================================================

#[test]
fn test_build_manifest_without_predicates_fails() {
    let manifest = GuardManifest::from_json(MANIFEST.as_bytes()).unwrap();

    let result = Guard::builder().manifest(manifest).build();

    assert!(matches!(
        result,
        Err(ArcguardError::Gate(GateError::Registry(
            RegistryError::UnknownPredicate(_)
        )))
    ));
}

#[test]
fn test_build_game_check_on_operation_without_game_fails() {
    let result = Guard::builder()
        .predicate("isMyGame", IsMyGame(store()))
        .operation(OperationSignature::new("votes.add", ["vote"]).in_service("votes"))
        .declare_service("votes", PredicateDeclaration::new("isMyGame", ["gameId"]))
        .build();

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "operation `votes.add` has no parameter named `gameId`"
    );
}

#[test]
fn test_build_manifest_sets_config() {
    assert_eq!(
        guard().config().evaluation_timeout(),
        Some(Duration::from_secs(1))
    );
}

// =========================================================================
// Reason exposure
// =========================================================================

#[tokio::test]
async fn test_call_exposes_reason_when_configured() {
    let guard = Guard::builder()
        .predicate("isMyPlayer", IsMyPlayer(store()))
        .operation(OperationSignature::new("players.save_roles", ["gameId", "playerId"]))
        .declare(
            "players.save_roles",
            PredicateDeclaration::new("isMyPlayer", ["gameId", "playerId"]),
        )
        .config(GateConfig {
            expose_deny_reasons: true,
            ..GateConfig::default()
        })
        .build()
        .unwrap();
    let ctx = login("1").await;

    let err = guard
        .call("players.save_roles", &ctx, &save_roles(9, 1), || async {})
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "403 access denied: predicate failed: game G-9 not found"
    );
}
