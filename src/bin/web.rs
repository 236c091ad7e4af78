//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST, PORT, INACTIVITY_HOURS, CLEANUP_INTERVAL_MINUTES, RUST_LOG.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use beach_tournament_web::logic::{advance_bracket, group_ranking};
use beach_tournament_web::{
    compute_match_stats, correct_group_result, generate_bracket, parse_roster, parse_score,
    record_result, start_tournament, EntrantId, ErrorKind, MatchId, Tournament, TournamentError,
    TournamentId, TournamentKind, TournamentStore,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;

/// In-memory state: many tournaments by ID. Entries are removed after inactivity.
type AppState = Data<RwLock<TournamentStore>>;

/// Server settings read from the environment at start-up.
#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    inactivity_timeout: Duration,
    cleanup_interval: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let inactivity_hours: u64 = env_or("INACTIVITY_HOURS", 12);
        let cleanup_minutes: u64 = env_or("CLEANUP_INTERVAL_MINUTES", 30);
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 8080),
            inactivity_timeout: Duration::from_secs(inactivity_hours * 3600),
            cleanup_interval: Duration::from_secs(cleanup_minutes.max(1) * 60),
        }
    }
}

/// Parse an env var, falling back to `default` when unset or invalid.
fn env_or<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    kind: TournamentKind,
}

#[derive(Deserialize)]
struct AddEntrantBody {
    name: String,
    #[serde(default)]
    partner: Option<String>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct EntrantPath {
    id: TournamentId,
    entrant_id: EntrantId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct GroupPath {
    id: TournamentId,
    group_id: String,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Input => HttpResponse::BadRequest().json(body),
        ErrorKind::State => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// Run one engine operation on a tournament under the write lock and respond with the
/// updated tournament.
fn with_tournament<F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(tournament) = store.get_mut(id) else {
        return not_found();
    };
    match op(&mut *tournament) {
        Ok(()) => HttpResponse::Ok().json(&*tournament),
        Err(e) => {
            log::debug!("Tournament {}: rejected: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "beach-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name.trim(), body.kind);
    let response = HttpResponse::Ok().json(&tournament);
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let id = store.insert(tournament);
    log::info!("Tournament {} created ({:?})", id, body.kind);
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes its activity time.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Add an entrant (tournament must be in Setup).
#[post("/api/tournaments/{id}/entrants")]
async fn api_add_entrant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddEntrantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, |t| {
        t.add_entrant(body.name, body.partner).map(|_| ())
    })
}

/// Import a CSV roster (`name,partner` header); all rows are added or none.
#[post("/api/tournaments/{id}/entrants/import")]
async fn api_import_roster(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let roster = match parse_roster(body.as_bytes()) {
        Ok(roster) => roster,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    with_tournament(&state, path.id, |t| t.import_roster(roster).map(|_| ()))
}

/// Remove an entrant by id (tournament must be in Setup).
#[delete("/api/tournaments/{id}/entrants/{entrant_id}")]
async fn api_remove_entrant(state: AppState, path: Path<EntrantPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.remove_entrant(path.entrant_id))
}

/// Start: draw pools (individual/doubles) or generate the SUPER8 schedule.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        start_tournament(t, &mut rand::thread_rng())
    })
}

/// Close the group stage and draw the elimination bracket.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        generate_bracket(t, &mut rand::thread_rng())
    })
}

/// Retry scheduling the next bracket round (no-op when the current round is still open).
#[post("/api/tournaments/{id}/bracket/advance")]
async fn api_advance_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        advance_bracket(t, &mut rand::thread_rng()).map(|_| ())
    })
}

/// Record the score of a pending match.
#[post("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_record_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        record_result(t, path.match_id, &body.score, &mut rand::thread_rng()).map(|_| ())
    })
}

/// Correct the score of a final pool match (only while pools are being played).
#[put("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_correct_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        correct_group_result(t, path.match_id, &body.score).map(|_| ())
    })
}

/// Ranked standings of one pool.
#[get("/api/tournaments/{id}/groups/{group_id}/standings")]
async fn api_group_standings(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let Some(tournament) = store.get_mut(path.id) else {
        return not_found();
    };
    match group_ranking(tournament, &path.group_id) {
        Ok(ranked) => HttpResponse::Ok().json(ranked),
        Err(e) => error_response(&e),
    }
}

/// Restart tournament: back to Setup with the same roster.
#[post("/api/tournaments/{id}/restart")]
async fn api_restart_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.restart())
}

/// Check a score string without touching any tournament.
#[post("/api/scores/validate")]
async fn api_validate_score(body: Json<ScoreBody>) -> HttpResponse {
    match parse_score(&body.score) {
        Ok(parsed) => HttpResponse::Ok().json(serde_json::json!({
            "valid": true,
            "score": parsed.to_string(),
            "stats": compute_match_stats(&parsed),
        })),
        Err(e) => HttpResponse::Ok().json(serde_json::json!({
            "valid": false,
            "reason": e,
            "message": e.to_string(),
        })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state: AppState = Data::new(RwLock::new(TournamentStore::new()));

    // Background task: periodically remove tournaments that saw no activity.
    let state_cleanup = state.clone();
    let (timeout, period) = (config.inactivity_timeout, config.cleanup_interval);
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let mut store = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let removed = store.remove_inactive(timeout);
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_entrant)
            .service(api_import_roster)
            .service(api_remove_entrant)
            .service(api_start_tournament)
            .service(api_generate_bracket)
            .service(api_advance_bracket)
            .service(api_record_score)
            .service(api_correct_score)
            .service(api_group_standings)
            .service(api_restart_tournament)
            .service(api_validate_score)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
