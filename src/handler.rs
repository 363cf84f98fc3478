// HTTP handler bindings for the decision service
//
// Thin wrappers that bind Rocket routes to the Bot's methods:
// - Deserializing the incoming game snapshot
// - Extracting the Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing the decision

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use quoridor_engine::bot::Bot;
use quoridor_engine::types::GameState;

/// GET / endpoint
/// Returns engine metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Called when a game starts - opens the game's search session
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute the side-to-move's action
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<GameState>,
) -> Result<Json<Value>, (Status, Json<Value>)> {
    match bot.get_move(&move_req).await {
        Ok(decision) => Ok(Json(Bot::decision_json(&decision))),
        Err(e) => Err((Status::BadRequest, Json(json!({ "error": e })))),
    }
}

/// POST /end endpoint
/// Called when a game ends - drops the game's session
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
