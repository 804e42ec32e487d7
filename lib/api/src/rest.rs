use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer, Result as ActixResult};
use docmatch_core::{Context, ScoringMode, SimilarityIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
struct ProcessRequest {
    query: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ProcessResponse {
    pub similitudes: Vec<f32>,
    pub documento_relevante: String,
    pub doc_id: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    documents: usize,
    vocabulary: VocabularySizes,
}

#[derive(Serialize)]
struct VocabularySizes {
    tfidf: usize,
    w2v: usize,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(context: Arc<Context>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(context.clone()))
                .configure(RestApi::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register the query routes. Expects `web::Data<Arc<Context>>` in app data.
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.app_data(json_config())
            .route("/health", web::get().to(health))
            .route("/process/{method}/", web::post().to(process))
            .route("/process/{method}", web::post().to(process));
    }
}

// Malformed bodies get the same {"error": ...} shape as validation failures
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid request body: {}", err)
        }));
        error::InternalError::from_response(err, response).into()
    })
}

async fn health(context: web::Data<Arc<Context>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        documents: context.corpus().len(),
        vocabulary: VocabularySizes {
            tfidf: context.lexical().vocabulary_size(),
            w2v: context.embedding().vocabulary_size(),
        },
    }))
}

async fn process(
    context: web::Data<Arc<Context>>,
    path: web::Path<String>,
    req: web::Json<ProcessRequest>,
) -> ActixResult<HttpResponse> {
    let mode = match path.into_inner().parse::<ScoringMode>() {
        Ok(mode) => mode,
        Err(e) => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": e.to_string()
            })));
        }
    };

    match context.answer(req.query.as_deref(), mode) {
        Ok(answer) => Ok(HttpResponse::Ok().json(ProcessResponse {
            similitudes: answer.similarities,
            documento_relevante: answer.document_text,
            doc_id: answer.doc_id,
        })),
        Err(e) if e.is_client_error() => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }))),
        Err(e) => {
            tracing::error!("{} query failed: {}", mode, e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}
