//! Servidor web Axum com WebSocket para visualizar o transdutor passo a passo

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use ner_fst_core::{
    corpus::demo_texts, AutomatonTable, EngineEvent, LabeledSpan, Transducer, TransducerConfig,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ner-fst-web")]
#[command(about = "Extração de entidades com transdutor de estados finitos", long_about = None)]
struct Cli {
    /// Endereço de escuta
    #[arg(long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Configuração JSON do autômato (usa a de referência se ausente)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Estado compartilhado da aplicação
struct AppState {
    config: TransducerConfig,
    table: AutomatonTable,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct AnalyzeResponse {
    spans: Vec<LabeledSpan>,
    total_tokens: usize,
    processing_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Carregando configuração de {}", path.display());
            TransducerConfig::from_path(path)?
        }
        None => TransducerConfig::reference(),
    };
    // Falha aqui, antes de aceitar qualquer requisição
    let table = AutomatonTable::build(&config)?;
    info!("{config}");

    let state = Arc::new(AppState { config, table });

    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    info!("🚀 Servidor NER-FST iniciado em http://{}", cli.addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/config", get(config_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state)
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Extração via HTTP POST (sem streaming)
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let start = std::time::Instant::now();
    let total_tokens = ner_fst_core::tokenizer::tokenize(&req.text).len();
    let spans = Transducer::new(&state.table).process_text(&req.text);

    Json(AnalyzeResponse {
        spans,
        total_tokens,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Configuração ativa do autômato
async fn config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.clone())
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe texto, executa o transdutor e envia cada passo do cursor
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Aceita {"text": "..."} ou texto puro
                let text_str = match serde_json::from_str::<AnalyzeRequest>(&text) {
                    Ok(req) => req.text.trim().to_string(),
                    Err(_) => text.trim().to_string(),
                };

                if text_str.is_empty() {
                    continue;
                }

                info!("Analisando via WebSocket: {} chars", text_str.len());

                let (tx, rx) = std::sync::mpsc::channel::<EngineEvent>();
                let state_for_thread = Arc::clone(&state);

                // O transdutor é síncrono: roda fora do runtime
                let handle = tokio::task::spawn_blocking(move || {
                    Transducer::new(&state_for_thread.table).process_streaming(&text_str, tx);
                });
                handle.await.ok();

                let events: Vec<EngineEvent> = rx.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = TransducerConfig::reference();
        let table = AutomatonTable::build(&config).unwrap();
        app(Arc::new(AppState { config, table }))
    }

    fn post_analyze(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_spans() {
        let response = test_app()
            .oneshot(post_analyze(r#"{"text": "Contact john@example.com today"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: AnalyzeResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.total_tokens, 3);
        assert_eq!(parsed.spans.len(), 1);
        assert_eq!(parsed.spans[0].text, "john@example.com");
        assert_eq!(parsed.spans[0].label, "EMAIL");
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_text() {
        let response = test_app().oneshot(post_analyze(r#"{"text": "   "}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_config_endpoint() {
        let response = test_app()
            .oneshot(Request::builder().uri("/config").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let config: TransducerConfig = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(config, TransducerConfig::reference());
    }
}
