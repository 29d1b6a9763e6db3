use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::answer::{AnswerService, EMPTY_QUESTION};
use crate::config::AppConfig;
use crate::i18n::{AssetCatalog, KnowledgeBase, TranslationMap};
use crate::llm::{CompletionClient, LlmSettings};
use crate::protocol::{AskRequest, AskResponse};
use crate::ui::html_shell;
use crate::widget::{Page, renderer};

/// Build application state from configuration and an LLM client.
pub fn build_state(
    config: &AppConfig,
    llm: Arc<dyn CompletionClient>,
) -> anyhow::Result<AppState> {
    let catalog = Arc::new(AssetCatalog::load_dir(&config.assets.static_dir)?);
    info!(
        name: "assets.catalog.loaded",
        dir = %config.assets.static_dir.display(),
        translations = catalog.translations.len(),
        knowledge = catalog.knowledge.len(),
        "Asset catalog loaded"
    );

    let answers = Arc::new(AnswerService::new(
        llm,
        Arc::clone(&catalog),
        config.answer.timeouts(),
    ));

    Ok(AppState {
        answers,
        catalog,
        default_language: config.assets.default_language.clone(),
    })
}

/// Routes: the widget page, static assets and `/ask`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ask", post(ask_handler))
        .route("/health", get(|| async { "ok" }))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        "LLM configuration loaded"
    );

    let llm = Arc::new(crate::llm::ChatCompletionsClient::new(settings));
    let state = build_state(&config, llm)?;
    let app = build_router(state, &config.assets.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Widget page pre-rendered in the default language.
async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let lang = &state.default_language;
    let mut page = Page::new(lang.clone());

    let empty_translations = TranslationMap::default();
    let empty_knowledge = KnowledgeBase::default();
    let translations = state
        .catalog
        .translations
        .get(lang)
        .unwrap_or(&empty_translations);
    let knowledge = state.catalog.knowledge.get(lang).unwrap_or(&empty_knowledge);
    renderer::update_ui(&mut page, lang, translations, knowledge);

    let title = translations.get("page_title").unwrap_or("LARUbot");
    Html(html_shell(lang, title, &page.render_html()))
}

/// POST /ask - Answer a question.
async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Json<AskResponse> {
    let question = req.message.trim();
    if question.is_empty() {
        tracing::debug!("Empty question");
        return Json(AskResponse::plain(EMPTY_QUESTION));
    }

    Json(state.answers.answer(question).await)
}
