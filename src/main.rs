use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sharedmoney::{
    config::{ServerSettings, Settings},
    routes::{configure, AppState},
};

fn cors(server: &ServerSettings) -> Cors {
    if server.allowed_origins.is_empty() {
        return Cors::permissive();
    }
    server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("sharedmoney={}", settings.log.level))
        .init();

    if settings.auth.accounts.is_empty() {
        tracing::warn!("no accounts configured, nobody will be able to log in");
    }

    let addr = settings.server_addr();
    let server = settings.server.clone();
    let state = web::Data::new(AppState::new(settings.auth));
    tracing::info!("Listening on {}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(addr)?
    .run()
    .await?;
    Ok(())
}
