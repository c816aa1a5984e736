use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use emoji_relay::api::{configure_routes, AppState};
use emoji_relay::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    // Load .env file - fail loudly if it doesn't exist
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Make sure OPENROUTER_API_KEY is set in your environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env()
        .expect("Failed to load app configuration from environment");

    println!(
        "🏁 Racing {} models per translation request",
        app_config.models.len()
    );

    let state = AppState::new(app_config);

    println!("🚀 Starting server...");
    println!("🌐 API available at http://127.0.0.1:8080/api/v1");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
