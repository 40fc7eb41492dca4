#![deny(missing_docs)]
//! RepoGrade server executable.
//!
//! Hosts the HTTP endpoint that fetches a public GitHub repository and
//! returns its health score, breakdown, summary and roadmap.

mod github;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[allow(unused_imports)]
use std::str::FromStr;

#[cfg(not(test))]
use crate::github::GitHubConfig;
#[cfg(not(test))]
use crate::routes::{AppState, analyze_repository, health, json_config, openapi_json};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let github = GitHubConfig::from_env();
    if github.token.is_none() {
        log::info!("GITHUB_TOKEN not set; using anonymous GitHub rate limits");
    }
    let state = web::Data::new(AppState { github });

    let origins = std::env::var("REPOGRADE_UI_ORIGINS")
        .unwrap_or_else(|_| "http://127.0.0.1:3000,http://localhost:3000".to_string());
    let allowed_origins: Vec<String> = origins
        .split(',')
        .map(|value| value.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    let listen_addr =
        std::env::var("REPOGRADE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let raw_port = std::env::var("REPOGRADE_PORT").unwrap_or_else(|_| "8080".to_string());
    let listen_port = u16::from_str(&raw_port).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("REPOGRADE_PORT must be a u16 number, got {raw_port:?}: {err}"),
        )
    })?;
    log::info!("listening on {listen_addr}:{listen_port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .app_data(json_config())
                .service(analyze_repository)
                .service(health)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
